use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::filter::state::{FilterDimension, SortField, SortOrder};
use crate::grid::ColumnId;
use crate::types::{VALID_PRIORITIES, VALID_SEVERITIES, VALID_STATUSES};

#[derive(Parser)]
#[command(name = "bugdeck")]
#[command(about = "Filter, sort and page through QA bug reports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current page of bugs through the visible columns
    Ls {
        /// JSON file of bug records (defaults to .bugdeck/bugs.json)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Fetch from the remote store (server-side pagination)
        #[arg(long)]
        remote: bool,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Rows per page (default: grid.page_size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Scroll offset in pixels within the page
        #[arg(long, default_value_t = 0)]
        scroll: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or change the persisted search and filter state
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// Inspect or change the persisted column layout
    Columns {
        #[command(subcommand)]
        action: ColumnsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum FilterAction {
    /// Show the current filter state
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Set the free-text search term (empty clears it)
    Search {
        #[arg(default_value = "")]
        term: String,
    },

    /// Toggle a value in a filter dimension
    Toggle {
        /// Dimension: status, severity, priority, reporter
        #[arg(value_parser = parse_dimension)]
        dimension: FilterDimension,

        /// Value to add or remove
        value: String,
    },

    /// Restrict to bugs created within a date range
    Range {
        /// Start date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// End date, inclusive (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        to: Option<String>,
    },

    /// Sort by a field; without an order, clicking the same field flips it
    Sort {
        #[arg(value_parser = parse_sort_field)]
        field: SortField,

        #[arg(value_parser = parse_sort_order)]
        order: Option<SortOrder>,
    },

    /// Clear all filters, keeping the sort
    Clear {
        /// Also reset the sort to its default
        #[arg(long)]
        all: bool,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ColumnsAction {
    /// List columns in display order
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Move the column at one position to another (0-based)
    Move { from: usize, to: usize },

    /// Hide a column
    Hide {
        #[arg(value_parser = parse_column)]
        id: ColumnId,
    },

    /// Show a hidden column
    Unhide {
        #[arg(value_parser = parse_column)]
        id: ColumnId,
    },

    /// Set a column width in pixels (clamped to 80..=500)
    Width {
        #[arg(value_parser = parse_column)]
        id: ColumnId,
        width: u32,
    },

    /// Restore the default layout
    Reset {
        #[arg(long)]
        json: bool,
    },

    /// Make every column visible
    ShowAll,

    /// Hide every column that can be hidden
    HideAll,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Get a configuration value
    Get {
        key: String,
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        key: String,
        value: String,
        #[arg(long)]
        json: bool,
    },
}

fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_dimension(s: &str) -> Result<FilterDimension, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "dimension",
        &["status", "severity", "priority", "reporter"],
    )
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort field",
        SortField::ALL_STRINGS,
    )
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "sort order",
        &["asc", "desc"],
    )
}

fn parse_column(s: &str) -> Result<ColumnId, String> {
    let valid: Vec<&str> = ColumnId::ALL.iter().map(|c| c.as_str()).collect();
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "column",
        &valid,
    )
}

/// Valid values for a filter dimension, for help and error text.
pub fn dimension_values(dimension: FilterDimension) -> &'static [&'static str] {
    match dimension {
        FilterDimension::Status => VALID_STATUSES,
        FilterDimension::Severity => VALID_SEVERITIES,
        FilterDimension::Priority => VALID_PRIORITIES,
        FilterDimension::Reporter => &[],
    }
}
