//! Terminal rendering for grid rows and badges.

use owo_colors::{OwoColorize, Stream};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::grid::{Cell, ColumnConfig};
use crate::types::{BugRecord, BugStatus, Priority, Severity};

/// Roughly how many pixels one terminal column stands for.
const PIXELS_PER_CHAR: u32 = 10;
const MIN_CELL_CHARS: usize = 4;

pub fn format_severity_colored(severity: Severity) -> String {
    let label = severity.as_str();
    match severity {
        Severity::Low => label.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string(),
        Severity::Medium => label.to_string(),
        Severity::High => label.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
        Severity::Critical => label
            .if_supports_color(Stream::Stdout, |t| t.red().bold().to_string())
            .to_string(),
    }
}

pub fn format_priority_colored(priority: Priority) -> String {
    let label = priority.as_str();
    match priority {
        Priority::Low | Priority::Medium => label.to_string(),
        Priority::High => label.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
        Priority::Urgent => label.if_supports_color(Stream::Stdout, |t| t.red()).to_string(),
    }
}

pub fn format_status_colored(status: BugStatus) -> String {
    let label = status.as_str();
    match status {
        BugStatus::Open => label.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
        BugStatus::InProgress => label.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string(),
        BugStatus::Resolved => label.if_supports_color(Stream::Stdout, |t| t.green()).to_string(),
        BugStatus::Closed | BugStatus::Duplicate => {
            label.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string()
        }
    }
}

/// Cell text truncated to `max_chars`, with badges colored.
pub fn styled_cell(cell: &Cell, max_chars: usize) -> String {
    match cell {
        Cell::Status(status) => format_status_colored(*status),
        Cell::Severity(severity) => format_severity_colored(*severity),
        Cell::Priority(priority) => format_priority_colored(*priority),
        Cell::Text(_) | Cell::Date(_) => truncate(&cell.format(), max_chars),
    }
}

/// Character budget for a column of the given pixel width.
pub fn column_chars(column: &ColumnConfig) -> usize {
    ((column.width / PIXELS_PER_CHAR) as usize).max(MIN_CELL_CHARS)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Render rows as a table with one column per entry in `columns`.
pub fn render_grid_table<'a>(
    columns: &[&ColumnConfig],
    rows: impl IntoIterator<Item = &'a BugRecord>,
) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.label.clone()));
    for record in rows {
        builder.push_record(
            columns
                .iter()
                .map(|c| styled_cell(&c.id.cell(record), column_chars(c))),
        );
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
