//! Grid composition: columns, pagination mode, and row rendering.

pub mod columns;

use serde::{Deserialize, Serialize};

use crate::error::BugdeckError;
use crate::filter::pipeline::{self, Page, PageRequest};
use crate::filter::state::SearchFilterState;
use crate::types::BugRecord;

pub use columns::{
    COLUMNS_KEY, Cell, ColumnConfig, ColumnId, ColumnKind, ColumnStore, default_columns,
};

/// Where filtering and paging happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// The full list is held locally and sliced in memory.
    #[default]
    Client,
    /// The remote store filters and pages; only one page is held locally.
    Server,
}

enum_display_fromstr!(
    PaginationMode,
    BugdeckError::InvalidPaginationMode,
    {
        Client => "client",
        Server => "server",
    }
);

/// Filter, sort, and slice a full in-memory list.
pub fn client_page<'a>(
    records: &'a [BugRecord],
    filters: &SearchFilterState,
    request: PageRequest,
) -> Page<&'a BugRecord> {
    pipeline::paginate(pipeline::apply(records, filters), request)
}

/// Render each row as plain cell text, one entry per column.
pub fn render_rows<'a>(
    rows: impl IntoIterator<Item = &'a BugRecord>,
    columns: &[&ColumnConfig],
) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| column.id.cell(row).format())
                .collect()
        })
        .collect()
}
