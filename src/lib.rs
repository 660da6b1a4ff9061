#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod grid;
pub mod orchestrator;
pub mod paths;
pub mod remote;
pub mod storage;
pub mod types;
pub mod viewport;

#[cfg(test)]
mod test_guards;

pub use config::Config;
pub use error::{BugdeckError, Result};
pub use filter::{
    DateRange, FilterDimension, FilterStore, Page, PageRequest, SearchFilterState, SortField,
    SortOrder, apply, paginate,
};
pub use grid::{ColumnConfig, ColumnId, ColumnStore, PaginationMode, client_page};
pub use orchestrator::{FetchOrchestrator, FetchOutcome, GridData, Notice, NoticeLevel};
pub use remote::{BugPage, BugQuery, BugSource, Facets, HttpBugSource, LocalBugSource};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::{Attachment, BugRecord, BugStatus, Priority, Severity};
pub use viewport::{RenderWindow, VirtualRow, VirtualizerConfig, compute_window, scroll_into_view};
