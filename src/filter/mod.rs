//! Search, filter and sort state and the in-memory pipeline that applies it.

pub mod pipeline;
pub mod sort;
pub mod state;
pub mod store;

pub use pipeline::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest, apply, matches, paginate};
pub use sort::{compare_records, sort_records_by};
pub use state::{
    DateRange, FilterDimension, SearchFilterState, SortField, SortOrder, parse_date_bound,
};
pub use store::{FILTERS_KEY, FilterStore};
