//! Filter, sort and paginate bug records in memory.
//!
//! [`apply`] is a pure function: it selects and orders references into the
//! input slice and never invents or mutates records.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::filter::sort::sort_records_by;
use crate::filter::state::SearchFilterState;
use crate::types::BugRecord;

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const MAX_PAGE_SIZE: usize = 500;

/// Filter and sort `records` according to `state`.
pub fn apply<'a>(records: &'a [BugRecord], state: &SearchFilterState) -> Vec<&'a BugRecord> {
    let needle = state.search_term.to_lowercase();
    let mut selected: Vec<&BugRecord> = records
        .iter()
        .filter(|record| matches_with_needle(record, state, &needle))
        .collect();
    sort_records_by(&mut selected, state.sort_by, state.sort_order);
    selected
}

/// Whether a single record passes every active predicate in `state`.
pub fn matches(record: &BugRecord, state: &SearchFilterState) -> bool {
    matches_with_needle(record, state, &state.search_term.to_lowercase())
}

fn matches_with_needle(record: &BugRecord, state: &SearchFilterState, needle: &str) -> bool {
    matches_search(record, needle)
        && in_selection(&state.status_filter, &record.status)
        && in_selection(&state.severity_filter, &record.severity)
        && in_selection(&state.priority_filter, &record.priority)
        && matches_reporter(&state.reporter_filter, record.reporter_name.as_deref())
        && matches_date_range(record, state)
}

fn matches_search(record: &BugRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(&record.title)
        || record.description.as_deref().is_some_and(contains)
        || record.reporter_name.as_deref().is_some_and(contains)
        || contains(&record.id)
}

fn in_selection<T: Ord>(selection: &BTreeSet<T>, value: &T) -> bool {
    selection.is_empty() || selection.contains(value)
}

fn matches_reporter(selection: &BTreeSet<String>, reporter: Option<&str>) -> bool {
    if selection.is_empty() {
        return true;
    }
    reporter.is_some_and(|name| selection.contains(name))
}

fn matches_date_range(record: &BugRecord, state: &SearchFilterState) -> bool {
    let range = &state.date_range;
    if !range.is_active() {
        return true;
    }
    record.created_at.is_some_and(|created| range.contains(created))
}

/// Which page of a list to show. `page_index` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Build a request, clamping the page size to `[1, MAX_PAGE_SIZE]`.
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn first(page_size: usize) -> Self {
        Self::new(0, page_size)
    }

    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of a (possibly larger) result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.page_size.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.page_index.saturating_add(1) < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Zero-based index of the first item on this page within the full list.
    pub fn first_item_index(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

/// Slice a fully filtered list into the requested page.
///
/// A page index past the end is clamped to the last page, so shrinking a
/// result set never strands the reader on an empty page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = items.len();
    let page_size = request.page_size.clamp(1, MAX_PAGE_SIZE);
    let last_page = total_count.saturating_sub(1) / page_size;
    let page_index = request.page_index.min(last_page);
    let start = page_index * page_size;
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page_index,
        page_size,
        total_count,
    }
}
