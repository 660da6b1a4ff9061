//! Access to the page-based bug list endpoint.
//!
//! [`BugSource`] is the seam between the fetch orchestrator and the data:
//! [`HttpBugSource`] talks to a remote store, [`LocalBugSource`] answers the
//! same queries in memory.

pub mod error;
pub mod http;

use std::collections::BTreeSet;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::pipeline::{self, PageRequest};
use crate::filter::state::{DateRange, SearchFilterState, SortField, SortOrder};
use crate::types::{BugRecord, BugStatus, Priority, Severity};

pub use error::ApiError;
pub use http::HttpBugSource;

/// Parameters of one list request. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugQuery {
    pub page: usize,
    pub page_size: usize,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub search: String,
    pub status: Vec<BugStatus>,
    pub severity: Vec<Severity>,
    pub priority: Vec<Priority>,
    pub reporter: Vec<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl BugQuery {
    pub fn from_filters(request: PageRequest, filters: &SearchFilterState) -> Self {
        Self {
            page: request.page_index.saturating_add(1),
            page_size: request.page_size,
            sort_by: filters.sort_by,
            sort_order: filters.sort_order,
            search: filters.search_term.trim().to_string(),
            status: filters.status_filter.iter().copied().collect(),
            severity: filters.severity_filter.iter().copied().collect(),
            priority: filters.priority_filter.iter().copied().collect(),
            reporter: filters.reporter_filter.iter().cloned().collect(),
            start_date: filters.date_range.start,
            end_date: filters.date_range.end,
        }
    }

    /// The zero-based page this query asks for.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.saturating_sub(1), self.page_size)
    }

    /// Rebuild the filter state this query encodes.
    pub fn to_filter_state(&self) -> SearchFilterState {
        SearchFilterState {
            search_term: self.search.clone(),
            status_filter: self.status.iter().copied().collect(),
            severity_filter: self.severity.iter().copied().collect(),
            priority_filter: self.priority.iter().copied().collect(),
            reporter_filter: self.reporter.iter().cloned().collect(),
            date_range: DateRange::new(self.start_date, self.end_date),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }

    /// Query-string parameters. Empty values are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sortBy", self.sort_by.to_string()),
            ("sortOrder", self.sort_order.to_string()),
        ];
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        push_joined(&mut params, "status", self.status.iter().map(|s| s.as_str()));
        push_joined(&mut params, "severity", self.severity.iter().map(|s| s.as_str()));
        push_joined(&mut params, "priority", self.priority.iter().map(|p| p.as_str()));
        push_joined(&mut params, "reporter", self.reporter.iter().map(String::as_str));
        if let Some(start) = self.start_date {
            params.push(("startDate", start.to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("endDate", end.to_string()));
        }
        params
    }
}

fn push_joined<'a>(
    params: &mut Vec<(&'static str, String)>,
    name: &'static str,
    values: impl Iterator<Item = &'a str>,
) {
    let joined = values.collect::<Vec<_>>().join(",");
    if !joined.is_empty() {
        params.push((name, joined));
    }
}

/// Filter options derived from the whole data set, not just one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facets {
    pub reporters: Vec<String>,
}

impl Facets {
    /// Distinct reporter names, sorted.
    pub fn from_records(records: &[BugRecord]) -> Self {
        let reporters: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.reporter_name.as_deref())
            .filter(|name| !name.is_empty())
            .collect();
        Self {
            reporters: reporters.into_iter().map(str::to_string).collect(),
        }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BugPage {
    pub records: Vec<BugRecord>,
    pub total_count: usize,
    pub facets: Facets,
}

/// Anything that can answer a [`BugQuery`].
pub trait BugSource: Send + Sync {
    fn fetch_page(
        &self,
        query: &BugQuery,
    ) -> impl std::future::Future<Output = Result<BugPage>> + Send;
}

/// Serves queries from an in-memory record list by running the local
/// pipeline, the way the remote store would.
#[derive(Debug, Clone, Default)]
pub struct LocalBugSource {
    records: Vec<BugRecord>,
    latency: Option<Duration>,
}

impl LocalBugSource {
    pub fn new(records: Vec<BugRecord>) -> Self {
        Self {
            records,
            latency: None,
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn records(&self) -> &[BugRecord] {
        &self.records
    }

    /// Answer a query synchronously.
    pub fn query(&self, query: &BugQuery) -> BugPage {
        let filters = query.to_filter_state();
        let matched = pipeline::apply(&self.records, &filters);
        let page = pipeline::paginate(matched, query.page_request());
        BugPage {
            total_count: page.total_count,
            records: page.items.into_iter().cloned().collect(),
            facets: Facets::from_records(&self.records),
        }
    }
}

impl BugSource for LocalBugSource {
    async fn fetch_page(&self, query: &BugQuery) -> Result<BugPage> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.query(query))
    }
}
