//! Debounced, race-safe page fetching.
//!
//! Every request is tagged with a generation number taken from a shared,
//! monotonically increasing counter. A response is applied only if its
//! generation is still the latest when it arrives, so a slow older request
//! can never overwrite the result of a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::filter::pipeline::PageRequest;
use crate::filter::state::SearchFilterState;
use crate::remote::{BugPage, BugQuery, BugSource, Facets};
use crate::types::BugRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A short status message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(message: String, level: NoticeLevel) -> Self {
        Self { message, level }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), NoticeLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), NoticeLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), NoticeLevel::Error)
    }
}

/// The current page as last applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridData {
    pub records: Vec<BugRecord>,
    pub total_count: usize,
    pub facets: Facets,
    pub loading: bool,
    pub last_error: Option<String>,
    pub notice: Option<Notice>,
}

/// What happened to one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response became the current page.
    Applied { count: usize, total: usize },
    /// A newer request was issued first; the result was discarded.
    Stale,
    /// The request failed; the previous page is still shown.
    Failed(String),
}

/// Issues page requests against a [`BugSource`] and keeps the newest
/// successful result.
pub struct FetchOrchestrator<S> {
    source: Arc<S>,
    data: Arc<Mutex<GridData>>,
    generation: Arc<AtomicU64>,
    debounce: Duration,
}

impl<S> Clone for FetchOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            data: Arc::clone(&self.data),
            generation: Arc::clone(&self.generation),
            debounce: self.debounce,
        }
    }
}

impl<S: BugSource> FetchOrchestrator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            data: Arc::new(Mutex::new(GridData::default())),
            generation: Arc::new(AtomicU64::new(0)),
            debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The generation of the most recently issued request.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// A copy of the current page data.
    pub fn snapshot(&self) -> GridData {
        self.data.lock().clone()
    }

    /// Fetch a page immediately.
    pub async fn fetch(&self, request: PageRequest, filters: &SearchFilterState) -> FetchOutcome {
        let generation = self.next_generation();
        self.run(generation, BugQuery::from_filters(request, filters))
            .await
    }

    /// Fetch a page after the debounce window, unless another request is
    /// issued while waiting.
    pub async fn fetch_debounced(
        &self,
        request: PageRequest,
        filters: &SearchFilterState,
    ) -> FetchOutcome {
        let generation = self.next_generation();
        let query = BugQuery::from_filters(request, filters);

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "debounced fetch superseded before sending");
            return FetchOutcome::Stale;
        }
        self.run(generation, query).await
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(&self, generation: u64, query: BugQuery) -> FetchOutcome {
        self.data.lock().loading = true;

        let result = self.source.fetch_page(&query).await;

        let mut data = self.data.lock();
        // checked under the lock so a newer response cannot slip in between
        if !self.is_current(generation) {
            tracing::debug!(generation, "discarding stale response");
            return FetchOutcome::Stale;
        }

        data.loading = false;
        match result {
            Ok(page) => apply_page(&mut data, page, &query),
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(generation, error = %message, "failed to fetch bugs");
                data.last_error = Some(message.clone());
                data.notice = Some(Notice::error(format!("Failed to fetch bugs: {message}")));
                FetchOutcome::Failed(message)
            }
        }
    }
}

fn apply_page(data: &mut GridData, page: BugPage, query: &BugQuery) -> FetchOutcome {
    let count = page.records.len();
    let total = page.total_count;

    let message = if !query.search.is_empty() {
        format!("Found {total} matches")
    } else if count < total {
        format!("Loaded {count} of {total} bugs")
    } else {
        format!("Loaded {count} bugs")
    };

    data.records = page.records;
    data.total_count = total;
    data.facets = page.facets;
    data.last_error = None;
    data.notice = Some(Notice::info(message));

    FetchOutcome::Applied { count, total }
}
