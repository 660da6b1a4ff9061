use std::fs;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use serde::Deserialize;
use serde_json::json;

use super::{print_json, state_storage};
use crate::config::Config;
use crate::display::render_grid_table;
use crate::error::{BugdeckError, Result};
use crate::filter::pipeline::{Page, PageRequest};
use crate::filter::state::SearchFilterState;
use crate::filter::store::FilterStore;
use crate::grid::{ColumnConfig, ColumnStore, PaginationMode, client_page};
use crate::orchestrator::{FetchOrchestrator, FetchOutcome};
use crate::paths::bugdeck_root;
use crate::remote::{BugSource, HttpBugSource, LocalBugSource};
use crate::types::BugRecord;
use crate::viewport::compute_window;

pub struct LsOptions {
    pub file: Option<PathBuf>,
    pub remote: bool,
    /// 1-based page number
    pub page: u64,
    pub page_size: Option<usize>,
    pub scroll: usize,
    pub json: bool,
}

/// Default location of exported bug records.
pub fn default_bugs_path() -> PathBuf {
    bugdeck_root().join("bugs.json")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    List(Vec<BugRecord>),
    Wrapped { bugs: Vec<BugRecord> },
}

/// Read bug records from a JSON array or a `{"bugs": [...]}` export.
pub fn load_records(path: &Path) -> Result<Vec<BugRecord>> {
    let content = fs::read_to_string(path).map_err(|e| {
        BugdeckError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read bugs at {}: {}", path.display(), e),
        ))
    })?;
    let parsed: RecordsFile = serde_json::from_str(&content)?;
    Ok(match parsed {
        RecordsFile::List(records) | RecordsFile::Wrapped { bugs: records } => records,
    })
}

/// Build the orchestrator used for server-side pages.
fn server_orchestrator<S: BugSource>(source: S, config: &Config) -> FetchOrchestrator<S> {
    FetchOrchestrator::new(source).with_debounce(config.search_debounce())
}

async fn fetch_server_page<S: BugSource>(
    orchestrator: &FetchOrchestrator<S>,
    request: PageRequest,
    filters: &SearchFilterState,
) -> Result<Page<BugRecord>> {
    match orchestrator.fetch(request, filters).await {
        FetchOutcome::Applied { .. } => {
            let data = orchestrator.snapshot();
            // a past-end request is served as the last page
            let last_page = data.total_count.saturating_sub(1) / request.page_size;
            Ok(Page {
                items: data.records,
                page_index: request.page_index.min(last_page),
                page_size: request.page_size,
                total_count: data.total_count,
            })
        }
        FetchOutcome::Failed(message) => Err(BugdeckError::Other(message)),
        FetchOutcome::Stale => Err(BugdeckError::Other(
            "fetch was superseded by a newer request".to_string(),
        )),
    }
}

/// Show one page of bugs through the visible columns.
pub async fn cmd_ls(options: LsOptions) -> Result<()> {
    let config = Config::load()?;
    let storage = state_storage();
    let filters = FilterStore::load(storage.clone()).state().clone();
    filters.validate()?;
    let columns = ColumnStore::load(storage);

    let page_size = options.page_size.unwrap_or(config.grid.page_size);
    let page_index = usize::try_from(options.page.saturating_sub(1)).unwrap_or(usize::MAX);
    let request = PageRequest::new(page_index, page_size);
    let mode = if options.remote {
        PaginationMode::Server
    } else {
        config.grid.pagination
    };

    let page = match (mode, options.file) {
        (PaginationMode::Client, file) => {
            let path = file.unwrap_or_else(default_bugs_path);
            let records = load_records(&path)?;
            client_page(&records, &filters, request).map(BugRecord::clone)
        }
        (PaginationMode::Server, Some(path)) => {
            let source = LocalBugSource::new(load_records(&path)?);
            fetch_server_page(&server_orchestrator(source, &config), request, &filters).await?
        }
        (PaginationMode::Server, None) => {
            let source = HttpBugSource::from_config(&config)?;
            fetch_server_page(&server_orchestrator(source, &config), request, &filters).await?
        }
    };

    let visible = columns.visible_columns();
    let window = compute_window(page.items.len(), &config.virtualizer(), options.scroll);

    if options.json {
        let window_json = window.map(|w| {
            json!({
                "start": w.start,
                "end": w.end,
                "totalHeight": w.total_height,
                "scrollOffset": w.scroll_offset,
            })
        });
        let output = json!({
            "mode": mode.to_string(),
            "page": page.page_index.saturating_add(1),
            "pageSize": page.page_size,
            "pageCount": page.page_count(),
            "totalCount": page.total_count,
            "columns": visible.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            "window": window_json,
            "bugs": page.items,
        });
        return print_json(&output);
    }

    let Some(window) = window else {
        if filters.has_active_filters() {
            println!("No bugs match the current filters (see 'bugdeck filter show')");
        } else {
            println!("No bugs");
        }
        return Ok(());
    };

    let rows = window.rows().map(|row| &page.items[row.index]);
    println!("{}", render_grid_table(&visible, rows));
    println!("{}", footer(&page, window.start, window.end, &visible).dimmed());
    Ok(())
}

fn footer(page: &Page<BugRecord>, start: usize, end: usize, visible: &[&ColumnConfig]) -> String {
    let first = page.first_item_index().saturating_add(1);
    let last = page.first_item_index().saturating_add(page.items.len());
    format!(
        "page {} of {} | bugs {first}-{last} of {} | rows {}-{} rendered | {} columns",
        page.page_index.saturating_add(1),
        page.page_count().max(1),
        page.total_count,
        start + 1,
        end + 1,
        visible.len()
    )
}
