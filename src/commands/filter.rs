//! Filter commands: edit the persisted search, filter and sort state.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, state_storage};
use crate::cli::dimension_values;
use crate::error::{BugdeckError, Result};
use crate::filter::state::{
    DateRange, FilterDimension, SearchFilterState, SortField, SortOrder, parse_date_bound,
};
use crate::filter::store::FilterStore;

fn load_store() -> FilterStore {
    FilterStore::load(state_storage())
}

fn join_or_any<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    let joined: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
    if joined.is_empty() {
        "any".to_string()
    } else {
        joined.join(", ")
    }
}

/// Human-readable summary of a filter state.
pub fn describe_filters(state: &SearchFilterState) -> String {
    let mut text = String::new();
    let search = if state.search_term.is_empty() {
        "none".dimmed().to_string()
    } else {
        format!("\"{}\"", state.search_term)
    };
    text.push_str(&format!("{}: {search}\n", "search".cyan()));
    text.push_str(&format!(
        "{}: {}\n",
        "status".cyan(),
        join_or_any(&state.status_filter)
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "severity".cyan(),
        join_or_any(&state.severity_filter)
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "priority".cyan(),
        join_or_any(&state.priority_filter)
    ));
    text.push_str(&format!(
        "{}: {}\n",
        "reporter".cyan(),
        join_or_any(&state.reporter_filter)
    ));

    let bound = |b: Option<jiff::Timestamp>| b.map_or("open".to_string(), |t| t.to_string());
    text.push_str(&format!(
        "{}: {} .. {}\n",
        "created".cyan(),
        bound(state.date_range.start),
        bound(state.date_range.end)
    ));
    text.push_str(&format!(
        "{}: {} {}",
        "sort".cyan(),
        state.sort_by,
        state.sort_order
    ));
    text
}

pub fn cmd_filter_show(json: bool) -> Result<()> {
    let store = load_store();
    let state = store.state();
    CommandOutput::new(serde_json::to_value(state)?)
        .with_text(describe_filters(state))
        .print(json)
}

pub fn cmd_filter_search(term: &str) -> Result<()> {
    let mut store = load_store();
    store.update(|s| s.set_search_term(term.trim()));
    if term.trim().is_empty() {
        println!("Cleared search");
    } else {
        println!("Search set to \"{}\"", term.trim().cyan());
    }
    Ok(())
}

pub fn cmd_filter_toggle(dimension: FilterDimension, value: &str) -> Result<()> {
    let mut store = load_store();
    let selected = store
        .update(|s| s.toggle(dimension, value))
        .map_err(|e| {
            let valid = dimension_values(dimension);
            if valid.is_empty() {
                e
            } else {
                BugdeckError::Other(format!("{e}. Must be one of: {}", valid.join(", ")))
            }
        })?;

    let verb = if selected { "Added" } else { "Removed" };
    println!(
        "{verb} {} {} filter ({} selected)",
        value.trim().cyan(),
        dimension,
        store.state().selected_count(dimension)
    );
    Ok(())
}

pub fn cmd_filter_range(from: Option<&str>, to: Option<&str>) -> Result<()> {
    let start = from.map(|s| parse_date_bound(s, false)).transpose()?;
    let end = to.map(|s| parse_date_bound(s, true)).transpose()?;

    let range = DateRange::new(start, end);
    let mut store = load_store();
    let mut candidate = store.state().clone();
    candidate.set_date_range(range);
    candidate.validate()?;
    store.update(|s| s.set_date_range(range));

    if start.is_none() && end.is_none() {
        println!("Cleared date range");
    } else {
        println!(
            "Date range set to {} .. {}",
            start.map_or("open".to_string(), |t| t.to_string()),
            end.map_or("open".to_string(), |t| t.to_string())
        );
    }
    Ok(())
}

pub fn cmd_filter_sort(field: SortField, order: Option<SortOrder>) -> Result<()> {
    let mut store = load_store();
    store.update(|s| match order {
        Some(order) => s.set_sort(field, order),
        None => s.toggle_sort(field),
    });
    let state = store.state();
    println!("Sorting by {} {}", state.sort_by.cyan(), state.sort_order);
    Ok(())
}

pub fn cmd_filter_clear(all: bool, json: bool) -> Result<()> {
    let mut store = load_store();
    if all {
        store.reset();
    } else {
        store.update(|s| s.clear_filters());
    }
    let output = json!({
        "action": "filter_clear",
        "sort_reset": all,
        "state": store.state(),
    });
    let text = if all {
        "Reset filters and sort"
    } else {
        "Cleared filters"
    };
    CommandOutput::new(output).with_text(text).print(json)
}
