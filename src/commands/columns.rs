//! Column commands: reorder, resize, show and hide grid columns.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, state_storage};
use crate::error::{BugdeckError, Result};
use crate::grid::{ColumnId, ColumnStore};

fn load_store() -> ColumnStore {
    ColumnStore::load(state_storage())
}

pub fn cmd_columns_show(json: bool) -> Result<()> {
    let store = load_store();

    let mut text = String::new();
    for column in store.columns() {
        let marker = if column.visible {
            "x".green().to_string()
        } else {
            " ".to_string()
        };
        let lock = if column.can_hide { "" } else { " (locked)" };
        text.push_str(&format!(
            "{:>2}. [{marker}] {:<14} {:<12} {}px{}\n",
            column.order,
            column.id.to_string().cyan(),
            column.label,
            column.width,
            lock.dimmed()
        ));
    }

    CommandOutput::new(serde_json::to_value(store.columns())?)
        .with_text(text.trim_end())
        .print(json)
}

pub fn cmd_columns_move(from: usize, to: usize) -> Result<()> {
    let mut store = load_store();
    let count = store.columns().len();
    if from >= count || to >= count {
        return Err(BugdeckError::Other(format!(
            "column position out of range: {from} -> {to}, expected 0..{}",
            count - 1
        )));
    }
    let id = store.columns()[from].id;
    if store.move_column(from, to) {
        println!("Moved {} to position {to}", id.cyan());
    } else {
        println!("{} is already at position {to}", id.cyan());
    }
    Ok(())
}

pub fn cmd_columns_hide(id: ColumnId) -> Result<()> {
    let mut store = load_store();
    if store.set_visibility(id, false)? {
        println!("Hid {}", id.cyan());
    } else {
        println!("{} is already hidden", id.cyan());
    }
    Ok(())
}

pub fn cmd_columns_unhide(id: ColumnId) -> Result<()> {
    let mut store = load_store();
    if store.set_visibility(id, true)? {
        println!("Showing {}", id.cyan());
    } else {
        println!("{} is already visible", id.cyan());
    }
    Ok(())
}

pub fn cmd_columns_width(id: ColumnId, width: u32) -> Result<()> {
    let mut store = load_store();
    let stored = store
        .set_width(id, width)
        .ok_or_else(|| BugdeckError::UnknownColumn(id.to_string()))?;
    if stored != width {
        println!("Set {} width to {stored}px (clamped from {width})", id.cyan());
    } else {
        println!("Set {} width to {stored}px", id.cyan());
    }
    Ok(())
}

pub fn cmd_columns_reset(json: bool) -> Result<()> {
    let mut store = load_store();
    store.reset_to_defaults();
    CommandOutput::new(json!({
        "action": "columns_reset",
        "columns": store.columns(),
    }))
    .with_text("Restored default columns")
    .print(json)
}

pub fn cmd_columns_show_all() -> Result<()> {
    load_store().show_all();
    println!("All columns visible");
    Ok(())
}

pub fn cmd_columns_hide_all() -> Result<()> {
    let mut store = load_store();
    store.hide_all();
    let kept: Vec<String> = store
        .visible_columns()
        .iter()
        .map(|c| c.id.to_string())
        .collect();
    println!("Hid all optional columns (kept: {})", kept.join(", "));
    Ok(())
}
