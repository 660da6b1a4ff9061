mod columns;
mod config;
mod filter;
mod ls;

pub use columns::{
    cmd_columns_hide, cmd_columns_hide_all, cmd_columns_move, cmd_columns_reset,
    cmd_columns_show, cmd_columns_show_all, cmd_columns_unhide, cmd_columns_width,
};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use filter::{
    cmd_filter_clear, cmd_filter_range, cmd_filter_search, cmd_filter_show, cmd_filter_sort,
    cmd_filter_toggle,
};
pub use ls::{LsOptions, cmd_ls};

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::paths::state_dir;
use crate::storage::{FileStorage, Storage};

/// Storage backing the persisted filter and column state.
pub fn state_storage() -> Arc<dyn Storage> {
    Arc::new(FileStorage::new(state_dir()))
}

/// Print pretty JSON to stdout.
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A command result that can be printed as JSON or as human text.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, as_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !as_json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}
