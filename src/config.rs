//! Application configuration.
//!
//! Stored in `.bugdeck/config.yaml` and includes:
//! - The remote bug store endpoint and its API key
//! - Grid tuning: pagination mode, page size, row geometry, search debounce

use std::env;
use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BugdeckError, Result};
use crate::filter::pipeline::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::grid::PaginationMode;
use crate::paths::bugdeck_root;
use crate::remote::http::DEFAULT_TIMEOUT_SECS;
use crate::viewport::{
    DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT, VirtualizerConfig,
};

pub const API_URL_ENV: &str = "BUGDECK_API_URL";
pub const API_KEY_ENV: &str = "BUGDECK_API_KEY";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=600;
const PAGE_SIZE_RANGE: RangeInclusive<u64> = 1..=MAX_PAGE_SIZE as u64;
const ROW_HEIGHT_RANGE: RangeInclusive<u64> = 1..=1000;
const VIEWPORT_HEIGHT_RANGE: RangeInclusive<u64> = 1..=100_000;
const OVERSCAN_RANGE: RangeInclusive<u64> = 0..=1000;
const SEARCH_DEBOUNCE_RANGE: RangeInclusive<u64> = 0..=10_000;

/// Keys accepted by `config get` / `config set`.
pub const VALID_KEYS: &[&str] = &[
    "remote.url",
    "remote.api_key",
    "remote.timeout",
    "grid.pagination",
    "grid.page_size",
    "grid.row_height",
    "grid.viewport_height",
    "grid.overscan",
    "grid.search_debounce_ms",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub grid: GridConfig,
}

/// Remote bug store connection
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub timeout: u64,
}

fn default_remote_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout: default_remote_timeout(),
        }
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Grid behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub pagination: PaginationMode,
    pub page_size: usize,
    pub row_height: usize,
    pub viewport_height: usize,
    pub overscan: usize,
    pub search_debounce_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationMode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            row_height: DEFAULT_ROW_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        bugdeck_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            BugdeckError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate().map_err(|e| {
            BugdeckError::Config(format!("{} in {}", e, path.display()))
        })?;
        Ok(config)
    }

    /// Check numeric values against the ranges `set` enforces.
    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        check_range("remote.timeout", self.remote.timeout, TIMEOUT_RANGE)?;
        check_range("grid.page_size", grid.page_size as u64, PAGE_SIZE_RANGE)?;
        check_range("grid.row_height", grid.row_height as u64, ROW_HEIGHT_RANGE)?;
        check_range("grid.viewport_height", grid.viewport_height as u64, VIEWPORT_HEIGHT_RANGE)?;
        check_range("grid.overscan", grid.overscan as u64, OVERSCAN_RANGE)?;
        check_range("grid.search_debounce_ms", grid.search_debounce_ms, SEARCH_DEBOUNCE_RANGE)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BugdeckError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            BugdeckError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // The file may hold an API key: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions).map_err(|e| {
                BugdeckError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to set permissions on config at {}: {}",
                        path.display(),
                        e
                    ),
                ))
            })?;
        }

        Ok(())
    }

    /// Remote base URL from the environment or config file
    pub fn remote_url(&self) -> Option<String> {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return Some(url);
        }
        self.remote.url.clone().filter(|url| !url.is_empty())
    }

    /// API key from the environment or config file
    pub fn api_key(&self) -> Option<String> {
        if let Ok(key) = env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.remote.api_key.clone().filter(|key| !key.is_empty())
    }

    pub fn remote_timeout_secs(&self) -> u64 {
        self.remote.timeout.max(1)
    }

    pub fn virtualizer(&self) -> VirtualizerConfig {
        VirtualizerConfig {
            row_height: self.grid.row_height,
            viewport_height: self.grid.viewport_height,
            overscan: self.grid.overscan,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.grid.search_debounce_ms)
    }

    /// Read a value by dotted key. Unset optional values are `None`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "remote.url" => self.remote_url(),
            "remote.api_key" => self.api_key(),
            "remote.timeout" => Some(self.remote.timeout.to_string()),
            "grid.pagination" => Some(self.grid.pagination.to_string()),
            "grid.page_size" => Some(self.grid.page_size.to_string()),
            "grid.row_height" => Some(self.grid.row_height.to_string()),
            "grid.viewport_height" => Some(self.grid.viewport_height.to_string()),
            "grid.overscan" => Some(self.grid.overscan.to_string()),
            "grid.search_debounce_ms" => Some(self.grid.search_debounce_ms.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a value by dotted key, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "remote.url" => {
                let url = value.trim();
                if !url.is_empty() {
                    crate::remote::http::list_endpoint(url)?;
                }
                self.remote.url = Some(url.to_string()).filter(|v| !v.is_empty());
            }
            "remote.api_key" => {
                self.remote.api_key = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
            "remote.timeout" => self.remote.timeout = parse_number(key, value, TIMEOUT_RANGE)?,
            "grid.pagination" => self.grid.pagination = value.parse()?,
            "grid.page_size" => {
                self.grid.page_size = parse_number(key, value, PAGE_SIZE_RANGE)? as usize;
            }
            "grid.row_height" => {
                self.grid.row_height = parse_number(key, value, ROW_HEIGHT_RANGE)? as usize;
            }
            "grid.viewport_height" => {
                self.grid.viewport_height = parse_number(key, value, VIEWPORT_HEIGHT_RANGE)? as usize;
            }
            "grid.overscan" => {
                self.grid.overscan = parse_number(key, value, OVERSCAN_RANGE)? as usize;
            }
            "grid.search_debounce_ms" => {
                self.grid.search_debounce_ms = parse_number(key, value, SEARCH_DEBOUNCE_RANGE)?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> BugdeckError {
    BugdeckError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}

fn parse_number(key: &str, value: &str, range: RangeInclusive<u64>) -> Result<u64> {
    let parsed: u64 = value.trim().parse().map_err(|_| {
        BugdeckError::Config(format!("invalid value '{value}' for {key}: expected a number"))
    })?;
    check_range(key, parsed, range)?;
    Ok(parsed)
}

fn check_range(key: &str, value: u64, range: RangeInclusive<u64>) -> Result<()> {
    if !range.contains(&value) {
        return Err(BugdeckError::Config(format!(
            "value {value} for {key} is out of range ({}..={})",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}
