//! Configuration commands for managing bugdeck settings.
//!
//! - `config set`: Set a configuration value
//! - `config get`: Read one value (secrets are masked)
//! - `config show`: Display current configuration

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{API_KEY_ENV, API_URL_ENV, Config};
use crate::error::{BugdeckError, Result};

const SENSITIVE_KEYS: &[&str] = &["remote.api_key"];

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

/// Reject `remote_url`-style keys with a hint towards dot notation
fn validate_config_key(key: &str) -> Result<&str> {
    if !key.contains('.')
        && let Some(pos) = key.find('_')
    {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        return Err(BugdeckError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dot_version}'"
        )));
    }
    Ok(key)
}

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let remote_url = config.remote_url();
    let api_key_configured = config.api_key().is_some();

    let json_output = json!({
        "remote": {
            "url": remote_url,
            "api_key_configured": api_key_configured,
            "timeout": config.remote.timeout,
        },
        "grid": serde_json::to_value(&config.grid)?,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text.push_str(&format!("{}:\n", "remote".cyan()));
    match &remote_url {
        Some(url) => text.push_str(&format!("  url: {url}\n")),
        None => text.push_str(&format!(
            "  url: {} (set remote.url or {API_URL_ENV})\n",
            "not configured".dimmed()
        )),
    }
    let key_status = if api_key_configured {
        "configured".green().to_string()
    } else {
        format!("{} ({API_KEY_ENV})", "not configured".dimmed())
    };
    text.push_str(&format!("  api_key: {key_status}\n"));
    text.push_str(&format!("  timeout: {}s\n\n", config.remote.timeout));

    text.push_str(&format!("{}:\n", "grid".cyan()));
    text.push_str(&format!("  pagination: {}\n", config.grid.pagination));
    text.push_str(&format!("  page_size: {}\n", config.grid.page_size));
    text.push_str(&format!("  row_height: {}px\n", config.grid.row_height));
    text.push_str(&format!(
        "  viewport_height: {}px\n",
        config.grid.viewport_height
    ));
    text.push_str(&format!("  overscan: {}\n", config.grid.overscan));
    text.push_str(&format!(
        "  search_debounce_ms: {}\n\n",
        config.grid.search_debounce_ms
    ));

    text.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, json: bool) -> Result<()> {
    validate_config_key(key)?;
    let config = Config::load()?;

    let value = config
        .get(key)?
        .ok_or_else(|| BugdeckError::Config(format!("{key} not set")))?;

    let (json_output, text) = if SENSITIVE_KEYS.contains(&key) {
        let masked = mask_sensitive_value(&value);
        (
            json!({ "key": key, "value": masked, "masked": true }),
            format!("{masked} (masked - showing first 2 and last 2 characters)"),
        )
    } else {
        (json!({ "key": key, "value": value }), value)
    };

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, json: bool) -> Result<()> {
    validate_config_key(key)?;
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if SENSITIVE_KEYS.contains(&key) {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "success": true,
    }))
    .with_text(format!("Set {} to {shown}", key.cyan()))
    .print(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_sensitive_value_ascii() {
        assert_eq!(mask_sensitive_value("abcdef"), "ab...ef");
        assert_eq!(mask_sensitive_value("12345678"), "12...78");
    }

    #[test]
    fn test_mask_sensitive_value_short() {
        assert_eq!(mask_sensitive_value("abcd"), "****");
        assert_eq!(mask_sensitive_value(""), "****");
    }

    #[test]
    fn test_mask_sensitive_value_multibyte_utf8() {
        assert_eq!(mask_sensitive_value("🔑🔒🔓🔐🗝"), "🔑🔒...🔐🗝");
        assert_eq!(mask_sensitive_value("日本語中文"), "日本...中文");
    }

    #[test]
    fn test_validate_config_key() {
        assert!(validate_config_key("grid.page_size").is_ok());
        let err = validate_config_key("remote_url").unwrap_err();
        assert!(err.to_string().contains("remote.url"));
    }
}
