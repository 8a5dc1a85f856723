//! Configuration commands for managing folio settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Read one value (tokens are masked)
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let mut values = serde_json::Map::new();
    for key in CONFIG_KEYS {
        values.insert(key.to_string(), json!(config.get(key)?));
    }
    let base_url = config.api_base_url();
    let token_configured = config.api_token().is_some();

    let json_output = json!({
        "values": values,
        "effective_base_url": base_url,
        "token_configured": token_configured,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = format!("{}\n\n", "Configuration:".cyan().bold());
    for key in CONFIG_KEYS {
        let value = config.get(key)?;
        let shown = if value.is_empty() {
            "not configured".dimmed().to_string()
        } else {
            value
        };
        text_output.push_str(&format!("  {}: {}\n", key.cyan(), shown));
    }
    if let Some(url) = &base_url
        && config.api.base_url.as_deref() != Some(url.as_str())
    {
        text_output.push_str(&format!(
            "\n{}\n",
            format!("api.base_url overridden by environment: {url}").dimmed()
        ));
    }
    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
        "masked": key == "api.token",
    }))
    .with_text(value)
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "success": true,
    }))
    .with_text(format!("Set {}", key.cyan()))
    .print(output)
}
