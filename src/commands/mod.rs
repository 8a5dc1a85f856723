mod browse;
mod config;
mod ls;

pub use browse::{BrowseCommand, BrowseOptions, cmd_browse, parse_browse_command};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use ls::{ListArgs, cmd_list};

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::print_json;
use crate::error::{FolioError, Result};
use crate::list::FetchOutcome;
use crate::remote::{FilterSet, HttpCollection, SharedCollection, WithFallback};
use crate::types::{Listable, static_collection};

/// Output of a command: JSON always, optional human-readable text.
pub struct CommandOutput {
    json: serde_json::Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: serde_json::Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, the text otherwise (JSON if no text).
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

/// Build the collection a list reads from.
///
/// `offline` serves the built-in sample data. Otherwise the API is used,
/// wrapped in a static fallback when sample data exists and
/// `static_fallback` is enabled.
pub fn build_source<T: Listable>(config: &Config, offline: bool) -> Result<SharedCollection<T>> {
    let samples = T::sample_data();

    if offline {
        if samples.is_empty() {
            return Err(FolioError::Config(format!(
                "no offline data available for {}",
                T::KIND
            )));
        }
        return Ok(Arc::new(static_collection(samples)));
    }

    let remote = HttpCollection::<T>::from_config(config, T::KIND.path());
    if !config.static_fallback || samples.is_empty() {
        return Ok(Arc::new(remote?));
    }

    let fallback: SharedCollection<T> = Arc::new(static_collection(samples));
    match remote {
        Ok(remote) => Ok(Arc::new(WithFallback::new(Arc::new(remote), fallback))),
        Err(e) => {
            tracing::warn!("Cannot reach the API ({e}), serving built-in {}", T::KIND);
            Ok(fallback)
        }
    }
}

/// Filter set from command-line pairs, validated.
pub fn filters_from_pairs(pairs: &[(String, String)]) -> Result<FilterSet> {
    let mut filters = FilterSet::new();
    for (key, value) in pairs {
        filters.insert(key, value)?;
    }
    Ok(filters)
}

/// Wait for a spawned fetch.
pub async fn join_fetch(handle: JoinHandle<FetchOutcome>) -> Result<FetchOutcome> {
    handle
        .await
        .map_err(|e| FolioError::Other(format!("fetch task failed: {e}")))
}
