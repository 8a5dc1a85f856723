//! Application configuration.
//!
//! Configuration is stored in `config.yaml`, looked up in order:
//! - the path in `FOLIO_CONFIG`
//! - `.folio/config.yaml` in the working directory, if present
//! - the platform user config directory
//!
//! `FOLIO_API_URL` and `FOLIO_API_TOKEN` override the file values.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

pub const CONFIG_ENV: &str = "FOLIO_CONFIG";
pub const API_URL_ENV: &str = "FOLIO_API_URL";
pub const API_TOKEN_ENV: &str = "FOLIO_API_TOKEN";

/// Keys accepted by `folio config get/set`.
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.token",
    "page_size",
    "search_debounce_ms",
    "remote_timeout",
    "retry_attempts",
    "static_fallback",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Publishing API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Rows per page (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet interval before search input settles, in milliseconds (default: 300)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,

    /// Retries for transient remote failures (default: 2)
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Serve built-in sample data when the journal list cannot be fetched
    #[serde(default = "default_static_fallback")]
    pub static_fallback: bool,
}

fn default_page_size() -> u32 {
    10
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_remote_timeout() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_static_fallback() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            remote_timeout: default_remote_timeout(),
            retry_attempts: default_retry_attempts(),
            static_fallback: default_static_fallback(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Resolve the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV)
            && !path.is_empty()
        {
            return PathBuf::from(path);
        }

        let local = PathBuf::from(".folio").join("config.yaml");
        if local.exists() {
            return local;
        }

        ProjectDirs::from("org", "folio", "folio")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .unwrap_or(local)
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            FolioError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;

        // The file may hold an API token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(FolioError::Config("page_size must be at least 1".to_string()));
        }
        if self.remote_timeout == 0 {
            return Err(FolioError::Config("remote_timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// API base URL from environment variable or config
    pub fn api_base_url(&self) -> Option<String> {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return Some(url);
        }

        self.api.base_url.clone()
    }

    /// API token from environment variable or config
    pub fn api_token(&self) -> Option<String> {
        if let Ok(token) = env::var(API_TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }

        self.api.token.clone()
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Read a value by dotted key. Tokens are masked.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone().unwrap_or_default(),
            "api.token" => self
                .api
                .token
                .as_ref()
                .map(|t| mask_token(t))
                .unwrap_or_default(),
            "page_size" => self.page_size.to_string(),
            "search_debounce_ms" => self.search_debounce_ms.to_string(),
            "remote_timeout" => self.remote_timeout.to_string(),
            "retry_attempts" => self.retry_attempts.to_string(),
            "static_fallback" => self.static_fallback.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a value by dotted key, parsing it for the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                url::Url::parse(value)?;
                self.api.base_url = Some(value.to_string());
            }
            "api.token" => self.api.token = Some(value.to_string()),
            "page_size" => {
                let size = parse_number::<u32>(key, value)?;
                if size == 0 {
                    return Err(FolioError::Config("page_size must be at least 1".to_string()));
                }
                self.page_size = size;
            }
            "search_debounce_ms" => self.search_debounce_ms = parse_number(key, value)?,
            "remote_timeout" => {
                let seconds = parse_number::<u64>(key, value)?;
                if seconds == 0 {
                    return Err(FolioError::Config(
                        "remote_timeout must be at least 1 second".to_string(),
                    ));
                }
                self.remote_timeout = seconds;
            }
            "retry_attempts" => self.retry_attempts = parse_number(key, value)?,
            "static_fallback" => {
                self.static_fallback = value.parse().map_err(|_| {
                    FolioError::Config(format!(
                        "static_fallback must be true or false, got '{value}'"
                    ))
                })?
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        FolioError::Config(format!(
            "{key} must be a non-negative integer, got '{value}'"
        ))
    })
}

fn unknown_key(key: &str) -> FolioError {
    FolioError::Config(format!(
        "unknown config key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn mask_token(token: &str) -> String {
    if token.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{tail}")
}
