use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    /// The remote collection could not be fetched (transport or HTTP failure).
    #[error("fetch failed ({}): {message}", fetch_source(.status))]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    /// Client-side input rejected before any request was made.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid role '{0}'")]
    InvalidRole(String),

    #[error("unknown collection '{0}'")]
    InvalidCollection(String),

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("remote operation timed out after {seconds} seconds")]
    RemoteTimeout { seconds: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl FolioError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FolioError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        FolioError::Fetch {
            status,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;

fn fetch_source(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!("HTTP {status}"),
        None => "network".to_string(),
    }
}
