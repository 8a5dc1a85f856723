//! Error type for the HTTP collection client.
//!
//! `ApiError` keeps the HTTP status and Retry-After information around long
//! enough for the retry loop to decide, then folds into `FolioError`.

use std::fmt;

use crate::error::FolioError;

use super::AsHttpError;

#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if a response was received
    pub status: Option<reqwest::StatusCode>,
    /// Retry-After header value in seconds, if available
    pub retry_after: Option<u64>,
    /// Human-readable error message
    pub message: String,
    /// Transport-level failure (connect, timeout, reset)
    transport: bool,
    /// Request hit the client timeout
    timed_out: bool,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            retry_after: None,
            message: message.into(),
            transport: false,
            timed_out: false,
        }
    }

    pub fn with_status(message: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Self::new(message)
        }
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }

    /// Convert to a `FolioError`, given the configured client timeout for
    /// the timeout message.
    pub fn into_folio_error(self, timeout_secs: u64) -> FolioError {
        if self.timed_out {
            return FolioError::RemoteTimeout {
                seconds: timeout_secs,
            };
        }
        if self.is_rate_limited() {
            return FolioError::RateLimited(self.retry_after.unwrap_or(60));
        }
        FolioError::Fetch {
            status: self.status.map(|s| s.as_u16()),
            message: self.message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl AsHttpError for ApiError {
    fn as_http_error(&self) -> Option<(reqwest::StatusCode, Option<u64>)> {
        self.status.map(|s| (s, self.retry_after))
    }

    fn is_transient(&self) -> bool {
        if let Some(status) = self.status {
            return status.is_server_error();
        }
        self.transport
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status(),
            retry_after: None,
            transport: err.is_connect() || err.is_timeout() || err.is_request(),
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

/// Pull a readable message out of an error response body.
///
/// Accepts `{"detail": "..."}`, `{"message": "..."}` or `{"error": "..."}`,
/// otherwise falls back to the canonical reason phrase.
pub fn error_message_from_body(status: reqwest::StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        });

    match from_json {
        Some(message) if !message.is_empty() => message,
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_server_error_is_transient() {
        let err = ApiError::with_status("boom", StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_transient());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_client_error_is_not_transient() {
        let err = ApiError::with_status("missing", StatusCode::NOT_FOUND);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_rate_limited_maps_to_rate_limited_error() {
        let err = ApiError::with_status("slow down", StatusCode::TOO_MANY_REQUESTS)
            .with_retry_after(12);
        assert!(err.is_rate_limited());
        assert!(matches!(err.into_folio_error(30), FolioError::RateLimited(12)));
    }

    #[test]
    fn test_status_is_preserved_in_fetch_error() {
        let err = ApiError::with_status("Internal Server Error", StatusCode::INTERNAL_SERVER_ERROR);
        match err.into_folio_error(30) {
            FolioError::Fetch { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_message_from_body() {
        let status = StatusCode::FORBIDDEN;
        assert_eq!(
            error_message_from_body(status, r#"{"detail": "Editors only"}"#),
            "Editors only"
        );
        assert_eq!(
            error_message_from_body(status, r#"{"message": "Nope"}"#),
            "Nope"
        );
        assert_eq!(error_message_from_body(status, "<html>"), "Forbidden");
        assert_eq!(error_message_from_body(status, r#"{"detail": ""}"#), "Forbidden");
    }
}
