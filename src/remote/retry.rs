//! Retry with exponential backoff for transient remote failures.
//!
//! Retries live inside the remote client. The list controller never retries
//! on its own; a failed fetch surfaces as an error and the next user trigger
//! is the retry path.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Errors that can report HTTP-level retry information.
pub trait AsHttpError: fmt::Display {
    /// HTTP status and Retry-After seconds, when available.
    fn as_http_error(&self) -> Option<(reqwest::StatusCode, Option<u64>)>;

    /// Whether the failure is worth retrying (server errors, dropped connections).
    fn is_transient(&self) -> bool;

    fn is_rate_limited(&self) -> bool {
        matches!(self.as_http_error(), Some((status, _)) if status.as_u16() == 429)
    }

    fn get_retry_after(&self) -> Option<Duration> {
        match self.as_http_error() {
            Some((status, Some(seconds))) if status.as_u16() == 429 => {
                Some(Duration::from_secs(seconds))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn none() -> Self {
        Self::new(0)
    }

    /// Backoff before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

/// Run `operation` until it succeeds, fails permanently, or the retry budget
/// is exhausted. The last error is returned.
pub async fn execute_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> std::result::Result<T, E>
where
    E: AsHttpError,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retryable = err.is_transient() || err.is_rate_limited();
                if !retryable || attempt >= policy.max_retries {
                    return Err(err);
                }

                let delay = err
                    .get_retry_after()
                    .map(|d| d.min(MAX_BACKOFF))
                    .unwrap_or_else(|| policy.backoff(attempt));
                tracing::warn!(
                    "Remote request failed (attempt {}/{}), retrying in {:?}: {}",
                    attempt + 1,
                    policy.max_retries + 1,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
