//! HTTP implementation of `RemoteCollection` for the publishing API.
//!
//! Pages are requested as `GET {base_url}/{path}?skip=..&limit=..&<filters>`
//! and the body is expected to be `{"items": [...], "total": n}`.
//!
//! # Security Note - Logging
//!
//! The API token is held in a `SecretBox` and only exposed while building the
//! Authorization header. Request URLs are logged at debug level; they never
//! carry the token.

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::Client;
use reqwest::header;
use secrecy::{ExposeSecret, SecretBox};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{FolioError, Result};

use super::error::{ApiError, error_message_from_body};
use super::{PageRequest, PageResult, RemoteCollection, RetryPolicy, execute_with_retry};

pub struct HttpCollection<T> {
    client: Client,
    endpoint: Url,
    token: Option<SecretBox<String>>,
    retry: RetryPolicy,
    timeout: Duration,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpCollection<T> {
    /// Build a client for `path` using the configured base URL, token,
    /// timeout and retry budget.
    pub fn from_config(config: &Config, path: &str) -> Result<Self> {
        let base_url = config.api_base_url().ok_or_else(|| {
            FolioError::Config(
                concat!(
                    "API base URL not configured. Set FOLIO_API_URL environment variable ",
                    "or run: folio config set api.base_url <url>"
                )
                .to_string(),
            )
        })?;

        let collection = Self::new(
            &base_url,
            path,
            config.remote_timeout(),
            RetryPolicy::new(config.retry_attempts),
        )?;
        Ok(collection.with_token(config.api_token()))
    }

    pub fn new(base_url: &str, path: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        if timeout.is_zero() {
            return Err(FolioError::Config("remote timeout must be non-zero".to_string()));
        }
        let endpoint = build_endpoint(base_url, path)?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            token: None,
            retry,
            timeout,
            _item: PhantomData,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .filter(|t| !t.is_empty())
            .map(|t| SecretBox::new(Box::new(t)));
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full URL for one page request, filters appended after the window.
    pub fn request_url(&self, request: &PageRequest) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("skip", &request.skip.to_string());
            pairs.append_pair("limit", &request.limit.to_string());
            for (key, value) in request.filters.iter() {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

fn build_endpoint(base_url: &str, path: &str) -> Result<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base)?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(FolioError::Config(format!(
            "API base URL must use http or https, got '{}'",
            base.scheme()
        )));
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[async_trait::async_trait]
impl<T> RemoteCollection for HttpCollection<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<T>> {
        let url = self.request_url(request);
        tracing::debug!("GET {url}");

        let this = self;
        let url_ref = &url;
        let response = execute_with_retry(&self.retry, || async move {
            let mut builder = this
                .client
                .get(url_ref.clone())
                .header(header::ACCEPT, "application/json");
            if let Some(token) = &this.token {
                builder = builder.bearer_auth(token.expose_secret());
            }

            let response = builder.send().await?;
            let status = response.status();

            if !status.is_success() {
                let retry_after = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok());
                let body = response.text().await.unwrap_or_default();
                let mut err = ApiError::with_status(error_message_from_body(status, &body), status);
                if let Some(seconds) = retry_after {
                    err = err.with_retry_after(seconds);
                }
                return Err(err);
            }

            Ok(response)
        })
        .await
        .map_err(|e| e.into_folio_error(self.timeout.as_secs()))?;

        let page: PageResult<T> = response.json().await.map_err(|e| {
            FolioError::fetch(None, format!("malformed response from {url}: {e}"))
        })?;

        tracing::debug!(
            "Fetched {} item(s) of {} from {}",
            page.items.len(),
            page.total,
            self.endpoint
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::FilterSet;

    fn collection(base: &str, path: &str) -> HttpCollection<serde_json::Value> {
        HttpCollection::new(base, path, Duration::from_secs(5), RetryPolicy::none()).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = collection("https://api.example.org/v1", "journals");
        assert_eq!(c.endpoint().as_str(), "https://api.example.org/v1/journals");

        let c = collection("https://api.example.org/v1/", "/reviews/assignments");
        assert_eq!(
            c.endpoint().as_str(),
            "https://api.example.org/v1/reviews/assignments"
        );
    }

    #[test]
    fn test_request_url_includes_window_and_filters() {
        let c = collection("http://localhost:8000", "role-requests");
        let request = PageRequest::new(
            20,
            10,
            FilterSet::new().with("status", "pending").with("role", "editor"),
        );
        assert_eq!(
            c.request_url(&request).as_str(),
            "http://localhost:8000/role-requests?skip=20&limit=10&role=editor&status=pending"
        );
    }

    #[test]
    fn test_filter_values_are_encoded() {
        let c = collection("http://localhost:8000", "journals");
        let request = PageRequest::new(0, 5, FilterSet::new().with("q", "neural nets & more"));
        assert_eq!(
            c.request_url(&request).query(),
            Some("skip=0&limit=5&q=neural+nets+%26+more")
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = HttpCollection::<serde_json::Value>::new(
            "ftp://example.org",
            "journals",
            Duration::from_secs(1),
            RetryPolicy::none(),
        );
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = HttpCollection::<serde_json::Value>::new(
            "http://localhost:8000",
            "journals",
            Duration::ZERO,
            RetryPolicy::none(),
        );
        assert!(matches!(result, Err(FolioError::Config(_))));
    }

    #[test]
    #[serial_test::serial]
    fn test_missing_base_url_is_config_error() {
        let config = Config::default();
        let result = HttpCollection::<serde_json::Value>::from_config(&config, "journals");
        assert!(matches!(result, Err(FolioError::Config(_))));
    }
}
