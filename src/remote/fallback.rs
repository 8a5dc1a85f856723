//! In-memory collections and fallback-to-static-data.

use std::sync::Arc;

use crate::error::Result;

use super::{FilterSet, PageRequest, PageResult, RemoteCollection, SharedCollection};

/// Decides whether an item satisfies a server-side filter set.
pub type Matcher<T> = Arc<dyn Fn(&T, &FilterSet) -> bool + Send + Sync>;

/// A collection held in memory that windows and filters like the server.
pub struct StaticCollection<T> {
    items: Vec<T>,
    matcher: Option<Matcher<T>>,
}

impl<T> StaticCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            matcher: None,
        }
    }

    pub fn with_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&T, &FilterSet) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> StaticCollection<T> {
    /// Apply filters and the skip/limit window synchronously.
    pub fn page(&self, request: &PageRequest) -> PageResult<T> {
        let matching: Vec<&T> = match &self.matcher {
            Some(matcher) if !request.filters.is_empty() => self
                .items
                .iter()
                .filter(|item| matcher(item, &request.filters))
                .collect(),
            _ => self.items.iter().collect(),
        };

        let total = matching.len() as u64;
        let skip = usize::try_from(request.skip).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(request.limit as usize)
            .cloned()
            .collect();

        PageResult::new(items, total)
    }
}

#[async_trait::async_trait]
impl<T> RemoteCollection for StaticCollection<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<T>> {
        Ok(self.page(request))
    }
}

/// Serve from `primary`; on failure, log and serve from `fallback`.
pub struct WithFallback<T> {
    primary: SharedCollection<T>,
    fallback: SharedCollection<T>,
}

impl<T> WithFallback<T> {
    pub fn new(primary: SharedCollection<T>, fallback: SharedCollection<T>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait::async_trait]
impl<T> RemoteCollection for WithFallback<T>
where
    T: Send + 'static,
{
    type Item = T;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<T>> {
        match self.primary.fetch_page(request).await {
            Ok(page) => Ok(page),
            Err(e) => {
                tracing::warn!("Remote fetch failed, serving static data instead: {e}");
                self.fallback.fetch_page(request).await
            }
        }
    }
}
