//! Remote collection access.
//!
//! This module defines the capability the list pipeline consumes: fetching a
//! single skip/limit window of a server-ordered collection. The controller
//! never sees the transport; it only holds an `Arc<dyn RemoteCollection>`.

pub mod error;
pub mod fallback;
pub mod filters;
pub mod http;
pub mod retry;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use error::ApiError;
pub use fallback::{StaticCollection, WithFallback};
pub use filters::FilterSet;
pub use http::HttpCollection;
pub use retry::{AsHttpError, RetryPolicy, execute_with_retry};

/// A request for one window of a remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PageRequest {
    /// Number of records to skip from the start of the server ordering
    pub skip: u64,
    /// Maximum number of records to return
    pub limit: u32,
    /// Server-side filters, forwarded verbatim
    pub filters: FilterSet,
}

impl PageRequest {
    pub fn new(skip: u64, limit: u32, filters: FilterSet) -> Self {
        Self {
            skip,
            limit,
            filters,
        }
    }
}

/// One page of a remote collection.
///
/// `total` counts the full collection matching the request filters, not
/// `items.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Capability to fetch pages of a remote collection.
///
/// Implementations must report `total` for the whole server-filtered
/// collection and must return an empty page (not an error) when nothing
/// matches.
#[async_trait::async_trait]
pub trait RemoteCollection: Send + Sync {
    type Item: Send;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Self::Item>>;
}

#[async_trait::async_trait]
impl<C> RemoteCollection for Arc<C>
where
    C: RemoteCollection + ?Sized,
{
    type Item = C::Item;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Self::Item>> {
        (**self).fetch_page(request).await
    }
}

/// Shared, type-erased collection handle as held by a list controller.
pub type SharedCollection<T> = Arc<dyn RemoteCollection<Item = T>>;
