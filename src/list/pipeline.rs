//! Query orchestration for a single list view.
//!
//! Wires the pieces of list acquisition together in one place:
//! - raw query input is debounced, never applied while typing
//! - a settled query either narrows the fetched page (client search) or
//!   becomes a server filter and triggers a fetch (server search)
//! - the status filter is always applied client-side
//! - the view is the refined page plus pagination/loading/error state

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{FolioError, Result};

use super::controller::{FetchOutcome, ListController};
use super::debounce::Debouncer;
use super::pagination::Pagination;
use super::refine::{
    Refinement, SEARCH_PREDICATE, STATUS_PREDICATE, Searchable, fuzzy_search, refine, search_term,
    status_is,
};

/// Where a settled search query is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Narrow the already-fetched page by substring; no request is made
    Client,
    /// Like `Client`, but matches the query as a fuzzy subsequence
    Fuzzy,
    /// Send the query to the server under `filter_key` and re-fetch
    Server { filter_key: String },
}

/// Result of applying a settled query.
#[derive(Debug)]
pub enum QueryEffect {
    /// The client-side search predicate changed
    Refined,
    /// The query was already applied
    Unchanged,
    /// A server fetch was started
    Fetching(JoinHandle<FetchOutcome>),
}

/// What a consumer renders.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    /// Fetched items that pass every active refinement
    pub items: Vec<T>,
    /// Number of items on the fetched page before refinement
    pub fetched: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Server pagination; unaffected by refinement
    pub pagination: Pagination,
    pub query: Option<String>,
    pub status: Option<String>,
}

pub struct ListPipeline<T> {
    controller: ListController<T>,
    debouncer: Debouncer<String>,
    settled: mpsc::UnboundedReceiver<String>,
    refinement: Refinement<T>,
    mode: SearchMode,
    query: Option<String>,
    status: Option<String>,
}

impl<T> ListPipeline<T>
where
    T: Searchable + Clone + Send + Sync + 'static,
{
    pub fn new(controller: ListController<T>, mode: SearchMode, quiet: Duration) -> Self {
        let (debouncer, settled) = Debouncer::new(quiet);
        Self {
            controller,
            debouncer,
            settled,
            refinement: Refinement::new(),
            mode,
            query: None,
            status: None,
        }
    }

    pub fn controller(&self) -> &ListController<T> {
        &self.controller
    }

    pub fn mode(&self) -> &SearchMode {
        &self.mode
    }

    /// Record raw query input. Nothing is applied until the input settles.
    pub fn input(&mut self, raw: impl Into<String>) {
        self.debouncer.push(raw.into());
    }

    /// Whether typed input is still waiting for the quiet interval.
    pub fn has_pending_input(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Wait for the next settled query. `None` after [`shutdown`](Self::shutdown).
    pub async fn next_settled(&mut self) -> Option<String> {
        self.settled.recv().await
    }

    /// A settled query that is ready now, without waiting.
    pub fn try_settled(&mut self) -> Option<String> {
        self.settled.try_recv().ok()
    }

    /// Apply a settled query. A blank query clears the search.
    ///
    /// A query equal to the last one applied is `Unchanged`. In server mode
    /// the filter set is updated before this returns and only the fetch
    /// runs in the background, so queries applied back to back never lose
    /// each other's edits.
    pub fn apply_query(&mut self, query: &str) -> Result<QueryEffect> {
        let term = query.trim();
        let next = (!term.is_empty()).then(|| term.to_string());
        if next == self.query {
            return Ok(QueryEffect::Unchanged);
        }

        match &self.mode {
            SearchMode::Client | SearchMode::Fuzzy => {
                match &next {
                    Some(term) if self.mode == SearchMode::Fuzzy => self
                        .refinement
                        .set(SEARCH_PREDICATE, fuzzy_search(term, T::search_text)),
                    Some(term) => self.refinement.set(SEARCH_PREDICATE, search_term::<T>(term)),
                    None => {
                        self.refinement.remove(SEARCH_PREDICATE);
                    }
                }
                self.query = next;
                Ok(QueryEffect::Refined)
            }
            SearchMode::Server { filter_key } => {
                let changed = self.controller.stage_filters(|filters| {
                    match &next {
                        Some(term) => {
                            filters.insert(filter_key, term)?;
                        }
                        None => {
                            filters.remove(filter_key);
                        }
                    }
                    Ok(())
                })?;
                self.query = next;
                if !changed {
                    return Ok(QueryEffect::Unchanged);
                }

                tracing::debug!(
                    "Search settled, fetching with filters [{}]",
                    self.controller.filters()
                );
                let controller = self.controller.clone();
                Ok(QueryEffect::Fetching(tokio::spawn(async move {
                    controller.fetch_first_page().await
                })))
            }
        }
    }

    /// Narrow the page to records with `status`; `None` shows every status.
    pub fn set_status(&mut self, status: Option<&str>) -> Result<()> {
        let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) else {
            self.refinement.remove(STATUS_PREDICATE);
            self.status = None;
            return Ok(());
        };

        let valid = T::valid_statuses();
        if !valid.is_empty() && !valid.iter().any(|v| v.eq_ignore_ascii_case(status)) {
            return Err(FolioError::validation(
                "status",
                format!("'{status}' is not one of: {}", valid.join(", ")),
            ));
        }

        self.refinement.set(STATUS_PREDICATE, status_is::<T>(status));
        self.status = Some(status.to_lowercase());
        Ok(())
    }

    pub fn mount(&self) -> JoinHandle<FetchOutcome> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.mount().await })
    }

    pub fn go_to_page(&self, page: u32) -> JoinHandle<FetchOutcome> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.go_to_page(page).await })
    }

    pub fn refresh(&self) -> JoinHandle<FetchOutcome> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    }

    pub fn view(&self) -> ListView<T> {
        let snapshot = self.controller.snapshot();
        ListView {
            items: refine(&snapshot.items, &self.refinement),
            fetched: snapshot.items.len(),
            loading: snapshot.loading,
            error: snapshot.error,
            pagination: snapshot.pagination,
            query: self.query.clone(),
            status: self.status.clone(),
        }
    }

    /// Cancel pending input and stop applying fetch results.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
        self.settled.close();
        self.controller.unmount();
    }
}
