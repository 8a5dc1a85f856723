//! Paginated list controller.
//!
//! Owns page/limit/filter state for one list, issues fetches against a
//! [`RemoteCollection`](crate::remote::RemoteCollection), and tracks
//! loading/error state.
//!
//! Every fetch is stamped with a request epoch. A result whose epoch is no
//! longer current when it arrives is discarded, so the last request issued
//! wins regardless of resolution order. In-flight requests are never
//! aborted; their results are simply ignored.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::Result;
use crate::remote::{FilterSet, PageRequest, PageResult, SharedCollection};

use super::pagination::Pagination;

/// Lifecycle of the most recent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Constructed, nothing requested yet
    Idle,
    Fetching,
    Succeeded,
    Failed,
}

/// What happened to one triggered fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was applied to the list
    Applied,
    /// The fetch failed; the message is now the list's error
    Failed(String),
    /// A newer fetch started before this one resolved; result dropped
    Stale,
    /// An identical request was already in flight; nothing was sent
    Skipped,
    /// The list was unmounted; nothing applied
    Unmounted,
}

/// Why a fetch was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Mount,
    Page,
    Filters,
    Refresh,
    Reconcile,
}

#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Page size; must be at least 1
    pub limit: u32,
    /// Page requested on mount (default 1)
    pub initial_page: u32,
    /// Server-side filters for the first fetch
    pub filters: FilterSet,
}

impl ListOptions {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            initial_page: 1,
            filters: FilterSet::new(),
        }
    }

    pub fn initial_page(mut self, page: u32) -> Self {
        self.initial_page = page;
        self
    }

    pub fn filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }
}

/// Read-only view of the controller state.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    /// Last successfully loaded page
    pub items: Arc<Vec<T>>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
    pub phase: FetchPhase,
    pub filters: FilterSet,
}

struct ListState<T> {
    items: Arc<Vec<T>>,
    error: Option<String>,
    pagination: Pagination,
    filters: FilterSet,
    phase: FetchPhase,
    epoch: u64,
    in_flight: Option<PageRequest>,
    refresh_key: Option<u64>,
    mounted: bool,
}

impl<T> ListState<T> {
    fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.pagination.skip(),
            self.pagination.limit(),
            self.filters.clone(),
        )
    }
}

struct Inner<T> {
    source: SharedCollection<T>,
    state: Mutex<ListState<T>>,
    changes: watch::Sender<u64>,
}

/// Cheap to clone; clones share the same list.
pub struct ListController<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ListController<T>
where
    T: Send + Sync + 'static,
{
    /// Create an unmounted controller. Fails on a zero page size or an
    /// invalid filter set.
    pub fn new(source: SharedCollection<T>, options: ListOptions) -> Result<Self> {
        let mut pagination = Pagination::new(options.limit)?;
        options.filters.validate()?;
        pagination.set_page(options.initial_page);

        let (changes, _) = watch::channel(0);
        Ok(Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(ListState {
                    items: Arc::new(Vec::new()),
                    error: None,
                    pagination,
                    filters: options.filters,
                    phase: FetchPhase::Idle,
                    epoch: 0,
                    in_flight: None,
                    refresh_key: None,
                    mounted: true,
                }),
                changes,
            }),
        })
    }

    /// Receiver that changes every time the list state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.inner.state.lock();
        ListSnapshot {
            items: Arc::clone(&state.items),
            loading: state.loading(),
            error: state.error.clone(),
            pagination: state.pagination,
            phase: state.phase,
            filters: state.filters.clone(),
        }
    }

    pub fn pagination(&self) -> Pagination {
        self.inner.state.lock().pagination
    }

    pub fn filters(&self) -> FilterSet {
        self.inner.state.lock().filters.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.state.lock().mounted
    }

    /// Current request epoch (number of fetches initiated so far).
    pub fn epoch(&self) -> u64 {
        self.inner.state.lock().epoch
    }

    /// Initial fetch of the configured page.
    pub async fn mount(&self) -> FetchOutcome {
        let page = self.pagination().current_page();
        self.run(page, Trigger::Mount).await
    }

    /// Jump to page `n`, clamped into the valid range. Skipped when the
    /// identical request is already in flight.
    pub async fn go_to_page(&self, n: u32) -> FetchOutcome {
        self.run(n, Trigger::Page).await
    }

    pub async fn next_page(&self) -> FetchOutcome {
        let page = self.pagination().current_page().saturating_add(1);
        self.go_to_page(page).await
    }

    pub async fn prev_page(&self) -> FetchOutcome {
        let page = self.pagination().current_page().saturating_sub(1);
        self.go_to_page(page).await
    }

    /// Re-fetch the current page unconditionally.
    pub async fn refresh(&self) -> FetchOutcome {
        let page = self.pagination().current_page();
        self.run(page, Trigger::Refresh).await
    }

    /// Refresh only when `key` differs from the last key seen. The first
    /// key seen is recorded without refreshing.
    pub async fn sync_refresh_key<K: Hash>(&self, key: K) -> Option<FetchOutcome> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let key = hasher.finish();

        let changed = {
            let mut state = self.inner.state.lock();
            let previous = state.refresh_key.replace(key);
            previous.is_some_and(|p| p != key)
        };

        if changed {
            Some(self.refresh().await)
        } else {
            None
        }
    }

    /// Edit the filter set in place under the list lock.
    ///
    /// A valid, changed set is installed and the page resets to 1; returns
    /// whether anything changed. No request is made: follow with
    /// [`ListController::fetch_first_page`]. Staging happens synchronously,
    /// so edits issued back to back always build on each other.
    pub fn stage_filters<F>(&self, update: F) -> Result<bool>
    where
        F: FnOnce(&mut FilterSet) -> Result<()>,
    {
        let changed = {
            let mut state = self.inner.state.lock();
            let mut filters = state.filters.clone();
            update(&mut filters)?;
            filters.validate()?;
            if filters == state.filters {
                false
            } else {
                state.filters = filters;
                state.pagination.set_page(1);
                true
            }
        };

        if changed {
            self.notify();
        }
        Ok(changed)
    }

    /// Fetch page 1 with whatever filters are current when the fetch starts.
    pub async fn fetch_first_page(&self) -> FetchOutcome {
        self.run(1, Trigger::Filters).await
    }

    /// Stage `update` and fetch page 1 if the filter set changed; an
    /// unchanged set is `Skipped`. Invalid filters are rejected before any
    /// request.
    pub async fn update_filters<F>(&self, update: F) -> Result<FetchOutcome>
    where
        F: FnOnce(&mut FilterSet) -> Result<()>,
    {
        if !self.stage_filters(update)? {
            return Ok(FetchOutcome::Skipped);
        }
        Ok(self.fetch_first_page().await)
    }

    /// Replace the filter set.
    pub async fn set_filters(&self, filters: FilterSet) -> Result<FetchOutcome> {
        self.update_filters(|current| {
            *current = filters;
            Ok(())
        })
        .await
    }

    pub async fn set_filter(&self, key: &str, value: &str) -> Result<FetchOutcome> {
        self.update_filters(|filters| filters.insert(key, value).map(drop)).await
    }

    pub async fn remove_filter(&self, key: &str) -> Result<FetchOutcome> {
        self.update_filters(|filters| {
            filters.remove(key);
            Ok(())
        })
        .await
    }

    /// Stop applying results. Later-arriving fetches are dropped.
    pub fn unmount(&self) {
        {
            let mut state = self.inner.state.lock();
            state.mounted = false;
            state.in_flight = None;
        }
        self.notify();
    }

    async fn run(&self, page: u32, trigger: Trigger) -> FetchOutcome {
        let mut page = page;
        let mut trigger = trigger;
        loop {
            match self.fetch_once(page, trigger).await {
                Step::Done(outcome) => return outcome,
                Step::PastEnd(last_page) => {
                    tracing::debug!("Page {page} is past the end, moving to page {last_page}");
                    page = last_page;
                    trigger = Trigger::Reconcile;
                }
            }
        }
    }

    async fn fetch_once(&self, page: u32, trigger: Trigger) -> Step {
        let (epoch, request) = {
            let mut guard = self.inner.state.lock();
            let state = &mut *guard;
            if !state.mounted {
                return Step::Done(FetchOutcome::Unmounted);
            }

            let previous_page = state.pagination.current_page();
            state.pagination.set_page(page);
            let request = state.page_request();

            if trigger == Trigger::Page && state.in_flight.as_ref() == Some(&request) {
                tracing::debug!("Request {:?} already in flight, skipping", request);
                return Step::Done(FetchOutcome::Skipped);
            }
            if trigger == Trigger::Page && previous_page != state.pagination.current_page() {
                tracing::debug!(
                    "Moving from page {} to page {}",
                    previous_page,
                    state.pagination.current_page()
                );
            }

            state.epoch += 1;
            state.phase = FetchPhase::Fetching;
            state.in_flight = Some(request.clone());
            (state.epoch, request)
        };
        self.notify();

        tracing::debug!(
            "Fetching skip={} limit={} filters=[{}] ({:?}, epoch {})",
            request.skip,
            request.limit,
            request.filters,
            trigger,
            epoch
        );
        let result = self.inner.source.fetch_page(&request).await;

        let step = {
            let mut guard = self.inner.state.lock();
            let state = &mut *guard;
            if !state.mounted {
                tracing::debug!("Discarding result for unmounted list (epoch {epoch})");
                return Step::Done(FetchOutcome::Unmounted);
            }
            if state.epoch != epoch {
                tracing::debug!(
                    "Discarding stale result (epoch {epoch}, current {})",
                    state.epoch
                );
                return Step::Done(FetchOutcome::Stale);
            }

            state.in_flight = None;
            match result {
                Ok(PageResult { items, total }) => {
                    match state.pagination.set_total(total) {
                        Some(last_page) if total > 0 => Step::PastEnd(last_page),
                        _ => {
                            let current = state.pagination.current_page();
                            state.pagination.set_page(current);
                            state.items = Arc::new(items);
                            state.error = None;
                            state.phase = FetchPhase::Succeeded;
                            Step::Done(FetchOutcome::Applied)
                        }
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::warn!("List fetch failed: {message}");
                    state.error = Some(message.clone());
                    state.phase = FetchPhase::Failed;
                    Step::Done(FetchOutcome::Failed(message))
                }
            }
        };
        self.notify();
        step
    }

    fn notify(&self) {
        self.inner.changes.send_modify(|version| *version += 1);
    }
}

enum Step {
    Done(FetchOutcome),
    /// The requested page lies past the reported end; fetch this page instead
    PastEnd(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use crate::remote::RemoteCollection;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    /// Serves `0..total` with optional per-window delays and failures.
    #[derive(Default)]
    struct Scripted {
        total: AtomicU64,
        calls: Mutex<Vec<PageRequest>>,
        delays: Mutex<HashMap<u64, Duration>>,
        fail_status: Mutex<Option<u16>>,
    }

    impl Scripted {
        fn new(total: u64) -> Arc<Self> {
            let scripted = Self::default();
            scripted.total.store(total, Ordering::SeqCst);
            Arc::new(scripted)
        }

        fn delay(&self, skip: u64, millis: u64) {
            self.delays
                .lock()
                .insert(skip, Duration::from_millis(millis));
        }

        fn fail(&self, status: Option<u16>) {
            *self.fail_status.lock() = status;
        }

        fn calls(&self) -> Vec<PageRequest> {
            self.calls.lock().clone()
        }
    }

    #[async_trait::async_trait]
    impl RemoteCollection for Scripted {
        type Item = u64;

        async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<u64>> {
            self.calls.lock().push(request.clone());
            let delay = self.delays.lock().get(&request.skip).copied();
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            let failure = *self.fail_status.lock();
            if let Some(status) = failure {
                return Err(FolioError::fetch(Some(status), "Internal Server Error"));
            }
            let total = self.total.load(Ordering::SeqCst);
            let end = (request.skip + u64::from(request.limit)).min(total);
            Ok(PageResult::new((request.skip..end).collect(), total))
        }
    }

    fn controller(source: &Arc<Scripted>, limit: u32) -> ListController<u64> {
        ListController::new(source.clone(), ListOptions::new(limit)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_loads_first_page() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        assert_eq!(list.snapshot().phase, FetchPhase::Idle);

        assert_eq!(list.mount().await, FetchOutcome::Applied);

        let snapshot = list.snapshot();
        assert_eq!(*snapshot.items, (0..10).collect::<Vec<_>>());
        assert_eq!(snapshot.phase, FetchPhase::Succeeded);
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.pagination.total(), 25);
        assert_eq!(snapshot.pagination.total_pages(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_go_to_page_clamps_past_last_page() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;

        assert_eq!(list.go_to_page(5).await, FetchOutcome::Applied);

        let pagination = list.pagination();
        assert_eq!(pagination.current_page(), 3);
        assert_eq!(pagination.skip(), 20);
        assert_eq!(source.calls().last().unwrap().skip, 20);
        assert_eq!(*list.snapshot().items, vec![20, 21, 22, 23, 24]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_go_to_page_zero_clamps_to_first() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;
        list.go_to_page(2).await;

        assert_eq!(list.go_to_page(0).await, FetchOutcome::Applied);
        assert_eq!(list.pagination().current_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_fetch_does_not_clobber_newer() {
        let source = Scripted::new(25);
        source.delay(0, 500);
        source.delay(10, 50);
        let list = controller(&source, 10);

        let (first, second) = tokio::join!(list.mount(), async {
            sleep(Duration::from_millis(10)).await;
            list.go_to_page(2).await
        });

        assert_eq!(first, FetchOutcome::Stale);
        assert_eq!(second, FetchOutcome::Applied);

        let snapshot = list.snapshot();
        assert_eq!(*snapshot.items, (10..20).collect::<Vec<_>>());
        assert_eq!(snapshot.pagination.current_page(), 2);
        assert!(!snapshot.loading);
        assert_eq!(list.epoch(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_keeps_loading_while_newest_pending() {
        let source = Scripted::new(25);
        source.delay(0, 50);
        source.delay(10, 500);
        let list = controller(&source, 10);

        let (first, _) = tokio::join!(list.mount(), async {
            sleep(Duration::from_millis(10)).await;
            let outcome = list.go_to_page(2);
            tokio::pin!(outcome);
            // Let page 1 resolve while page 2 is still pending
            tokio::select! {
                _ = &mut outcome => panic!("page 2 should still be pending"),
                _ = sleep(Duration::from_millis(100)) => {}
            }
            let snapshot = list.snapshot();
            assert!(snapshot.loading);
            assert!(snapshot.items.is_empty());
            outcome.await
        });

        assert_eq!(first, FetchOutcome::Stale);
        assert_eq!(*list.snapshot().items, (10..20).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_last_good_items() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;
        assert_eq!(list.snapshot().items.len(), 10);

        source.fail(Some(500));
        let outcome = list.refresh().await;
        assert!(matches!(outcome, FetchOutcome::Failed(ref msg) if msg.contains("500")));

        let snapshot = list.snapshot();
        assert_eq!(snapshot.items.len(), 10);
        assert!(snapshot.error.is_some());
        assert!(!snapshot.loading);
        assert_eq!(snapshot.phase, FetchPhase::Failed);

        // Any trigger is a retry path
        source.fail(None);
        assert_eq!(list.go_to_page(2).await, FetchOutcome::Applied);
        assert!(list.snapshot().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_in_flight_request_is_skipped() {
        let source = Scripted::new(25);
        source.delay(0, 100);
        let list = controller(&source, 10);

        let (first, second) = tokio::join!(list.mount(), async {
            sleep(Duration::from_millis(10)).await;
            list.go_to_page(1).await
        });

        assert_eq!(first, FetchOutcome::Applied);
        assert_eq!(second, FetchOutcome::Skipped);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_resets_to_first_page() {
        let source = Scripted::new(45);
        let list = controller(&source, 10);
        list.mount().await;
        list.go_to_page(4).await;
        assert_eq!(list.pagination().current_page(), 4);

        let outcome = list.set_filter("status", "pending").await.unwrap();
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(list.pagination().current_page(), 1);

        let last = source.calls().last().cloned().unwrap();
        assert_eq!(last.skip, 0);
        assert_eq!(last.filters.get("status"), Some("pending"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_filters_do_not_fetch() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;
        list.set_filter("status", "pending").await.unwrap();
        let calls = source.calls().len();

        let outcome = list.set_filter("status", "pending").await.unwrap();
        assert_eq!(outcome, FetchOutcome::Skipped);
        assert_eq!(list.remove_filter("journal").await.unwrap(), FetchOutcome::Skipped);
        assert_eq!(source.calls().len(), calls);

        assert_eq!(list.remove_filter("status").await.unwrap(), FetchOutcome::Applied);
        assert!(list.filters().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_staged_filter_edits_compose() {
        let source = Scripted::new(45);
        let list = controller(&source, 10);
        list.mount().await;
        list.go_to_page(3).await;

        // Two edits staged before either fetch runs
        assert!(list.stage_filters(|f| f.insert("subject", "biology").map(drop)).unwrap());
        assert!(list.stage_filters(|f| f.insert("status", "active").map(drop)).unwrap());
        assert_eq!(list.pagination().current_page(), 1);

        source.delay(0, 50);
        let (a, b) = tokio::join!(list.fetch_first_page(), list.fetch_first_page());
        assert_eq!((a, b), (FetchOutcome::Stale, FetchOutcome::Applied));

        let filters = list.filters();
        assert_eq!(filters.len(), 2);
        let last = source.calls().last().cloned().unwrap();
        assert_eq!(last.filters, filters);
        assert_eq!(last.skip, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stage_leaves_filters_untouched() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.set_filter("status", "pending").await.unwrap();

        let result = list.stage_filters(|f| {
            f.remove("status");
            f.insert("skip", "3").map(drop)
        });
        assert!(result.is_err());
        assert_eq!(list.filters().get("status"), Some("pending"));

        assert!(!list.stage_filters(|_| Ok(())).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_filter_rejected_before_fetch() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;

        let result = list.set_filter("bad key", "x").await;
        assert!(matches!(result, Err(FolioError::Validation { .. })));
        assert_eq!(source.calls().len(), 1);
        assert!(list.filters().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_options_rejected() {
        let source = Scripted::new(25);
        assert!(ListController::<u64>::new(source.clone(), ListOptions::new(0)).is_err());

        let options = ListOptions::new(10).filters(FilterSet::new().with("", "x"));
        assert!(ListController::<u64>::new(source.clone(), options).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_discards_late_result() {
        let source = Scripted::new(25);
        source.delay(0, 100);
        let list = controller(&source, 10);

        let (outcome, _) = tokio::join!(list.mount(), async {
            sleep(Duration::from_millis(10)).await;
            list.unmount();
        });

        assert_eq!(outcome, FetchOutcome::Unmounted);
        assert!(list.snapshot().items.is_empty());
        assert!(!list.snapshot().loading);

        assert_eq!(list.go_to_page(2).await, FetchOutcome::Unmounted);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_key_change_forces_refetch() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;

        assert_eq!(list.sync_refresh_key("visible").await, None);
        assert_eq!(list.sync_refresh_key("visible").await, None);
        assert_eq!(
            list.sync_refresh_key("hidden").await,
            Some(FetchOutcome::Applied)
        );
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shrunk_collection_moves_to_last_page() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;
        list.go_to_page(3).await;

        source.total.store(12, Ordering::SeqCst);
        assert_eq!(list.refresh().await, FetchOutcome::Applied);

        let snapshot = list.snapshot();
        assert_eq!(snapshot.pagination.current_page(), 2);
        assert_eq!(*snapshot.items, vec![10, 11]);

        let skips: Vec<u64> = source.calls().iter().map(|r| r.skip).collect();
        assert_eq!(skips, vec![0, 20, 20, 10]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_page_past_end_is_reconciled() {
        let source = Scripted::new(25);
        let list =
            ListController::new(source.clone(), ListOptions::new(10).initial_page(9)).unwrap();

        assert_eq!(list.mount().await, FetchOutcome::Applied);
        assert_eq!(list.pagination().current_page(), 3);
        assert_eq!(list.snapshot().items.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_collection_stays_on_first_page() {
        let source = Scripted::new(0);
        let list = controller(&source, 10);
        list.mount().await;

        assert_eq!(list.go_to_page(3).await, FetchOutcome::Applied);
        let pagination = list.pagination();
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.total_pages(), 0);
        assert!(list.snapshot().items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_and_prev_page() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        list.mount().await;

        list.next_page().await;
        list.next_page().await;
        list.next_page().await;
        assert_eq!(list.pagination().current_page(), 3);

        list.prev_page().await;
        assert_eq!(list.pagination().current_page(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let source = Scripted::new(25);
        let list = controller(&source, 10);
        let mut changes = list.subscribe();
        assert!(!changes.has_changed().unwrap());

        list.mount().await;
        assert!(changes.has_changed().unwrap());
        changes.borrow_and_update();

        list.unmount();
        assert!(changes.has_changed().unwrap());
    }
}
