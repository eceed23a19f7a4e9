//! Incremental fetch controller behind the storefront's infinite scroll.
//!
//! The controller accumulates successive pages into one ordered list. Two rules keep that list
//! correct:
//! - at most one page request is in flight per session (`loading` guard);
//! - every request remembers the session generation it was issued under, and a response that
//!   comes back after `reset()` / `change_sort()` is dropped instead of applied.
//!
//! The state lock is never held across the fetch, so `reset()` and `snapshot()` stay responsive
//! while a page is loading. A `load_more()` future dropped mid-flight (timeout, `select!`)
//! releases its session's `loading` flag, so the next call issues the request again.

use crate::client::source::{FetchError, PageParams, PageSource};
use crate::domain::{Product, Sort};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading,
    Error,
    /// No more pages; `load_more()` is a no-op.
    Exhausted,
}

/// What the view layer should render below the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Loading,
    /// Show a retry affordance.
    Failed { message: String, retryable: bool },
    /// Finished with nothing to show.
    Empty,
    /// Finished after at least one item: "all items loaded".
    AllLoaded,
    /// More pages remain; keep watching the scroll position.
    More,
}

/// Result of one `load_more()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was applied; carries the number of appended items.
    Appended(usize),
    /// A request is already in flight. Nothing was issued.
    Busy,
    /// `hasNextPage` is false. Nothing was issued.
    Exhausted,
    Failed(FetchError),
    /// The session was reset while this request was in flight; the response was discarded.
    Stale,
}

/// Read-only copy of the listing state.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub items: Vec<Product>,
    /// Next page to request.
    pub cursor: u32,
    pub has_next_page: bool,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub sort: Sort,
    pub generation: u64,
}

impl FeedSnapshot {
    pub fn phase(&self) -> FeedPhase {
        if self.loading {
            FeedPhase::Loading
        } else if self.error.is_some() {
            FeedPhase::Error
        } else if !self.has_next_page {
            FeedPhase::Exhausted
        } else {
            FeedPhase::Idle
        }
    }

    pub fn view(&self) -> FeedView {
        match self.phase() {
            FeedPhase::Loading => FeedView::Loading,
            FeedPhase::Error => {
                let err = self.error.as_ref();
                FeedView::Failed {
                    message: err.map(|e| e.to_string()).unwrap_or_default(),
                    retryable: err.map(FetchError::is_retryable).unwrap_or(true),
                }
            }
            FeedPhase::Exhausted if self.items.is_empty() => FeedView::Empty,
            FeedPhase::Exhausted => FeedView::AllLoaded,
            FeedPhase::Idle => FeedView::More,
        }
    }
}

struct FeedState {
    items: Vec<Product>,
    cursor: u32,
    has_next_page: bool,
    loading: bool,
    error: Option<FetchError>,
    sort: Sort,
    generation: u64,
}

impl FeedState {
    fn fresh(sort: Sort, generation: u64) -> Self {
        Self {
            items: Vec::new(),
            cursor: 1,
            has_next_page: true,
            loading: false,
            error: None,
            sort,
            generation,
        }
    }
}

fn lock_state(state: &Mutex<FeedState>) -> MutexGuard<'_, FeedState> {
    // Every critical section leaves the state consistent, so a poisoned lock is still usable.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears `loading` if the request it guards never completed.
struct InFlight<'a> {
    state: &'a Mutex<FeedState>,
    generation: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = lock_state(self.state);
        if state.generation == self.generation {
            state.loading = false;
            tracing::debug!(page = state.cursor, "page request abandoned before completion");
        }
    }
}

pub struct FeedController<S> {
    source: S,
    page_size: u32,
    state: Mutex<FeedState>,
}

impl<S: PageSource> FeedController<S> {
    /// `page_size` is sent as-is; the query service decides whether it is acceptable.
    pub fn new(source: S, page_size: u32, sort: Sort) -> Self {
        Self {
            source,
            page_size,
            state: Mutex::new(FeedState::fresh(sort, 0)),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Requests the page at the cursor, unless one is already loading or none remain.
    pub async fn load_more(&self) -> LoadOutcome {
        let (generation, params) = {
            let mut state = lock_state(&self.state);
            if state.loading {
                return LoadOutcome::Busy;
            }
            if !state.has_next_page {
                return LoadOutcome::Exhausted;
            }
            state.loading = true;
            state.error = None;
            let params = PageParams {
                page: state.cursor,
                page_size: self.page_size,
                sort: state.sort,
            };
            (state.generation, params)
        };

        let in_flight = InFlight {
            state: &self.state,
            generation,
            armed: true,
        };
        let result = self.source.fetch_page(&params).await;
        in_flight.complete();

        let mut state = lock_state(&self.state);
        if state.generation != generation {
            tracing::debug!(
                issued = generation,
                current = state.generation,
                page = params.page,
                "discarding page from a previous session"
            );
            return LoadOutcome::Stale;
        }
        state.loading = false;

        let page = match result {
            Ok(page) if page.has_next_page && page.next_page.is_none() => {
                Err(FetchError::UnexpectedResponseShape(
                    "hasNextPage is true but nextPage is missing".to_string(),
                ))
            }
            other => other,
        };

        match page {
            Ok(page) => {
                let appended = page.items.len();
                state.items.extend(page.items);
                state.has_next_page = page.has_next_page;
                if let Some(next) = page.next_page {
                    state.cursor = next;
                }
                tracing::debug!(
                    page = params.page,
                    appended,
                    total_loaded = state.items.len(),
                    has_next_page = state.has_next_page,
                    "page appended"
                );
                LoadOutcome::Appended(appended)
            }
            Err(err) => {
                tracing::warn!(page = params.page, error = %err, "page fetch failed");
                // Items, cursor and hasNextPage stay as they were so a retry can resume.
                state.error = Some(err.clone());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Starts a new session under the current sort.
    pub async fn reset(&self) {
        let mut state = lock_state(&self.state);
        let (sort, next) = (state.sort, state.generation + 1);
        *state = FeedState::fresh(sort, next);
    }

    /// Starts a new session under `sort`. Returns false when the sort was already active.
    pub async fn change_sort(&self, sort: Sort) -> bool {
        let mut state = lock_state(&self.state);
        if state.sort == sort {
            return false;
        }
        let next = state.generation + 1;
        *state = FeedState::fresh(sort, next);
        true
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = lock_state(&self.state);
        FeedSnapshot {
            items: state.items.clone(),
            cursor: state.cursor,
            has_next_page: state.has_next_page,
            loading: state.loading,
            error: state.error.clone(),
            sort: state.sort,
            generation: state.generation,
        }
    }

    pub async fn view(&self) -> FeedView {
        self.snapshot().await.view()
    }

    pub async fn len(&self) -> usize {
        lock_state(&self.state).items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::CatalogService;
    use crate::domain::{Price, ProductPage, SortBy, SortOrder};
    use crate::storage::MemoryProductStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price: Price::from_cents(cents),
            image_url: None,
            category: None,
            stock: Some(3),
        }
    }

    /// A..E with prices chosen so price-desc order differs from name order.
    fn catalog() -> (Arc<CatalogService>, Arc<MemoryProductStore>) {
        let store = Arc::new(MemoryProductStore::new(vec![
            product("1", "A", 300),
            product("2", "B", 100),
            product("3", "C", 500),
            product("4", "D", 200),
            product("5", "E", 400),
        ]));
        (Arc::new(CatalogService::new(store.clone())), store)
    }

    /// Holds every request until a permit is released, counting issued requests.
    struct GatedSource {
        inner: Arc<CatalogService>,
        gate: Semaphore,
        calls: AtomicUsize,
    }

    impl GatedSource {
        fn new(inner: Arc<CatalogService>) -> Arc<Self> {
            Arc::new(Self {
                inner,
                gate: Semaphore::new(0),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn wait_for_calls(&self, n: usize) {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl PageSource for GatedSource {
        async fn fetch_page(&self, params: &PageParams) -> Result<ProductPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.acquire().await.expect("gate closed").forget();
            self.inner.fetch_page(params).await
        }
    }

    fn names(snapshot: &FeedSnapshot) -> Vec<&str> {
        snapshot.items.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn accumulates_pages_in_request_order_until_exhausted() {
        let (svc, _) = catalog();
        let feed = FeedController::new(svc, 2, Sort::default());

        assert_eq!(feed.view().await, FeedView::More);
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(2));
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(2));
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(1));

        let snap = feed.snapshot().await;
        assert_eq!(names(&snap), vec!["A", "B", "C", "D", "E"]);
        assert!(!snap.has_next_page);
        assert_eq!(snap.phase(), FeedPhase::Exhausted);
        assert_eq!(snap.view(), FeedView::AllLoaded);
    }

    #[tokio::test]
    async fn load_more_after_exhaustion_is_a_no_op() {
        let (svc, _) = catalog();
        let source = GatedSource::new(svc);
        source.gate.add_permits(100);
        let feed = FeedController::new(source.clone(), 10, Sort::default());

        assert_eq!(feed.load_more().await, LoadOutcome::Appended(5));
        let before = feed.snapshot().await;
        assert_eq!(feed.load_more().await, LoadOutcome::Exhausted);
        assert_eq!(feed.load_more().await, LoadOutcome::Exhausted);
        assert_eq!(source.calls(), 1);
        assert_eq!(feed.snapshot().await.items, before.items);
    }

    #[tokio::test]
    async fn only_one_request_in_flight() {
        let (svc, _) = catalog();
        let source = GatedSource::new(svc);
        let feed = Arc::new(FeedController::new(source.clone(), 2, Sort::default()));

        let first = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.load_more().await })
        };
        source.wait_for_calls(1).await;

        assert_eq!(feed.snapshot().await.phase(), FeedPhase::Loading);
        assert_eq!(feed.load_more().await, LoadOutcome::Busy);
        assert_eq!(feed.load_more().await, LoadOutcome::Busy);
        assert_eq!(source.calls(), 1);

        source.gate.add_permits(1);
        assert_eq!(first.await.unwrap(), LoadOutcome::Appended(2));
        assert_eq!(feed.snapshot().await.cursor, 2);
    }

    #[tokio::test]
    async fn failure_keeps_items_and_allows_retry() {
        let (svc, store) = catalog();
        let feed = FeedController::new(svc, 2, Sort::default());
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(2));

        store.set_available(false);
        let outcome = feed.load_more().await;
        assert!(matches!(outcome, LoadOutcome::Failed(FetchError::Status { status: 503, .. })));

        let snap = feed.snapshot().await;
        assert_eq!(names(&snap), vec!["A", "B"]);
        assert!(snap.has_next_page);
        assert_eq!(snap.cursor, 2);
        assert!(matches!(snap.view(), FeedView::Failed { retryable: true, .. }));

        store.set_available(true);
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(2));
        let snap = feed.snapshot().await;
        assert_eq!(names(&snap), vec!["A", "B", "C", "D"]);
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn reset_reproduces_a_fresh_session() {
        let (svc, _) = catalog();
        let feed = FeedController::new(svc.clone(), 2, Sort::default());
        feed.load_more().await;
        feed.load_more().await;
        feed.reset().await;

        let reset_snap = feed.snapshot().await;
        assert!(reset_snap.items.is_empty());
        assert_eq!((reset_snap.cursor, reset_snap.has_next_page), (1, true));
        assert_eq!(reset_snap.generation, 1);

        for _ in 0..3 {
            feed.load_more().await;
        }
        let fresh = FeedController::new(svc, 2, Sort::default());
        for _ in 0..3 {
            fresh.load_more().await;
        }
        assert_eq!(feed.snapshot().await.items, fresh.snapshot().await.items);
    }

    #[tokio::test]
    async fn sort_change_discards_previous_list() {
        let (svc, _) = catalog();
        let feed = FeedController::new(svc, 2, Sort::default());
        feed.load_more().await;
        feed.load_more().await;
        assert_eq!(feed.len().await, 4);

        assert!(feed.change_sort(Sort::new(SortBy::Price, SortOrder::Desc)).await);
        assert!(!feed.change_sort(Sort::new(SortBy::Price, SortOrder::Desc)).await);
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(2));

        let snap = feed.snapshot().await;
        assert_eq!(names(&snap), vec!["C", "E"]);
        assert_eq!(snap.items.len(), 2);
    }

    #[tokio::test]
    async fn response_from_previous_session_is_discarded() {
        let (svc, _) = catalog();
        let source = GatedSource::new(svc);
        let feed = Arc::new(FeedController::new(source.clone(), 2, Sort::default()));

        let stale = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.load_more().await })
        };
        source.wait_for_calls(1).await;

        feed.change_sort(Sort::new(SortBy::Price, SortOrder::Desc)).await;
        let current = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.load_more().await })
        };
        source.wait_for_calls(2).await;

        // The semaphore is FIFO: the stale request is released first.
        source.gate.add_permits(1);
        assert_eq!(stale.await.unwrap(), LoadOutcome::Stale);
        let snap = feed.snapshot().await;
        assert!(snap.items.is_empty());
        assert!(snap.loading, "stale response must not clear the new session's loading flag");

        source.gate.add_permits(1);
        assert_eq!(current.await.unwrap(), LoadOutcome::Appended(2));
        assert_eq!(names(&feed.snapshot().await), vec!["C", "E"]);
    }

    #[tokio::test]
    async fn abandoned_request_does_not_block_the_session() {
        let (svc, _) = catalog();
        let source = GatedSource::new(svc);
        let feed = FeedController::new(source.clone(), 2, Sort::default());

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(50), feed.load_more()).await;
        assert!(timed_out.is_err());
        assert_eq!(source.calls(), 1);

        let snap = feed.snapshot().await;
        assert!(!snap.loading);
        assert_eq!(snap.phase(), FeedPhase::Idle);

        source.gate.add_permits(1);
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(2));
        assert_eq!(source.calls(), 2);
        assert_eq!(names(&feed.snapshot().await), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn abandoned_request_leaves_a_newer_session_loading() {
        let (svc, _) = catalog();
        let source = GatedSource::new(svc);
        let feed = Arc::new(FeedController::new(source.clone(), 2, Sort::default()));

        let abandoned = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.load_more().await })
        };
        source.wait_for_calls(1).await;
        feed.reset().await;
        let current = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.load_more().await })
        };
        source.wait_for_calls(2).await;

        abandoned.abort();
        assert!(abandoned.await.unwrap_err().is_cancelled());
        assert!(feed.snapshot().await.loading);
        assert_eq!(feed.load_more().await, LoadOutcome::Busy);

        source.gate.add_permits(1);
        assert_eq!(current.await.unwrap(), LoadOutcome::Appended(2));
    }

    #[tokio::test]
    async fn empty_catalog_shows_empty_state() {
        let store = Arc::new(MemoryProductStore::default());
        let feed = FeedController::new(Arc::new(CatalogService::new(store)), 10, Sort::default());
        assert_eq!(feed.load_more().await, LoadOutcome::Appended(0));
        assert_eq!(feed.view().await, FeedView::Empty);
    }

    #[tokio::test]
    async fn invalid_page_size_surfaces_as_error_not_panic() {
        let (svc, _) = catalog();
        let feed = FeedController::new(svc, 0, Sort::default());
        let outcome = feed.load_more().await;
        assert!(matches!(outcome, LoadOutcome::Failed(FetchError::Status { status: 400, .. })));
        assert!(matches!(feed.view().await, FeedView::Failed { retryable: false, .. }));
        assert!(feed.is_empty().await);
        assert!(feed.snapshot().await.has_next_page);
    }

    struct InconsistentSource;

    #[async_trait]
    impl PageSource for InconsistentSource {
        async fn fetch_page(&self, params: &PageParams) -> Result<ProductPage, FetchError> {
            Ok(ProductPage {
                items: vec![product("x", "X", 1)],
                has_next_page: true,
                next_page: None,
                page: params.page,
                page_size: params.page_size,
                total: 99,
            })
        }
    }

    #[tokio::test]
    async fn has_next_without_next_page_is_rejected() {
        let feed = FeedController::new(InconsistentSource, 1, Sort::default());
        let outcome = feed.load_more().await;
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(FetchError::UnexpectedResponseShape(_))
        ));
        assert!(feed.is_empty().await);
    }
}
