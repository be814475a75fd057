//! The paging feed: a lazily-growing, position-addressable article list.
//!
//! `PagingFeed` owns all pagination state (the loaded articles, the next
//! page key, and the load status) and mediates every page load. Fetches
//! themselves run on the worker thread ([`crate::worker`]); each operation
//! here is therefore split in two: the operation method performs the state
//! transition and enqueues a request, and [`PagingFeed::apply`] folds the
//! worker's outcome back in when the main loop receives it. At most one
//! fetch is in flight per feed: the load state doubles as the guard, and a
//! load requested while one is pending is ignored, not queued.

use std::sync::mpsc;

use tracing::debug;

use crate::client::{Article, FetchError, INITIAL_PAGE_KEY};
use crate::worker::{FetchOutcome, FetchRequest, LoadKind};

/// How close a read may get to the end of the loaded items before the next
/// page is scheduled. Reading any of the trailing `PREFETCH_DISTANCE` items
/// arms the prefetch.
const PREFETCH_DISTANCE: usize = 3;

/// Status of the feed's most recent or in-flight operation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LoadState {
    /// Nothing in flight; the last operation (if any) succeeded.
    Idle,
    /// A refresh is waiting on the worker.
    LoadingRefresh,
    /// An append is waiting on the worker.
    LoadingAppend,
    /// The last operation failed; see [`PagingFeed::last_error`].
    Error,
}

/// A paged, append-only view over a remote article source.
pub struct PagingFeed {
    /// Loaded articles in fetch order. Never reordered or de-duplicated.
    items: Vec<Article>,
    load_state: LoadState,
    last_error: Option<FetchError>,
    /// Key of the next page to append; `None` once the feed is exhausted.
    next_key: Option<u32>,
    /// Which operation to re-issue on [`retry`](PagingFeed::retry).
    failed: Option<LoadKind>,
    requests: mpsc::Sender<FetchRequest>,
}

impl PagingFeed {
    /// Create an empty feed that enqueues its fetches on `requests`.
    pub fn new(requests: mpsc::Sender<FetchRequest>) -> Self {
        Self {
            items: Vec::new(),
            load_state: LoadState::Idle,
            last_error: None,
            next_key: Some(INITIAL_PAGE_KEY),
            failed: None,
            requests,
        }
    }

    // -- read model ----------------------------------------------------------

    /// All loaded articles, in fetch order.
    pub fn items(&self) -> &[Article] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// The error recorded by the most recent failed operation.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// `true` while a fetch is waiting on the worker.
    pub fn is_loading(&self) -> bool {
        matches!(
            self.load_state,
            LoadState::LoadingRefresh | LoadState::LoadingAppend
        )
    }

    /// `true` once the remote result set is exhausted (until a refresh).
    pub fn is_exhausted(&self) -> bool {
        self.next_key.is_none()
    }

    // -- operations ----------------------------------------------------------

    /// Reload the feed from the first page.
    ///
    /// Ignored while a load is in flight. Loaded items stay visible until
    /// the fresh page arrives; a failed refresh leaves them untouched.
    pub fn refresh(&mut self) {
        if self.is_loading() {
            return;
        }
        self.load_state = LoadState::LoadingRefresh;
        self.send(FetchRequest::Refresh);
    }

    /// Fetch the next page and append it.
    ///
    /// Ignored when the feed is exhausted or a load is already in flight:
    /// no queueing, no cancellation of the pending fetch.
    pub fn load_more(&mut self) {
        let Some(page_key) = self.next_key else {
            return;
        };
        if self.is_loading() {
            return;
        }
        self.load_state = LoadState::LoadingAppend;
        self.send(FetchRequest::Append { page_key });
    }

    /// Re-issue whichever operation most recently failed, with the same key.
    ///
    /// Only acts in the [`LoadState::Error`] state, so calling it repeatedly
    /// while the re-issued fetch is pending does not compound requests.
    pub fn retry(&mut self) {
        if self.load_state != LoadState::Error {
            return;
        }
        match self.failed {
            Some(LoadKind::Refresh) => self.refresh(),
            // A failed append left next_key untouched, so this resumes from
            // the exact key that failed.
            Some(LoadKind::Append) => self.load_more(),
            None => {}
        }
    }

    /// The article at `index`, if loaded.
    ///
    /// Reading within [`PREFETCH_DISTANCE`] of the end of the loaded items
    /// implicitly schedules the next page load, so a scrolling consumer
    /// never issues pagination calls itself.
    pub fn item_at(&mut self, index: usize) -> Option<&Article> {
        if self.items.len().saturating_sub(index) <= PREFETCH_DISTANCE {
            // No-op when exhausted or already loading.
            self.load_more();
        }
        self.items.get(index)
    }

    // -- worker plumbing -----------------------------------------------------

    /// Fold a completed fetch back into the feed state.
    ///
    /// The single-in-flight guard means exactly one outcome can be pending,
    /// so the outcome always belongs to the transition currently loading.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match (outcome.kind, outcome.result) {
            (LoadKind::Refresh, Ok(page)) => {
                debug!(page_key = page.page_key, items = page.items.len(), last = page.is_last(), "refresh applied");
                self.items = page.items;
                self.next_key = page.next_key;
                self.finish_ok();
            }
            (LoadKind::Append, Ok(page)) => {
                debug!(page_key = page.page_key, appended = page.items.len(), last = page.is_last(), "append applied");
                self.items.extend(page.items);
                self.next_key = page.next_key;
                self.finish_ok();
            }
            (kind, Err(error)) => {
                debug!(?kind, error = %error, "load failed");
                self.failed = Some(kind);
                self.last_error = Some(error);
                self.load_state = LoadState::Error;
            }
        }
    }

    fn finish_ok(&mut self) {
        self.last_error = None;
        self.failed = None;
        self.load_state = LoadState::Idle;
    }

    fn send(&self, request: FetchRequest) {
        // The worker outlives the feed except during shutdown, when a lost
        // request is unobservable.
        let _ = self.requests.send(request);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
