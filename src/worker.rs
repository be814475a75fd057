//! Background page fetching.
//!
//! Runs on a dedicated thread, performing one blocking network call per
//! request from the paging feed and sending the outcome back to the UI
//! thread over an [`mpsc`] channel.
//!
//! Requests are processed strictly one at a time off a single channel, so
//! two page loads can never overlap: the feed's in-flight flag rejects
//! duplicates before they are enqueued, and the worker serialises whatever
//! does arrive.

use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::client::{ArticleSource, FetchError, Page, INITIAL_PAGE_KEY};

/// Which feed operation a fetch serves.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LoadKind {
    /// Reload the feed from the first page.
    Refresh,
    /// Extend the feed with the next page.
    Append,
}

/// A fetch the feed wants performed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FetchRequest {
    /// Fetch the first page.
    Refresh,
    /// Fetch the page at `page_key`.
    Append { page_key: u32 },
}

impl FetchRequest {
    /// The operation this request belongs to.
    pub fn kind(&self) -> LoadKind {
        match self {
            FetchRequest::Refresh => LoadKind::Refresh,
            FetchRequest::Append { .. } => LoadKind::Append,
        }
    }

    fn page_key(&self) -> u32 {
        match self {
            FetchRequest::Refresh => INITIAL_PAGE_KEY,
            FetchRequest::Append { page_key } => *page_key,
        }
    }
}

/// The result of one fetch, sent from the worker back to the UI thread.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The operation the fetch served.
    pub kind: LoadKind,
    /// The fetched page, or the tagged failure.
    pub result: Result<Page, FetchError>,
}

/// Spawn the background fetch thread.
///
/// Returns the sender the feed enqueues requests on and the receiver the
/// main loop drains on every tick. The thread needs no explicit shutdown
/// signal: when either channel end is dropped the next `recv`/`send` fails
/// and the thread returns, so no outcome is ever applied after the feed is
/// torn down.
pub fn spawn(
    source: Box<dyn ArticleSource>,
    page_size: u32,
) -> (mpsc::Sender<FetchRequest>, mpsc::Receiver<FetchOutcome>) {
    let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
    let (outcome_tx, outcome_rx) = mpsc::channel::<FetchOutcome>();

    thread::spawn(move || {
        while let Ok(request) = request_rx.recv() {
            let page_key = request.page_key();
            let result = source.fetch_page(page_key, page_size);
            match &result {
                Ok(page) => debug!(
                    source = source.name(),
                    page_key,
                    prev_key = ?page.prev_key,
                    next_key = ?page.next_key,
                    items = page.items.len(),
                    "page fetched"
                ),
                Err(e) => warn!(
                    source = source.name(),
                    page_key,
                    kind = e.kind(),
                    error = %e,
                    "page fetch failed"
                ),
            }

            let outcome = FetchOutcome {
                kind: request.kind(),
                result,
            };
            // If the receiver is gone the main thread has exited;
            // silently stop fetching.
            if outcome_tx.send(outcome).is_err() {
                return;
            }
        }
        // Request sender dropped: the feed was disposed.
    });

    (request_tx, outcome_rx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
