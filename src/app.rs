//! Application state: the paging feed plus list selection.
//!
//! `App` owns the [`PagingFeed`] and the scroll position. Every selection
//! move goes through [`App::select`], which reads the target index via
//! [`PagingFeed::item_at`]; that read arms the edge-triggered prefetch, so
//! scrolling toward the bottom of the list is all it takes to pull in the
//! next page.

use ratatui::widgets::ListState;

use crate::feed::{LoadState, PagingFeed};

pub struct App {
    /// The paged article feed this screen renders.
    pub feed: PagingFeed,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Label of the backing source, shown in the list title.
    pub source_name: String,
}

impl App {
    pub fn new(feed: PagingFeed, source_name: impl Into<String>) -> Self {
        Self {
            feed,
            list_state: ListState::default(),
            quit: false,
            source_name: source_name.into(),
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.feed.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.feed.len() - 1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_previous(&mut self) {
        if self.feed.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_first(&mut self) {
        if !self.feed.is_empty() {
            self.select(0);
        }
    }

    pub fn select_last(&mut self) {
        if !self.feed.is_empty() {
            self.select(self.feed.len() - 1);
        }
    }

    fn select(&mut self, index: usize) {
        self.list_state.select(Some(index));
        // Reading the selected article is what schedules the next page once
        // the selection gets close to the end of the loaded items.
        self.feed.item_at(index);
    }

    // -- commands ------------------------------------------------------------

    /// The `r` key: re-issue the failed load if there is one, otherwise
    /// reload the feed from the first page.
    pub fn refresh_or_retry(&mut self) {
        if self.feed.load_state() == LoadState::Error {
            self.feed.retry();
        } else {
            self.feed.refresh();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Article, Page};
    use crate::worker::{FetchOutcome, FetchRequest, LoadKind};
    use std::sync::mpsc;

    fn make_article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            image_url: None,
            url: None,
            published: None,
        }
    }

    /// An app whose feed has page 1 loaded with `count` articles.
    fn loaded_app(count: usize) -> (App, mpsc::Receiver<FetchRequest>) {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(PagingFeed::new(tx), "test");
        let items = (0..count).map(|i| make_article(&format!("t{i}"))).collect();
        app.feed.apply(FetchOutcome {
            kind: LoadKind::Refresh,
            result: Ok(Page::new(items, 1)),
        });
        (app, rx)
    }

    fn empty_app() -> App {
        let (tx, _rx) = mpsc::channel();
        App::new(PagingFeed::new(tx), "test")
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let app = empty_app();
        assert!(app.feed.is_empty());
        assert!(!app.quit);
        assert!(app.list_state.selected().is_none());
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn select_next_on_empty_is_noop() {
        let mut app = empty_app();
        app.select_next();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_previous_on_empty_is_noop() {
        let mut app = empty_app();
        app.select_previous();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_advances() {
        let (mut app, _rx) = loaded_app(8);

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(0));

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn select_next_clamps_at_last_item() {
        let (mut app, _rx) = loaded_app(3);

        app.select_last();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let (mut app, _rx) = loaded_app(3);

        app.select_first();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn select_first_and_last_jump() {
        let (mut app, _rx) = loaded_app(5);

        app.select_last();
        assert_eq!(app.list_state.selected(), Some(4));

        app.select_first();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    // -- edge-triggered prefetch via scrolling -------------------------------

    #[test]
    fn scrolling_to_the_bottom_requests_the_next_page() {
        let (mut app, rx) = loaded_app(8);

        app.select_first();
        assert!(rx.try_iter().next().is_none(), "top of the list is quiet");

        app.select_last();
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![FetchRequest::Append { page_key: 2 }]
        );
    }

    #[test]
    fn scrolling_near_the_bottom_is_enough_to_prefetch() {
        let (mut app, rx) = loaded_app(8);

        for _ in 0..6 {
            app.select_next(); // lands on index 5, three from the end
        }

        assert_eq!(rx.try_iter().count(), 1);
    }

    // -- refresh_or_retry ----------------------------------------------------

    #[test]
    fn refresh_or_retry_refreshes_when_idle() {
        let (mut app, rx) = loaded_app(2);
        app.refresh_or_retry();

        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![FetchRequest::Refresh]
        );
        assert_eq!(app.feed.load_state(), LoadState::LoadingRefresh);
    }

    #[test]
    fn refresh_or_retry_retries_the_failed_operation() {
        let (mut app, rx) = loaded_app(2);
        app.feed.load_more();
        app.feed.apply(FetchOutcome {
            kind: LoadKind::Append,
            result: Err(crate::client::FetchError::Server { status: 502 }),
        });
        rx.try_iter().count();

        app.refresh_or_retry();

        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![FetchRequest::Append { page_key: 2 }]
        );
    }
}
