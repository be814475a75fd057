//! The core data types shared between the API client and the paging feed.
//!
//! `Article` is a single story normalised from the remote API's wire format.
//! `Page` is one fetched slice of the remote result set together with the
//! cursors needed to walk to its neighbours.

use chrono::{DateTime, Utc};

/// The first page key the remote API accepts.
pub const INITIAL_PAGE_KEY: u32 = 1;

/// A single news article, normalised from the API response.
///
/// Articles carry no stable identifier; their identity is their position in
/// the feed. The feed preserves fetch order and never de-duplicates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Article {
    /// Headline. Articles without one get a placeholder at parse time.
    pub title: String,
    /// Optional summary text.
    pub description: Option<String>,
    /// URL of the lead image, if the source provided one.
    pub image_url: Option<String>,
    /// Link to the full story.
    pub url: Option<String>,
    /// Publication timestamp, shown next to the headline.
    pub published: Option<DateTime<Utc>>,
}

/// One fetched page of articles plus the cursors to its neighbours.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Page {
    /// Articles in the order the API returned them.
    pub items: Vec<Article>,
    /// The key this page was fetched with.
    pub page_key: u32,
    /// Key of the preceding page; `None` on the first page.
    pub prev_key: Option<u32>,
    /// Key of the next page; `None` when this page came back empty,
    /// which is the API's end-of-data signal.
    pub next_key: Option<u32>,
}

impl Page {
    /// Build a page from fetched items, deriving both cursors.
    pub fn new(items: Vec<Article>, page_key: u32) -> Self {
        let prev_key = if page_key == INITIAL_PAGE_KEY {
            None
        } else {
            Some(page_key - 1)
        };
        let next_key = if items.is_empty() {
            None
        } else {
            Some(page_key + 1)
        };
        Self {
            items,
            page_key,
            prev_key,
            next_key,
        }
    }

    /// `true` once the remote result set is exhausted.
    pub fn is_last(&self) -> bool {
        self.next_key.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Shorthand constructor for tests.
    pub fn make_article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            image_url: None,
            url: None,
            published: None,
        }
    }

    #[test]
    fn first_page_has_no_prev_key() {
        let page = Page::new(vec![make_article("a")], INITIAL_PAGE_KEY);
        assert_eq!(page.prev_key, None);
        assert_eq!(page.next_key, Some(2));
    }

    #[test]
    fn later_pages_point_back_one_key() {
        for key in 2..=5 {
            let page = Page::new(vec![make_article("a")], key);
            assert_eq!(page.prev_key, Some(key - 1));
            assert_eq!(page.next_key, Some(key + 1));
        }
    }

    #[test]
    fn empty_page_terminates_pagination() {
        let page = Page::new(vec![], 3);
        assert_eq!(page.prev_key, Some(2));
        assert_eq!(page.next_key, None);
        assert!(page.is_last());
    }

    #[test]
    fn empty_first_page_is_both_first_and_last() {
        let page = Page::new(vec![], INITIAL_PAGE_KEY);
        assert_eq!(page.prev_key, None);
        assert!(page.is_last());
    }

    #[test]
    fn items_keep_fetch_order() {
        let page = Page::new(
            vec![make_article("first"), make_article("second")],
            INITIAL_PAGE_KEY,
        );
        assert_eq!(page.items[0].title, "first");
        assert_eq!(page.items[1].title, "second");
    }
}
