use std::collections::HashSet;

use tracing::{debug, info};

use crate::feed::FeedQuery;
use crate::models::MediaItem;

/// Items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// The flat, growing item list for one query.
///
/// Pages are appended in order and items are de-duplicated by id. A short
/// page means the list is exhausted.
#[derive(Debug, Clone)]
pub struct MediaFeed {
    query: FeedQuery,
    page_size: usize,
    items: Vec<MediaItem>,
    seen: HashSet<String>,
    pages_loaded: u32,
    last_page_len: Option<usize>,
}

impl MediaFeed {
    pub fn new(query: FeedQuery, page_size: usize) -> Self {
        Self {
            query,
            page_size: page_size.max(1),
            items: Vec::new(),
            seen: HashSet::new(),
            pages_loaded: 0,
            last_page_len: None,
        }
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    /// True until a page shorter than `page_size` arrives.
    pub fn has_more(&self) -> bool {
        self.last_page_len.map_or(true, |len| len == self.page_size)
    }

    /// 1-based number of the page to request next, if any.
    pub fn next_page(&self) -> Option<u32> {
        self.has_more().then_some(self.pages_loaded + 1)
    }

    /// Appends a page, skipping ids already in the feed.
    ///
    /// Returns the number of items added.
    pub fn append_page(&mut self, page: Vec<MediaItem>) -> usize {
        let raw_len = page.len();
        let before = self.items.len();

        for item in page {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            }
        }

        self.pages_loaded += 1;
        self.last_page_len = Some(raw_len);

        let added = self.items.len() - before;
        debug!(
            page = self.pages_loaded,
            raw_len,
            added,
            total = self.items.len(),
            "Appended feed page"
        );
        added
    }

    /// Starts over for a new query (tab switch or new search).
    pub fn reset(&mut self, query: FeedQuery) {
        info!(tab = %query.tab, search = ?query.search, "Resetting feed");
        self.query = query;
        self.items.clear();
        self.seen.clear();
        self.pages_loaded = 0;
        self.last_page_len = None;
    }
}
