//! Media feed: the paged item source the layout consumes.
//!
//! This module provides:
//! - `FeedQuery` - Tab plus optional search, and the page URLs for it
//! - `decode_page` - API page JSON into `MediaItem`s
//! - `MediaFeed` - Paged accumulation with id de-duplication
//! - `FeedLoader` - Background page fetching through a `PageSource`

pub mod api;
pub mod loader;
pub mod media_feed;
pub mod query;

pub use api::decode_page;
pub use loader::{load_all, FeedLoader, JsonFilePageSource, PageRequest, PageResult, PageSource};
pub use media_feed::{MediaFeed, DEFAULT_PAGE_SIZE};
pub use query::{FeedQuery, FeedTab};
