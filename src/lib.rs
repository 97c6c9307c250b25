//! Row-packing masonry layout for media grids.
//!
//! Items of arbitrary aspect ratio are packed into full-width rows by trying
//! every integer row height in a range and keeping the prefix of a small
//! look-ahead window that best fills the container.

pub mod config;
pub mod error;
pub mod feed;
pub mod layout;
pub mod models;
pub mod render;
pub mod scanner;

pub use config::AppConfig;
pub use layout::{LayoutConstraints, LayoutEngine, RowSequencer};
pub use models::{Layout, MediaItem, PositionedItem, Row};
