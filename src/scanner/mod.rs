//! Local directory source for the media grid.
//!
//! - `FileScanner` - Discovers media files and builds `MediaItem`s
//! - `MetadataExtractor` - Reads intrinsic sizes from file headers

pub mod file_scanner;
pub mod metadata;

pub use file_scanner::{FileScanner, ScanConfig, ScanResult};
pub use metadata::MetadataExtractor;
