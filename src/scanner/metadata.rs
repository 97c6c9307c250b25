//! Intrinsic size extraction for local media files.
//!
//! Only image headers are read. Videos get the same 16:9 placeholder the feed
//! uses for clips.

use std::path::Path;

use image::ImageReader;
use tracing::{trace, warn};

use crate::models::{MediaKind, PLACEHOLDER_VIDEO_SIZE};

/// Error state marker for broken media files.
pub const ERROR_DIMENSION: u32 = 0;

pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extracts `(width, height)` for an image or video file.
    ///
    /// Returns `(0, 0)` for broken/unreadable files instead of erroring; the
    /// layout leaves such items out.
    pub fn extract_dimensions(path: &Path) -> (u32, u32) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match MediaKind::from_extension(&ext) {
            Some(MediaKind::Image) => Self::extract_image_dimensions(path),
            Some(MediaKind::Video) => {
                let (w, h) = PLACEHOLDER_VIDEO_SIZE;
                (w as u32, h as u32)
            }
            None => {
                warn!("Unknown media type for extension: {}", ext);
                (ERROR_DIMENSION, ERROR_DIMENSION)
            }
        }
    }

    /// Reads image dimensions from the header without decoding pixels.
    fn extract_image_dimensions(path: &Path) -> (u32, u32) {
        trace!("Extracting image dimensions from {:?}", path);

        match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => match reader.into_dimensions() {
                Ok((width, height)) => {
                    trace!("Got dimensions {}x{} for {:?}", width, height, path);
                    (width, height)
                }
                Err(e) => {
                    warn!("Failed to read image dimensions for {:?}: {}", path, e);
                    (ERROR_DIMENSION, ERROR_DIMENSION)
                }
            },
            Err(e) => {
                warn!("Failed to open image {:?}: {}", path, e);
                (ERROR_DIMENSION, ERROR_DIMENSION)
            }
        }
    }
}
