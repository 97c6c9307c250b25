//! Directory scanner turning local media files into layout items.
//!
//! This module provides the `FileScanner` struct which handles:
//! - Recursive directory scanning using walkdir
//! - Media type detection by file extension
//! - Header-only size extraction off the async runtime

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::task;
use tracing::{debug, info, warn};
use url::Url;
use walkdir::WalkDir;

use crate::models::{InsertPayload, MediaItem, MediaKind};
use crate::scanner::metadata::{MetadataExtractor, ERROR_DIMENSION};

/// Configuration for the file scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: 0, // unlimited
            follow_symlinks: false,
        }
    }
}

/// Statistics from a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub total_files: usize,
    pub images: usize,
    pub videos: usize,
    /// Files whose size could not be read; they stay in the list but never lay out.
    pub unreadable: usize,
}

/// A media file found during discovery.
#[derive(Debug, Clone)]
struct DiscoveredEntry {
    path: PathBuf,
    kind: MediaKind,
}

pub struct FileScanner {
    config: ScanConfig,
}

impl FileScanner {
    /// Creates a new file scanner with default configuration.
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    /// Creates a new file scanner with custom configuration.
    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scans a directory and returns its media items sorted by path.
    pub async fn scan_directory(&self, dir: &Path) -> Result<(Vec<MediaItem>, ScanResult)> {
        let dir = dir.to_path_buf();
        let config = self.config.clone();

        // Header reads are blocking I/O
        task::spawn_blocking(move || Self::scan_directory_sync(&dir, &config))
            .await
            .context("Scan task panicked")?
    }

    fn scan_directory_sync(
        dir: &Path,
        config: &ScanConfig,
    ) -> Result<(Vec<MediaItem>, ScanResult)> {
        info!("Starting scan of {:?}", dir);

        let discovered = Self::discover_files(dir, config)?;
        info!("Discovered {} media files", discovered.len());

        let mut result = ScanResult {
            total_files: discovered.len(),
            ..Default::default()
        };
        let mut items = Vec::with_capacity(discovered.len());

        for entry in discovered {
            let item = Self::process_entry(&entry);
            match entry.kind {
                MediaKind::Image => result.images += 1,
                MediaKind::Video => result.videos += 1,
            }
            if !item.has_valid_dimensions() {
                result.unreadable += 1;
            }
            items.push(item);
        }

        info!(
            "Scan complete: {} total, {} images, {} videos, {} unreadable",
            result.total_files, result.images, result.videos, result.unreadable
        );

        Ok((items, result))
    }

    /// Discovers all media files in a directory.
    fn discover_files(dir: &Path, config: &ScanConfig) -> Result<Vec<DiscoveredEntry>> {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {:?}", dir);
        }

        let mut walker = WalkDir::new(dir).follow_links(config.follow_symlinks);

        if !config.recursive {
            walker = walker.max_depth(1);
        } else if config.max_depth > 0 {
            walker = walker.max_depth(config.max_depth);
        }

        let mut entries = Vec::new();

        for entry in walker.into_iter() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

            let Some(kind) = MediaKind::from_extension(ext) else {
                continue; // Skip non-media files
            };

            entries.push(DiscoveredEntry {
                path: path.to_path_buf(),
                kind,
            });
        }

        // Sort by path for consistent ordering
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(entries)
    }

    fn process_entry(entry: &DiscoveredEntry) -> MediaItem {
        let (width, height) = MetadataExtractor::extract_dimensions(&entry.path);
        if width == ERROR_DIMENSION {
            debug!("No usable size for {:?}", entry.path);
        }

        let url = file_url(&entry.path);
        let title = entry
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let payload = match entry.kind {
            MediaKind::Image => InsertPayload::Image {
                url: url.clone(),
                alt: title.clone(),
            },
            MediaKind::Video => InsertPayload::Video {
                mp4_url: url.clone(),
                poster_url: url.clone(),
                has_audio: true,
            },
        };

        MediaItem {
            id: entry.path.to_string_lossy().into_owned(),
            kind: entry.kind,
            intrinsic_width: Some(width as f64),
            intrinsic_height: Some(height as f64),
            display_url: url,
            title,
            payload,
        }
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// `file://` URL for a scanned path, absolute when the path resolves.
fn file_url(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    Url::from_file_path(&absolute)
        .map(String::from)
        .unwrap_or_else(|()| format!("file://{}", absolute.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    /// Writes a blank PNG of the given size.
    pub(crate) fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_discover_skips_non_media_and_sorts() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("b.png"), 2, 2);
        write_png(&dir.path().join("a.png"), 2, 2);
        File::create(dir.path().join("clip.webm")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let entries = FileScanner::discover_files(dir.path(), &ScanConfig::default()).unwrap();

        let names: Vec<_> = entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "clip.webm"]);
        assert_eq!(entries[2].kind, MediaKind::Video);
    }

    #[test]
    fn test_discover_rejects_file_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.png");
        write_png(&file, 1, 1);
        assert!(FileScanner::discover_files(&file, &ScanConfig::default()).is_err());
    }

    #[test]
    fn test_file_url_encodes_segments() {
        let url = file_url(Path::new("/tmp/my photos/a#1.png"));
        assert_eq!(url, "file:///tmp/my%20photos/a%231.png");
    }

    #[test]
    fn test_file_url_relative_fallback() {
        let url = file_url(Path::new("missing/clip.mp4"));
        assert_eq!(url, "file://missing/clip.mp4");
    }

    #[tokio::test]
    async fn test_scan_builds_items() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("sunset.png"), 40, 30);
        File::create(dir.path().join("trailer.mp4")).unwrap();
        fs::write(dir.path().join("broken.gif"), b"nope").unwrap();

        let (items, result) = FileScanner::new().scan_directory(dir.path()).await.unwrap();

        assert_eq!(result.total_files, 3);
        assert_eq!(result.images, 2);
        assert_eq!(result.videos, 1);
        assert_eq!(result.unreadable, 1);

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["broken", "sunset", "trailer"]);

        let sunset = &items[1];
        assert!(sunset.id.ends_with("sunset.png"));
        assert_eq!(sunset.dimensions(), Some((40.0, 30.0)));
        assert!(sunset.display_url.starts_with("file:///"));
        assert!(sunset.display_url.ends_with("/sunset.png"));
        assert_eq!(
            sunset.payload,
            InsertPayload::Image {
                url: sunset.display_url.clone(),
                alt: "sunset".into(),
            }
        );

        let trailer = &items[2];
        assert!(trailer.is_video());
        assert_eq!(trailer.dimensions(), Some((160.0, 90.0)));
        assert!(matches!(
            &trailer.payload,
            InsertPayload::Video { mp4_url, poster_url, .. }
                if mp4_url == &trailer.display_url && poster_url == &trailer.display_url
        ));

        assert!(!items[0].has_valid_dimensions());
    }

    #[tokio::test]
    async fn test_scan_non_recursive_ignores_subdirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_png(&dir.path().join("top.png"), 3, 1);
        write_png(&nested.join("deep.png"), 3, 1);

        let scanner = FileScanner::with_config(ScanConfig {
            recursive: false,
            ..Default::default()
        });
        let (items, _) = scanner.scan_directory(dir.path()).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "top");
    }

    #[tokio::test]
    async fn test_scanned_items_lay_out() {
        let dir = tempdir().unwrap();
        for i in 0..4 {
            write_png(&dir.path().join(format!("{i}.png")), 16, 9);
        }
        File::create(dir.path().join("zz.mp4")).unwrap();

        let (items, _) = FileScanner::new().scan_directory(dir.path()).await.unwrap();
        let layout = crate::layout::RowSequencer::new(Default::default()).layout(&items);

        assert_eq!(layout.len(), 5);
    }
}
