//! Decoding of media API pages.
//!
//! A page is `{ "data": { "data": [ ...entries ] } }`. Entries come in two
//! shapes: animated images (GIFs and stickers) with sized renditions, and
//! clips with a poster and an mp4 but no size.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::FeedError;
use crate::feed::FeedTab;
use crate::models::{InsertPayload, MediaItem, MediaKind, PLACEHOLDER_VIDEO_SIZE};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<PageData>,
}

#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    id: Value,
    #[serde(default)]
    title: String,
    file: ImageFile,
}

#[derive(Debug, Deserialize)]
struct ImageFile {
    md: MediumRenditions,
    sm: SmallRenditions,
}

#[derive(Debug, Deserialize)]
struct MediumRenditions {
    webp: Rendition,
    gif: Rendition,
}

#[derive(Debug, Deserialize)]
struct SmallRenditions {
    webp: Rendition,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    url: String,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ClipEntry {
    id: Value,
    #[serde(default)]
    title: String,
    file: ClipFile,
    #[serde(rename = "hasAudio", default)]
    has_audio: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ClipFile {
    webp: String,
    mp4: String,
}

/// Decodes one page of entries into media items, in page order.
///
/// Entries matching neither shape are dropped; malformed JSON is an error.
pub fn decode_page(bytes: &[u8], tab: FeedTab) -> Result<Vec<MediaItem>, FeedError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    let entries = envelope.data.and_then(|d| d.data).unwrap_or_default();

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        match decode_entry(entry, tab) {
            Some(item) => items.push(item),
            None => debug!(%tab, "Dropping unrecognized feed entry"),
        }
    }
    Ok(items)
}

fn decode_entry(entry: Value, tab: FeedTab) -> Option<MediaItem> {
    if tab == FeedTab::Clip {
        clip_item(&entry).or_else(|| image_item(&entry))
    } else {
        image_item(&entry).or_else(|| clip_item(&entry))
    }
}

fn image_item(entry: &Value) -> Option<MediaItem> {
    let entry = ImageEntry::deserialize(entry).ok()?;
    let md = entry.file.md;
    Some(MediaItem {
        id: id_string(&entry.id),
        kind: MediaKind::Image,
        intrinsic_width: md.webp.width,
        intrinsic_height: md.webp.height,
        display_url: entry.file.sm.webp.url,
        payload: InsertPayload::Image {
            url: md.gif.url,
            alt: entry.title.clone(),
        },
        title: entry.title,
    })
}

fn clip_item(entry: &Value) -> Option<MediaItem> {
    let entry = ClipEntry::deserialize(entry).ok()?;
    let (w, h) = PLACEHOLDER_VIDEO_SIZE;
    Some(MediaItem {
        id: id_string(&entry.id),
        kind: MediaKind::Video,
        intrinsic_width: Some(w),
        intrinsic_height: Some(h),
        display_url: entry.file.webp.clone(),
        payload: InsertPayload::Video {
            mp4_url: entry.file.mp4,
            poster_url: entry.file.webp,
            has_audio: entry.has_audio.unwrap_or(true),
        },
        title: entry.title,
    })
}

fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
