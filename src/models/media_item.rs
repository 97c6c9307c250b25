use serde::Serialize;

/// Intrinsic size given to clips, whose feed entries carry no dimensions (16:9).
pub const PLACEHOLDER_VIDEO_SIZE: (f64, f64) = (160.0, 90.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif" => Some(Self::Image),
            "webm" | "mp4" | "mkv" | "avi" | "mov" => Some(Self::Video),
            _ => None,
        }
    }
}

/// What the insertion side needs once an item is picked. Opaque to the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InsertPayload {
    Image {
        url: String,
        alt: String,
    },
    Video {
        mp4_url: String,
        poster_url: String,
        has_audio: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    pub id: String,
    pub kind: MediaKind,
    pub intrinsic_width: Option<f64>,
    pub intrinsic_height: Option<f64>,
    pub display_url: String,
    pub title: String,
    #[serde(skip)]
    pub payload: InsertPayload,
}

impl MediaItem {
    /// Create an image item whose insertion URL is its display URL.
    pub fn image(id: impl Into<String>, width: f64, height: f64, url: impl Into<String>) -> Self {
        let id = id.into();
        let url = url.into();
        Self {
            payload: InsertPayload::Image {
                url: url.clone(),
                alt: id.clone(),
            },
            title: id.clone(),
            id,
            kind: MediaKind::Image,
            intrinsic_width: Some(width),
            intrinsic_height: Some(height),
            display_url: url,
        }
    }

    /// Create a clip item with the placeholder intrinsic size.
    pub fn video(
        id: impl Into<String>,
        poster_url: impl Into<String>,
        mp4_url: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let poster_url = poster_url.into();
        let (w, h) = PLACEHOLDER_VIDEO_SIZE;
        Self {
            payload: InsertPayload::Video {
                mp4_url: mp4_url.into(),
                poster_url: poster_url.clone(),
                has_audio: true,
            },
            title: id.clone(),
            id,
            kind: MediaKind::Video,
            intrinsic_width: Some(w),
            intrinsic_height: Some(h),
            display_url: poster_url,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Intrinsic `(width, height)` if both are present, finite and positive.
    ///
    /// Anything else is invalid geometry and the item is left out of the layout.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        match (self.intrinsic_width, self.intrinsic_height) {
            (Some(w), Some(h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => {
                Some((w, h))
            }
            _ => None,
        }
    }

    pub fn has_valid_dimensions(&self) -> bool {
        self.dimensions().is_some()
    }

    pub fn aspect_ratio(&self) -> Option<f64> {
        self.dimensions().map(|(w, h)| w / h)
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}
