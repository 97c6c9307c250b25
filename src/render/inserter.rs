use std::io::Write;

use tracing::debug;

use crate::error::InsertError;
use crate::models::{InsertPayload, MediaItem};
use crate::render::escape_html;

/// Hands a selected item to the host document.
pub trait Inserter {
    fn insert(&mut self, item: &MediaItem) -> Result<(), InsertError>;
}

/// Writes an HTML snippet for each selected item.
///
/// Images become an inline `<img>`; clips become a link to the mp4 wrapping
/// the poster image, since most hosts cannot embed video.
pub struct HtmlSnippetInserter<W: Write> {
    out: W,
}

impl<W: Write> HtmlSnippetInserter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Snippet for an item, without writing it.
    pub fn snippet(item: &MediaItem) -> Result<String, InsertError> {
        match &item.payload {
            InsertPayload::Image { url, alt } => {
                if url.is_empty() {
                    return Err(InsertError::MissingUrl(item.id.clone()));
                }
                Ok(format!(
                    r#"<img src="{}" alt="{}" style="max-width:100%;height:auto;" />"#,
                    escape_html(url),
                    escape_html(alt)
                ))
            }
            InsertPayload::Video {
                mp4_url,
                poster_url,
                ..
            } => {
                if mp4_url.is_empty() {
                    return Err(InsertError::MissingUrl(item.id.clone()));
                }
                Ok(format!(
                    concat!(
                        r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                        r#"<img src="{}" alt="Video thumbnail" style="max-width:100%;height:auto;" />"#,
                        r#"<p style="font-size:10px; color:#555;">Click to watch video</p>"#,
                        "</a>"
                    ),
                    escape_html(mp4_url),
                    escape_html(poster_url)
                ))
            }
        }
    }
}

impl<W: Write> Inserter for HtmlSnippetInserter<W> {
    fn insert(&mut self, item: &MediaItem) -> Result<(), InsertError> {
        let snippet = Self::snippet(item)?;
        writeln!(self.out, "{snippet}")?;
        debug!(id = %item.id, "Inserted snippet");
        Ok(())
    }
}
