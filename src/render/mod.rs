//! Consumers of the layout engine's output.
//!
//! - `Renderer` - Maps a `Layout` onto positioned visual elements
//! - `Inserter` - Delivers a selected `MediaItem` to the host document

pub mod inserter;
pub mod renderer;

pub use inserter::{HtmlSnippetInserter, Inserter};
pub use renderer::{HtmlRenderer, Renderer, TextRenderer};

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
