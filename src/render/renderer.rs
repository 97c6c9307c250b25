use std::fmt::Write;

use crate::models::{InsertPayload, Layout, MediaKind};
use crate::render::escape_html;

/// Turns a finished layout into something visible.
pub trait Renderer {
    type Output;

    fn render(&mut self, layout: &Layout) -> Self::Output;
}

/// Absolutely positioned HTML fragment; one element per item.
///
/// Videos are emitted as muted, looping, poster-first elements. Playback and
/// selection wiring belong to the host page.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    pub corner_radius: f64,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self { corner_radius: 8.0 }
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(&mut self, layout: &Layout) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<div class="masonry-container" style="position:relative;width:{}px;height:{}px;">"#,
            px(layout.container_width),
            px(layout.total_height)
        );

        for positioned in &layout.items {
            let Some(packed) = layout.packed(positioned) else {
                continue;
            };
            let item = &packed.item;

            let _ = write!(
                out,
                r#"  <div class="media-wrapper" data-id="{}" style="position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;overflow:hidden;border-radius:{}px;">"#,
                escape_html(&item.id),
                px(positioned.x),
                px(positioned.y),
                px(positioned.width.max(0.0)),
                px(positioned.height.max(0.0)),
                px(self.corner_radius)
            );

            let src = escape_html(&item.display_url);
            match item.kind {
                MediaKind::Image => {
                    let _ = write!(
                        out,
                        r#"<img src="{src}" alt="{}" style="width:100%;height:100%;object-fit:cover;" />"#,
                        escape_html(&item.title)
                    );
                }
                MediaKind::Video => {
                    let video_src = match &item.payload {
                        InsertPayload::Video { mp4_url, .. } => escape_html(mp4_url),
                        InsertPayload::Image { .. } => String::new(),
                    };
                    let _ = write!(
                        out,
                        r#"<video src="{video_src}" poster="{src}" loop muted playsinline preload="metadata" style="width:100%;height:100%;object-fit:cover;"></video>"#
                    );
                }
            }
            out.push_str("</div>\n");
        }

        out.push_str("</div>\n");
        out
    }
}

/// Plain-text row dump for terminals and logs.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&mut self, layout: &Layout) -> String {
        let mut out = String::new();

        // Positioned items are stored row after row.
        let mut first = 0;
        for row in &layout.rows {
            let y = layout.items.get(first).map_or(0.0, |p| p.y);
            first += row.items.len();
            let _ = write!(out, "row {:<3} y={:<7} h={:<4}", row.row_index, px(y), row.height);
            for packed in &row.items {
                let _ = write!(out, " [{} w={}]", packed.item.id, px(packed.render_width));
            }
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "{} items in {} rows, {}px tall",
            layout.len(),
            layout.row_count(),
            px(layout.total_height)
        );
        out
    }
}

/// Pixel value with at most two decimals and no trailing zeros.
fn px(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
