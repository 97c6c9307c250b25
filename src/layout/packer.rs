use tracing::trace;

use crate::layout::LayoutConstraints;
use crate::models::{MediaItem, PackedItem};

/// The result of packing one window.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRow {
    /// Shared row height; 0 when the row is empty.
    pub height: u32,
    pub items: Vec<PackedItem>,
    /// Window slots covered by the winning prefix (0 when empty).
    pub consumed: usize,
    /// Container width minus the winning candidate's total width, before spreading.
    pub delta: f64,
}

impl PackedRow {
    fn empty() -> Self {
        Self {
            height: 0,
            items: Vec::new(),
            consumed: 0,
            delta: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One `(height, prefix)` combination evaluated during the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowCandidate {
    pub height: u32,
    /// Window slots covered, invalid items included.
    pub prefix_len: usize,
    /// Items with valid geometry in the prefix.
    pub valid_len: usize,
    pub delta: f64,
}

struct Best {
    height: u32,
    /// `(window slot, rounded candidate width)` for each valid item.
    widths: Vec<(usize, f64)>,
    consumed: usize,
    delta: f64,
}

/// Chooses a row height and a contiguous prefix of a small window so the
/// row's width lands as close as possible to the container width.
///
/// # Algorithm
/// 1. For every integer height in `min_height..=max_height`, grow a prefix of
///    the window one item at a time, skipping items without valid geometry.
/// 2. Each valid item gets `round(w * height / h)`, capped at `max_item_width`.
/// 3. Keep the combination whose `container - (widths + gaps)` is smallest in
///    magnitude, with one special case: a single-item best is always replaced
///    by a multi-item candidate, and a single-item candidate is only accepted
///    when nothing has been accepted yet.
/// 4. Spread the winning delta evenly over the row's items.
///
/// This is a bounded greedy scan (`window × height range`), not an optimal
/// packer; which rows come out of it is observable and must stay stable.
#[derive(Debug, Clone)]
pub struct RowPacker {
    constraints: LayoutConstraints,
}

impl RowPacker {
    pub fn new(constraints: LayoutConstraints) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> &LayoutConstraints {
        &self.constraints
    }

    /// Packs a window whose first item sits at input position 0.
    pub fn pack(&self, window: &[MediaItem]) -> PackedRow {
        self.pack_at(window, 0)
    }

    /// Packs a window whose first item sits at input position `base_index`.
    ///
    /// Returns an empty row when no item in the window has valid geometry.
    pub fn pack_at(&self, window: &[MediaItem], base_index: usize) -> PackedRow {
        let window = self.clip(window);
        let mut best: Option<Best> = None;

        self.scan(window, |candidate, widths| {
            if accepts(best.as_ref(), candidate) {
                best = Some(Best {
                    height: candidate.height,
                    widths: widths.to_vec(),
                    consumed: candidate.prefix_len,
                    delta: candidate.delta,
                });
            }
        });

        let Some(best) = best else {
            return PackedRow::empty();
        };

        let share = best.delta / best.widths.len() as f64;
        let items: Vec<PackedItem> = best
            .widths
            .iter()
            .map(|&(slot, width)| PackedItem {
                item: window[slot].clone(),
                source_index: base_index + slot,
                render_width: (width + share).min(self.constraints.max_item_width),
                render_height: best.height as f64,
            })
            .collect();

        trace!(
            base_index,
            height = best.height,
            items = items.len(),
            consumed = best.consumed,
            delta = best.delta,
            "Packed row"
        );

        PackedRow {
            height: best.height,
            items,
            consumed: best.consumed,
            delta: best.delta,
        }
    }

    /// Every combination the search evaluates, in evaluation order.
    pub fn candidates(&self, window: &[MediaItem]) -> Vec<RowCandidate> {
        let window = self.clip(window);
        let mut out = Vec::new();
        self.scan(window, |candidate, _| out.push(candidate));
        out
    }

    fn clip<'a>(&self, window: &'a [MediaItem]) -> &'a [MediaItem] {
        &window[..window.len().min(self.constraints.max_window_size)]
    }

    fn scan(&self, window: &[MediaItem], mut visit: impl FnMut(RowCandidate, &[(usize, f64)])) {
        let c = &self.constraints;
        let mut widths: Vec<(usize, f64)> = Vec::with_capacity(window.len());

        for height in c.min_height..=c.max_height {
            widths.clear();
            let mut sum = 0.0f64;

            for (slot, item) in window.iter().enumerate() {
                // Invalid items are left out but do not end the prefix.
                let Some((w, h)) = item.dimensions() else {
                    continue;
                };

                let width = (w * height as f64 / h).round().min(c.max_item_width);
                widths.push((slot, width));
                sum += width;

                let total = sum + c.gap * (widths.len() - 1) as f64;
                visit(
                    RowCandidate {
                        height,
                        prefix_len: slot + 1,
                        valid_len: widths.len(),
                        delta: c.container_width - total,
                    },
                    &widths,
                );
            }
        }
    }
}

fn accepts(best: Option<&Best>, candidate: RowCandidate) -> bool {
    let (best_len, best_abs) = best.map_or((0, f64::MAX), |b| (b.widths.len(), b.delta.abs()));
    let n = candidate.valid_len;

    let better = candidate.delta.abs() < best_abs || (best_len == 1 && n != 1);
    better && (n != 1 || best_len == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: &str, width: f64, height: f64) -> MediaItem {
        MediaItem::image(id, width, height, format!("{id}.webp"))
    }

    fn packer() -> RowPacker {
        RowPacker::new(LayoutConstraints::default())
    }

    #[test]
    fn test_three_items_fill_row_exactly() {
        let window = vec![
            make_item("a", 100.0, 100.0),
            make_item("b", 200.0, 100.0),
            make_item("c", 50.0, 100.0),
        ];

        let row = packer().pack(&window);

        // 77 + 154 + round(38.5) + 2 * 5 == 280
        assert_eq!(row.height, 77);
        assert_eq!(row.consumed, 3);
        assert_eq!(row.delta, 0.0);
        let widths: Vec<f64> = row.items.iter().map(|i| i.render_width).collect();
        assert_eq!(widths, vec![77.0, 154.0, 39.0]);
        assert!(row.items.iter().all(|i| i.render_width <= 280.0));
        assert!(row.items.iter().all(|i| i.render_height == 77.0));
    }

    #[test]
    fn test_negative_share_can_push_skinny_item_below_zero() {
        // Every two-item candidate overshoots: 1 + 280 (capped) + 5 at h=50..149.
        let window = vec![make_item("skinny", 1.0, 100.0), make_item("wide", 1000.0, 100.0)];

        let row = packer().pack(&window);

        assert_eq!(row.height, 50);
        assert_eq!(row.delta, -6.0);
        let widths: Vec<f64> = row.items.iter().map(|i| i.render_width).collect();
        assert_eq!(widths, vec![-2.0, 277.0]);
    }

    #[test]
    fn test_empty_window() {
        let row = packer().pack(&[]);
        assert!(row.is_empty());
        assert_eq!(row.consumed, 0);
    }

    #[test]
    fn test_all_invalid_window_is_empty() {
        let mut a = make_item("a", 100.0, 0.0);
        a.intrinsic_width = None;
        let window = vec![a, make_item("b", 0.0, 100.0), make_item("c", 100.0, -1.0)];

        let row = packer().pack(&window);
        assert!(row.is_empty());
        assert_eq!(row.consumed, 0);
        assert!(packer().candidates(&window).is_empty());
    }

    #[test]
    fn test_single_valid_item_takes_first_height() {
        let window = vec![make_item("bad", 100.0, 0.0), make_item("ok", 100.0, 100.0)];

        let row = packer().pack(&window);

        // Only the very first single-item candidate is ever accepted.
        assert_eq!(row.height, 50);
        assert_eq!(row.consumed, 2);
        assert_eq!(row.items.len(), 1);
        assert_eq!(row.items[0].item.id, "ok");
        assert_eq!(row.items[0].source_index, 1);
        assert_eq!(row.delta, 230.0);
        assert_eq!(row.items[0].render_width, 280.0);
    }

    #[test]
    fn test_mid_window_invalid_item_is_skipped() {
        let window = vec![
            make_item("a", 100.0, 100.0),
            make_item("bad", 100.0, 0.0),
            make_item("c", 100.0, 100.0),
        ];

        let row = packer().pack(&window);

        let ids: Vec<&str> = row.items.iter().map(|i| i.item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(row.consumed, 3);
        let sources: Vec<usize> = row.items.iter().map(|i| i.source_index).collect();
        assert_eq!(sources, vec![0, 2]);
    }

    #[test]
    fn test_trailing_invalid_item_not_consumed() {
        let window = vec![
            make_item("a", 100.0, 100.0),
            make_item("b", 100.0, 100.0),
            make_item("bad", 100.0, 0.0),
        ];

        let row = packer().pack(&window);
        assert_eq!(row.items.len(), 2);
        assert_eq!(row.consumed, 2);
    }

    #[test]
    fn test_wide_items_are_capped() {
        let window: Vec<MediaItem> = (0..3)
            .map(|i| make_item(&format!("pano{i}"), 1000.0, 100.0))
            .collect();

        let row = packer().pack(&window);

        // Every width is capped at 280 from the first height on, so the first
        // multi-item candidate (two items at height 50) is never beaten.
        assert_eq!(row.height, 50);
        assert_eq!(row.items.len(), 2);
        assert_eq!(row.delta, -285.0);
        for item in &row.items {
            assert_eq!(item.render_width, 137.5);
        }
    }

    #[test]
    fn test_multi_item_replaces_single_item_best() {
        // A lone square is a perfect fit at 280, but pairs still win.
        let mut packer = packer();
        packer.constraints.max_height = 280;
        let window = vec![make_item("a", 100.0, 100.0), make_item("b", 100.0, 100.0)];

        let row = packer.pack(&window);
        assert_eq!(row.items.len(), 2);
    }

    #[test]
    fn test_window_clipped_to_max_size() {
        let window: Vec<MediaItem> = (0..6)
            .map(|i| make_item(&format!("{i}"), 10.0, 100.0))
            .collect();

        let row = packer().pack_at(&window, 12);
        assert!(row.items.len() <= 3);
        assert!(row.consumed <= 3);
        assert_eq!(row.items[0].source_index, 12);
    }

    #[test]
    fn test_delta_spread_keeps_cap() {
        let constraints = LayoutConstraints {
            container_width: 600.0,
            max_height: 60,
            ..Default::default()
        };
        let window = vec![make_item("a", 1000.0, 100.0), make_item("b", 1000.0, 100.0)];

        let row = RowPacker::new(constraints).pack(&window);

        // Positive delta would push widths past the cap; they stay at 280.
        assert!(row.delta > 0.0);
        assert!(row.items.iter().all(|i| i.render_width == 280.0));
    }

    #[test]
    fn test_candidates_enumerate_heights_and_prefixes() {
        let window = vec![make_item("a", 100.0, 100.0), make_item("b", 100.0, 100.0)];
        let candidates = packer().candidates(&window);

        assert_eq!(candidates.len(), (380 - 50 + 1) * 2);
        assert_eq!(candidates[0].height, 50);
        assert_eq!(candidates[0].valid_len, 1);
        assert_eq!(candidates[1].valid_len, 2);
        assert_eq!(candidates[1].delta, 280.0 - 105.0);
    }

    #[test]
    fn test_inverted_height_range_packs_nothing() {
        let constraints = LayoutConstraints {
            min_height: 200,
            max_height: 100,
            ..Default::default()
        };
        let row = RowPacker::new(constraints).pack(&[make_item("a", 1.0, 1.0)]);
        assert!(row.is_empty());
    }
}
