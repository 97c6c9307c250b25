use tracing::debug;

use crate::layout::{LayoutConstraints, RowPacker};
use crate::models::{Layout, MediaItem, Row};

/// Walks an item sequence window by window, stacking packed rows.
#[derive(Debug, Clone)]
pub struct RowSequencer {
    packer: RowPacker,
}

impl RowSequencer {
    pub fn new(constraints: LayoutConstraints) -> Self {
        Self {
            packer: RowPacker::new(constraints),
        }
    }

    pub fn constraints(&self) -> &LayoutConstraints {
        self.packer.constraints()
    }

    /// Computes the full positioned layout for `items`.
    pub fn layout(&self, items: &[MediaItem]) -> Layout {
        self.position(self.rows(items))
    }

    /// Computes rows for `items` without positioning them.
    pub fn rows(&self, items: &[MediaItem]) -> Vec<Row> {
        let mut rows = Vec::new();
        self.sequence_from(items, 0, &mut rows);
        rows
    }

    /// Extends rows computed for `items[..old_len]` to cover all of `items`.
    ///
    /// `items` must start with the exact sequence the rows were computed for.
    /// Rows whose window was cut short by the old end of the sequence are
    /// recomputed, so the result equals `self.rows(items)`.
    pub fn resume(&self, items: &[MediaItem], mut rows: Vec<Row>, old_len: usize) -> Vec<Row> {
        let window = self.constraints().max_window_size;
        let keep = rows
            .iter()
            .position(|row| row.start_index + window > old_len)
            .unwrap_or(rows.len());
        rows.truncate(keep);

        let cursor = rows.last().map_or(0, Row::end_index);
        debug!(
            kept_rows = rows.len(),
            cursor,
            new_items = items.len().saturating_sub(old_len),
            "Resuming layout"
        );

        self.sequence_from(items, cursor, &mut rows);
        rows
    }

    /// Assigns absolute positions to rows.
    pub fn position(&self, rows: Vec<Row>) -> Layout {
        let c = self.constraints();
        Layout::from_rows(rows, c.gap, c.container_width)
    }

    fn sequence_from(&self, items: &[MediaItem], mut cursor: usize, rows: &mut Vec<Row>) {
        let window_size = self.constraints().max_window_size;

        while cursor < items.len() {
            let end = (cursor + window_size).min(items.len());
            let window = &items[cursor..end];
            if window.is_empty() {
                break;
            }

            let packed = self.packer.pack_at(window, cursor);
            if packed.is_empty() {
                debug!(
                    index = cursor,
                    id = %items[cursor].id,
                    "Skipping item without valid dimensions"
                );
                cursor += 1;
                continue;
            }

            rows.push(Row {
                row_index: rows.len(),
                start_index: cursor,
                consumed: packed.consumed,
                height: packed.height,
                items: packed.items,
            });
            cursor += packed.consumed;
        }
    }
}
