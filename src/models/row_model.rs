use serde::Serialize;

use crate::models::MediaItem;

/// An item annotated with the size chosen for its row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackedItem {
    pub item: MediaItem,
    /// Position of the item in the full input sequence.
    pub source_index: usize,
    pub render_width: f64,
    pub render_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub row_index: usize,
    /// Cursor the row's window was sliced at.
    pub start_index: usize,
    /// Window slots covered by the winning prefix, invalid items included.
    pub consumed: usize,
    pub height: u32,
    pub items: Vec<PackedItem>,
}

impl Row {
    /// One past the last input position this row accounts for.
    pub fn end_index(&self) -> usize {
        self.start_index + self.consumed
    }

    /// Rendered width of the row including inter-item gaps.
    pub fn rendered_width(&self, gap: f64) -> f64 {
        let widths: f64 = self.items.iter().map(|i| i.render_width).sum();
        widths + gap * self.items.len().saturating_sub(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedItem {
    pub id: String,
    pub source_index: usize,
    pub row_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rows plus absolute positions for every packed item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub rows: Vec<Row>,
    pub items: Vec<PositionedItem>,
    pub container_width: f64,
    pub total_height: f64,
}

impl Layout {
    pub fn empty(container_width: f64) -> Self {
        Self {
            rows: Vec::new(),
            items: Vec::new(),
            container_width,
            total_height: 0.0,
        }
    }

    /// Stacks rows vertically and places items left to right, separated by `gap`.
    pub fn from_rows(rows: Vec<Row>, gap: f64, container_width: f64) -> Self {
        let mut items = Vec::with_capacity(rows.iter().map(|r| r.items.len()).sum());
        let mut y = 0.0f64;

        for row in &rows {
            let mut x = 0.0f64;
            for packed in &row.items {
                items.push(PositionedItem {
                    id: packed.item.id.clone(),
                    source_index: packed.source_index,
                    row_index: row.row_index,
                    x,
                    y,
                    width: packed.render_width,
                    height: packed.render_height,
                });
                x += packed.render_width + gap;
            }
            y += row.height as f64 + gap;
        }

        let total_height = if rows.is_empty() { 0.0 } else { y - gap };

        Self {
            rows,
            items,
            container_width,
            total_height,
        }
    }

    /// Number of positioned items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn item(&self, id: &str) -> Option<&PositionedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// The packed item (with its media payload) at a positioned entry.
    pub fn packed(&self, positioned: &PositionedItem) -> Option<&PackedItem> {
        self.rows
            .get(positioned.row_index)?
            .items
            .iter()
            .find(|p| p.source_index == positioned.source_index)
    }
}
