//! Row-packing masonry layout.
//!
//! - `RowPacker` - Picks a height and item prefix for one window
//! - `RowSequencer` - Walks the item sequence and stacks rows
//! - `LayoutEngine` - Caching, append-aware front end over the sequencer

pub mod constraints;
pub mod layout_cache;
pub mod packer;
pub mod sequencer;

pub use constraints::LayoutConstraints;
pub use layout_cache::{LayoutCache, LayoutEngine};
pub use packer::{PackedRow, RowCandidate, RowPacker};
pub use sequencer::RowSequencer;

#[cfg(test)]
mod proptests;
