use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::{LayoutConstraints, RowSequencer};
use crate::models::{Layout, MediaItem, Row};

/// Maximum number of cached layouts to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache, combining the constraints and the list hash.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct CacheKey {
    constraints: u64,
    list_hash: u64,
}

/// Layout cache for storing and retrieving finished layouts.
///
/// Layouts are keyed by (constraints fingerprint, list_hash). The list hash
/// covers every item's id and intrinsic size in order, so any change to the
/// item sequence misses the cache.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, Layout>>,
}

impl LayoutCache {
    /// Creates a new empty layout cache.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(entries: usize) -> Self {
        let cap = NonZeroUsize::new(entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Computes a fast hash of the media item list.
    pub fn compute_list_hash(items: &[MediaItem]) -> u64 {
        let mut hasher_input = Vec::with_capacity(items.len() * 48);

        for item in items {
            hasher_input.extend_from_slice(item.id.as_bytes());
            // Separator so ("ab", "c") and ("a", "bc") differ
            hasher_input.push(0);
            for dim in [item.intrinsic_width, item.intrinsic_height] {
                let bits = dim.map_or(u64::MAX, f64::to_bits);
                hasher_input.extend_from_slice(&bits.to_le_bytes());
            }
        }

        xxh3_64(&hasher_input)
    }

    /// Attempts to retrieve a cached layout. Returns None on cache miss.
    pub fn get(&self, constraints: &LayoutConstraints, list_hash: u64) -> Option<Layout> {
        let key = CacheKey {
            constraints: constraints.fingerprint(),
            list_hash,
        };
        self.cache.lock().get(&key).cloned()
    }

    /// Stores a layout, evicting the least recently used entry at capacity.
    pub fn insert(&self, constraints: &LayoutConstraints, list_hash: u64, layout: Layout) {
        let key = CacheKey {
            constraints: constraints.fingerprint(),
            list_hash,
        };
        self.cache.lock().put(key, layout);
    }

    /// Clears the entire cache.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Returns the number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows from the previous call, kept so appended pages only pack new windows.
struct LastRun {
    item_count: usize,
    list_hash: u64,
    rows: Vec<Row>,
}

/// Layout computation with caching and append-only incremental re-layout.
///
/// Every result is identical to `RowSequencer::layout` on the same input.
pub struct LayoutEngine {
    sequencer: RowSequencer,
    cache: LayoutCache,
    last: Mutex<Option<LastRun>>,
}

impl LayoutEngine {
    pub fn new(constraints: LayoutConstraints) -> Self {
        Self {
            sequencer: RowSequencer::new(constraints),
            cache: LayoutCache::new(),
            last: Mutex::new(None),
        }
    }

    pub fn constraints(&self) -> &LayoutConstraints {
        self.sequencer.constraints()
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Computes the layout, using cached or previously packed rows when possible.
    pub fn layout(&self, items: &[MediaItem]) -> Layout {
        if items.is_empty() {
            return Layout::empty(self.constraints().container_width);
        }

        let constraints = self.constraints();
        let list_hash = LayoutCache::compute_list_hash(items);

        if let Some(layout) = self.cache.get(constraints, list_hash) {
            debug!(items = items.len(), "Layout cache hit");
            return layout;
        }

        let mut last = self.last.lock();
        let rows = match last.take() {
            Some(prev)
                if prev.item_count <= items.len()
                    && LayoutCache::compute_list_hash(&items[..prev.item_count])
                        == prev.list_hash =>
            {
                debug!(
                    previous = prev.item_count,
                    items = items.len(),
                    "Layout cache miss, extending previous rows"
                );
                self.sequencer.resume(items, prev.rows, prev.item_count)
            }
            _ => {
                debug!(items = items.len(), "Layout cache miss, full layout");
                self.sequencer.rows(items)
            }
        };

        *last = Some(LastRun {
            item_count: items.len(),
            list_hash,
            rows: rows.clone(),
        });
        drop(last);

        let layout = self.sequencer.position(rows);
        self.cache.insert(constraints, list_hash, layout.clone());
        layout
    }

    /// Drops cached layouts and remembered rows.
    pub fn invalidate(&self) {
        self.cache.clear();
        *self.last.lock() = None;
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConstraints::default())
    }
}
