use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::ConfigError;

/// Caller-supplied sizing rules for the row packer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstraints {
    /// Target row width in pixels (default: 280)
    pub container_width: f64,
    /// Gap between items and between rows in pixels (default: 5)
    pub gap: f64,
    /// Smallest candidate row height (default: 50)
    pub min_height: u32,
    /// Largest candidate row height, inclusive (default: 380)
    pub max_height: u32,
    /// Cap on any single item's rendered width (default: 280)
    pub max_item_width: f64,
    /// Items considered together for one row decision (default: 3)
    pub max_window_size: usize,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            container_width: 280.0,
            gap: 5.0,
            min_height: 50,
            max_height: 380,
            max_item_width: 280.0,
            max_window_size: 3,
        }
    }
}

impl LayoutConstraints {
    /// Checks the constraints describe a usable grid.
    ///
    /// The engine tolerates anything (degenerate constraints just produce an
    /// empty layout); this is for rejecting bad user configuration early.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.container_width.is_finite() || self.container_width <= 0.0 {
            return Err(invalid(
                "layout.container_width",
                format!("must be positive, got {}", self.container_width),
            ));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(invalid(
                "layout.gap",
                format!("must be zero or positive, got {}", self.gap),
            ));
        }
        if self.min_height == 0 {
            return Err(invalid("layout.min_height", "must be at least 1".into()));
        }
        if self.min_height > self.max_height {
            return Err(invalid(
                "layout.max_height",
                format!(
                    "must be >= min_height ({}), got {}",
                    self.min_height, self.max_height
                ),
            ));
        }
        if !self.max_item_width.is_finite() || self.max_item_width <= 0.0 {
            return Err(invalid(
                "layout.max_item_width",
                format!("must be positive, got {}", self.max_item_width),
            ));
        }
        if self.max_window_size == 0 {
            return Err(invalid("layout.max_window_size", "must be at least 1".into()));
        }
        Ok(())
    }

    /// Stable hash of every field, used in layout cache keys.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = Vec::with_capacity(48);
        bytes.extend_from_slice(&self.container_width.to_bits().to_le_bytes());
        bytes.extend_from_slice(&self.gap.to_bits().to_le_bytes());
        bytes.extend_from_slice(&self.min_height.to_le_bytes());
        bytes.extend_from_slice(&self.max_height.to_le_bytes());
        bytes.extend_from_slice(&self.max_item_width.to_bits().to_le_bytes());
        bytes.extend_from_slice(&(self.max_window_size as u64).to_le_bytes());
        xxh3_64(&bytes)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
