//! TOML configuration.
//!
//! On Linux the default file lives at `~/.config/rowgrid/config.toml`. Every
//! section and field is optional; missing values fall back to defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::feed::DEFAULT_PAGE_SIZE;
use crate::layout::LayoutConstraints;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: LayoutConstraints,
    pub feed: FeedConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// API root; page URLs are `{base_url}/{tab}/{path}`.
    pub base_url: String,
    pub page_size: usize,
    /// Stop after this many pages (0 = until the feed runs dry).
    pub max_pages: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.klipy.co/api/v1".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub corner_radius: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { corner_radius: 8.0 }
    }
}

/// Platform config file path, e.g. `~/.config/rowgrid/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("", "", "rowgrid").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join("config.toml"))
}

impl AppConfig {
    /// Load and validate a config file. The file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given; otherwise the default path, or defaults when no
    /// file exists there.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let path = match default_config_path() {
            Ok(path) => path,
            Err(ConfigError::NoConfigDir) => {
                debug!("No config directory, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        match Self::load(&path) {
            Err(ConfigError::FileNotFound(_)) => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;

        if self.feed.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "feed.page_size",
                reason: "must be at least 1".into(),
            });
        }
        if !self.render.corner_radius.is_finite() || self.render.corner_radius < 0.0 {
            return Err(ConfigError::Invalid {
                field: "render.corner_radius",
                reason: format!("must be zero or positive, got {}", self.render.corner_radius),
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
