use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read page {page} from {path}: {source}")]
    Io {
        page: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed page: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum InsertError {
    #[error("item {0} has no insertion URL")]
    MissingUrl(String),
    #[error("failed to write snippet: {0}")]
    Io(#[from] std::io::Error),
}
