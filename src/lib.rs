//! Reel-Ripple: a resumable episode crawler
//!
//! This crate walks a category → show → season → episode site hierarchy,
//! resolves the video embedded on every episode page, skips shows already
//! known to an external catalog, and checkpoints its progress so multi-hour
//! crawls survive restarts.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Reel-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Reel-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::CatalogIndex;
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, RunOptions};
pub use model::{Category, CrawlResults, Episode, Season, Show, VideoSource};
pub use state::{CheckpointState, CrawlStage, HistoryIndex};
