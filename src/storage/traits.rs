//! Storage traits and error types
//!
//! This module defines the trait interface for state backends and the
//! persistence error kinds they report.

use crate::state::{CheckpointState, HistoryIndex};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing crawl state
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize state for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse state file {}: {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported schema version {found} in {} (expected {expected})", .path.display())]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl state backends
///
/// Loading reports an absent file as "nothing stored", never as an error;
/// unreadable or incompatible content is an error so the caller can decide
/// to log it and start from defaults.
pub trait StateStore {
    /// Loads the in-flight checkpoint, if one exists
    fn load_checkpoint(&self) -> StorageResult<Option<CheckpointState>>;

    /// Overwrites the checkpoint with the given state
    fn save_checkpoint(&mut self, checkpoint: &CheckpointState) -> StorageResult<()>;

    /// Removes the checkpoint; succeeds if there was none
    fn clear_checkpoint(&mut self) -> StorageResult<()>;

    /// Loads extraction history, empty if none was stored yet
    fn load_history(&self) -> StorageResult<HistoryIndex>;

    /// Overwrites the extraction history
    fn save_history(&mut self, history: &HistoryIndex) -> StorageResult<()>;
}
