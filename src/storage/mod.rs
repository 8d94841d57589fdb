//! Storage module for persisting crawl state
//!
//! This module handles everything that must survive a restart:
//! - The in-flight checkpoint (results so far + position in the show list)
//! - The cross-run extraction history
//! - Versioned file schemas, including import of legacy history files

mod json;
mod schema;
mod traits;

pub use json::JsonFileStore;
pub use schema::{CheckpointFileV1, HistoryFileV1, SCHEMA_VERSION};
pub use traits::{StateStore, StorageError, StorageResult};

use crate::config::OutputConfig;

/// Opens the JSON state store described by the output configuration
pub fn open_store(output: &OutputConfig) -> JsonFileStore {
    JsonFileStore::new(&output.checkpoint_path, &output.history_path)
}
