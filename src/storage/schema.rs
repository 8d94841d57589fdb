//! On-disk schemas for checkpoint and history files
//!
//! Both files carry an explicit `version`. Unknown versions are rejected
//! instead of being half-read. History files written before versioning (a
//! bare `{category: [names]}` object) are still accepted.

use crate::model::CrawlResults;
use crate::state::{CheckpointState, HistoryIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current schema version for both files
pub const SCHEMA_VERSION: u32 = 1;

/// Checkpoint file layout, version 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointFileV1 {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub config_hash: Option<String>,
    #[serde(default)]
    pub results: CrawlResults,
    #[serde(default)]
    pub current_category: Option<String>,
    #[serde(default)]
    pub current_show_index: usize,
    #[serde(default)]
    pub completed_categories: Vec<String>,
}

impl CheckpointFileV1 {
    pub fn from_state(state: &CheckpointState) -> Self {
        Self {
            version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            config_hash: state.config_hash.clone(),
            results: state.results.clone(),
            current_category: state.current_category.clone(),
            current_show_index: state.current_show_index,
            completed_categories: state.completed_categories.clone(),
        }
    }

    pub fn into_state(self) -> CheckpointState {
        CheckpointState {
            results: self.results,
            current_category: self.current_category,
            current_show_index: self.current_show_index,
            completed_categories: self.completed_categories,
            config_hash: self.config_hash,
        }
    }
}

/// History file layout, version 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFileV1 {
    pub version: u32,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl HistoryFileV1 {
    pub fn from_index(history: &HistoryIndex) -> Self {
        Self {
            version: SCHEMA_VERSION,
            updated_at: Utc::now(),
            categories: history.to_map(),
        }
    }
}

/// Any history layout this crate can read
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoryFile {
    Versioned(HistoryFileV1),
    Legacy(BTreeMap<String, Vec<String>>),
}

/// Reads only the `version` field, to reject unknown layouts early
#[derive(Debug, Deserialize)]
pub struct VersionProbe {
    #[serde(default)]
    pub version: Option<u32>,
}
