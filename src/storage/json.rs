//! JSON file backend for crawl state
//!
//! Checkpoint and history each live in their own pretty-printed JSON file.
//! Writes overwrite the file in place; a single crawl process is assumed to
//! own both files.

use crate::state::{CheckpointState, HistoryIndex};
use crate::storage::schema::{
    CheckpointFileV1, HistoryFile, HistoryFileV1, VersionProbe, SCHEMA_VERSION,
};
use crate::storage::traits::{StateStore, StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores checkpoint and history as JSON files
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    checkpoint_path: PathBuf,
    history_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(checkpoint_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            checkpoint_path: checkpoint_path.into(),
            history_path: history_path.into(),
        }
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }
}

/// Reads a file, mapping "not found" to `None`
fn read_optional(path: &Path) -> StorageResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse<T: DeserializeOwned>(path: &Path, content: &str) -> StorageResult<T> {
    serde_json::from_str(content).map_err(|source| StorageError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Rejects a file whose `version` is present but not the current one
fn check_version(path: &Path, content: &str, required: bool) -> StorageResult<()> {
    let found = match serde_json::from_str::<VersionProbe>(content) {
        Ok(probe) => probe.version,
        Err(_) if !required => return Ok(()),
        Err(source) => {
            return Err(StorageError::Deserialize {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match found {
        Some(version) if version != SCHEMA_VERSION => Err(StorageError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: version,
            expected: SCHEMA_VERSION,
        }),
        None if required => Err(StorageError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: 0,
            expected: SCHEMA_VERSION,
        }),
        _ => Ok(()),
    }
}

impl StateStore for JsonFileStore {
    fn load_checkpoint(&self) -> StorageResult<Option<CheckpointState>> {
        let path = &self.checkpoint_path;
        let Some(content) = read_optional(path)? else {
            return Ok(None);
        };

        check_version(path, &content, true)?;
        let file: CheckpointFileV1 = parse(path, &content)?;
        Ok(Some(file.into_state()))
    }

    fn save_checkpoint(&mut self, checkpoint: &CheckpointState) -> StorageResult<()> {
        write_json(&self.checkpoint_path, &CheckpointFileV1::from_state(checkpoint))
    }

    fn clear_checkpoint(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.checkpoint_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path: self.checkpoint_path.clone(),
                source,
            }),
        }
    }

    fn load_history(&self) -> StorageResult<HistoryIndex> {
        let path = &self.history_path;
        let Some(content) = read_optional(path)? else {
            return Ok(HistoryIndex::new());
        };

        check_version(path, &content, false)?;
        let history = match parse::<HistoryFile>(path, &content)? {
            HistoryFile::Versioned(file) => HistoryIndex::from(file.categories),
            HistoryFile::Legacy(map) => HistoryIndex::from(map),
        };
        Ok(history)
    }

    fn save_history(&mut self, history: &HistoryIndex) -> StorageResult<()> {
        write_json(&self.history_path, &HistoryFileV1::from_index(history))
    }
}
