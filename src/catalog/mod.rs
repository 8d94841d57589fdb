//! External catalog of already-known shows
//!
//! The catalog is a JSON snapshot (`{"shows": [{"title", "slug"}]}`) read once
//! at startup. `CatalogIndex` answers "is this show already known?" so a
//! missing-only crawl visits new shows only.

mod matcher;

pub use matcher::{alnum, dash_slug, normalize_candidate, MIN_CONTAINMENT_LEN};

use crate::model::Show;
use matcher::KeySet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a catalog snapshot
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One catalog record; absent fields read as empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
}

/// On-disk catalog snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub shows: Vec<CatalogEntry>,
}

/// Normalized lookup over a catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    keys: KeySet,
    entries: usize,
}

impl CatalogIndex {
    /// Reads and indexes a snapshot file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot: CatalogSnapshot =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::from_snapshot(&snapshot))
    }

    pub fn from_snapshot(snapshot: &CatalogSnapshot) -> Self {
        let mut keys = KeySet::default();
        for entry in &snapshot.shows {
            keys.register_slug(&entry.slug);
            keys.register_title(&entry.title);
        }

        Self {
            keys,
            entries: snapshot.shows.len(),
        }
    }

    /// Whether a discovered show name already exists in the catalog
    ///
    /// The candidate is lowercased and stripped of a trailing season suffix,
    /// then compared by exact membership of its raw, alnum and dash-slug
    /// forms. Failing that, it matches when its alnum form and any registered
    /// alnum form are both longer than four characters and one contains the
    /// other.
    ///
    /// # Example
    ///
    /// ```
    /// use reel_ripple::catalog::{CatalogEntry, CatalogIndex, CatalogSnapshot};
    ///
    /// let index = CatalogIndex::from_snapshot(&CatalogSnapshot {
    ///     shows: vec![CatalogEntry { title: "Breaking Bad".into(), slug: String::new() }],
    /// });
    /// assert!(index.is_known("breaking-bad-season-3"));
    /// assert!(index.is_known("Breaking"));
    /// assert!(!index.is_known("Bad"));
    /// ```
    pub fn is_known(&self, candidate: &str) -> bool {
        self.keys.matches(candidate)
    }

    /// Splits shows into (known, missing), both keeping input order
    pub fn partition<'a>(&self, shows: &'a [Show]) -> (Vec<&'a Show>, Vec<&'a Show>) {
        shows.iter().partition(|show| self.is_known(&show.name))
    }

    /// Shows not present in the catalog, in input order
    pub fn missing<'a>(&self, shows: &'a [Show]) -> Vec<&'a Show> {
        self.partition(shows).1
    }

    /// Number of catalog records the index was built from
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of distinct match keys registered
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}
