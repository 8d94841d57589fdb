//! JSON results file
//!
//! Writes `Category → Show → {url, seasons}` as pretty-printed JSON. The
//! file is replaced as a whole at the end of a run.

use crate::model::CrawlResults;
use crate::output::traits::{OutputError, OutputResult, ResultSink};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes results to a single JSON file
#[derive(Debug, Clone)]
pub struct JsonResultSink {
    path: PathBuf,
}

impl JsonResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for JsonResultSink {
    fn write(&mut self, results: &CrawlResults) -> OutputResult<()> {
        let content = serde_json::to_string_pretty(results)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| OutputError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, content).map_err(|source| OutputError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
