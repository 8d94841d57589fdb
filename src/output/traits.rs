//! Output handler traits and error types
//!
//! This module defines the trait interface for result sinks and the
//! boundary to an external artifact uploader.

use crate::model::CrawlResults;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Upload failed: {0}")]
    Upload(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the final nested results
pub trait ResultSink {
    /// Persists the complete results of a run
    fn write(&mut self, results: &CrawlResults) -> OutputResult<()>;

    /// File the results end up in, when the sink is file-backed
    fn location(&self) -> Option<&Path>;
}

/// A finished artifact handed to an uploader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub title: String,
    /// Free-form descriptive metadata (description, subject, ...)
    pub metadata: BTreeMap<String, String>,
}

/// What the uploader reports back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub success: bool,
    pub identifier: Option<String>,
    pub urls: Vec<String>,
}

/// External service that archives finished artifacts
///
/// The crawler only hands over a file and reads the receipt; how and where
/// the file is stored is entirely up to the implementation.
pub trait ArtifactUploader {
    fn upload(&self, request: &UploadRequest) -> OutputResult<UploadReceipt>;
}
