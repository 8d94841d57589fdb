//! Hand-off of the finished results file to an uploader

use crate::output::traits::{
    ArtifactUploader, OutputError, OutputResult, UploadReceipt, UploadRequest,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Builds the upload request for a results file
///
/// The title is derived from the file stem; metadata describes the run.
pub fn results_upload_request(
    path: &Path,
    show_count: usize,
    episode_count: usize,
) -> UploadRequest {
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| "crawl results".to_string());

    let mut metadata = BTreeMap::new();
    metadata.insert("mediatype".to_string(), "data".to_string());
    metadata.insert(
        "description".to_string(),
        format!("{} shows, {} episodes", show_count, episode_count),
    );
    metadata.insert("shows".to_string(), show_count.to_string());
    metadata.insert("episodes".to_string(), episode_count.to_string());

    UploadRequest {
        file_path: path.to_path_buf(),
        title,
        metadata,
    }
}

/// Uploads a results file, treating an unsuccessful receipt as an error
pub fn upload_results(
    uploader: &dyn ArtifactUploader,
    request: &UploadRequest,
) -> OutputResult<UploadReceipt> {
    if !request.file_path.exists() {
        return Err(OutputError::Upload(format!(
            "results file {} does not exist",
            request.file_path.display()
        )));
    }

    let receipt = uploader.upload(request)?;
    if !receipt.success {
        return Err(OutputError::Upload(format!(
            "uploader rejected {}",
            request.file_path.display()
        )));
    }

    Ok(receipt)
}
