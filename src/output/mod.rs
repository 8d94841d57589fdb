//! Output module for crawl results and reports
//!
//! This module handles:
//! - Writing the nested results file at the end of a run
//! - Recording and printing crawl statistics
//! - Handing finished artifacts to an external uploader

mod json;
pub mod stats;
mod traits;
mod upload;

pub use json::JsonResultSink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{
    ArtifactUploader, OutputError, OutputResult, ResultSink, UploadReceipt, UploadRequest,
};
pub use upload::{results_upload_request, upload_results};
