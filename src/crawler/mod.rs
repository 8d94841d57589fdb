//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded retries
//! - Listing parsing into typed show, season and episode links
//! - Video source resolution on episode pages
//! - Request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod pacer;
mod parser;
mod resolver;

pub use coordinator::{
    CategoryPreview, Coordinator, CrawlOutcome, EpisodeOutcome, RunOptions, SkipReason,
};
pub use fetcher::{build_http_client, fetch_page, fetch_with_retry, FetchError};
pub use pacer::{Pacer, PacingPolicy, PauseKind};
pub use parser::{extract_links, parse_episode_links, parse_season_links, parse_show_links};
pub use resolver::{
    extract_drive_id, extract_mega_link, resolve, resolve_with_strategy, Strategy,
    STRATEGY_CHAIN,
};

use crate::config::Config;
use crate::output::{results_upload_request, upload_results, ArtifactUploader};
use crate::RippleError;

/// Runs a complete crawl operation
///
/// Builds a coordinator over the configured state and result files, crawls
/// every category and returns what the run produced.
///
/// # Example
///
/// ```no_run
/// use reel_ripple::config::load_config;
/// use reel_ripple::crawler::{run_crawl, RunOptions};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("ripple.toml"))?;
/// let outcome = run_crawl(config, RunOptions::default()).await?;
/// println!("{} shows extracted", outcome.statistics.shows_extracted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, options: RunOptions) -> Result<CrawlOutcome, RippleError> {
    let mut coordinator = Coordinator::new(config, options)?;
    Ok(coordinator.run().await)
}

/// Runs a crawl, then hands the written results file to an uploader
///
/// Upload failures are logged; the crawl outcome is returned regardless.
pub async fn run_crawl_with_upload(
    config: Config,
    options: RunOptions,
    uploader: &dyn ArtifactUploader,
) -> Result<CrawlOutcome, RippleError> {
    let outcome = run_crawl(config, options).await?;

    let Some(path) = &outcome.results_path else {
        tracing::warn!("No results file was written, skipping upload");
        return Ok(outcome);
    };

    let request = results_upload_request(
        path,
        outcome.results.show_count(),
        outcome.results.episode_count(),
    );
    match upload_results(uploader, &request) {
        Ok(receipt) => tracing::info!(
            "Uploaded {} as {}",
            path.display(),
            receipt.identifier.as_deref().unwrap_or("<no identifier>")
        ),
        Err(e) => tracing::warn!("Upload of {} failed: {}", path.display(), e),
    }

    Ok(outcome)
}
