//! Run statistics
//!
//! Counters are bumped by the coordinator as the traversal goes and reported
//! once at the end of a run.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Categories whose show loop ran in this process
    pub categories_processed: u64,

    /// Categories skipped because a resumed checkpoint had finished them
    pub categories_resumed_complete: u64,

    /// Shows found on category listings (after dedup)
    pub shows_discovered: u64,

    /// Shows skipped because the catalog already has them
    pub shows_skipped_catalog: u64,

    /// Shows skipped because an earlier run extracted them
    pub shows_skipped_history: u64,

    /// Shows skipped because the resumed results already contain them
    pub shows_skipped_results: u64,

    /// Shows below the resume index, not revisited
    pub shows_skipped_resume: u64,

    /// Shows with at least one resolved episode
    pub shows_extracted: u64,

    /// Shows visited that produced no resolved episode
    pub shows_empty: u64,

    /// Seasons visited
    pub seasons_visited: u64,

    /// Episodes whose video source was resolved
    pub episodes_resolved: u64,

    /// Episode pages fetched but holding no recognizable video
    pub episodes_no_source: u64,

    /// Episode pages that could not be fetched after all retries
    pub episodes_failed: u64,

    /// Listing pages (category, show, season) that failed to load
    pub listing_failures: u64,

    /// URLs of episodes that failed
    pub failed_episode_urls: Vec<String>,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All shows that were not visited because of a filter or resume
    pub fn shows_skipped(&self) -> u64 {
        self.shows_skipped_catalog
            + self.shows_skipped_history
            + self.shows_skipped_results
            + self.shows_skipped_resume
    }

    /// Episode pages attempted, whatever the outcome
    pub fn episodes_attempted(&self) -> u64 {
        self.episodes_resolved + self.episodes_no_source + self.episodes_failed
    }

    pub fn record_failed_episode(&mut self, url: &str) {
        self.episodes_failed += 1;
        self.failed_episode_urls.push(url.to_string());
    }

    /// Share of attempted episodes that resolved, in percent
    pub fn resolve_rate(&self) -> f64 {
        let attempted = self.episodes_attempted();
        if attempted == 0 {
            0.0
        } else {
            (self.episodes_resolved as f64 / attempted as f64) * 100.0
        }
    }

    /// Emits the summary through `tracing`
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished in {:?}: {} categories, {} shows extracted ({} empty), {} episodes resolved",
            self.elapsed,
            self.categories_processed,
            self.shows_extracted,
            self.shows_empty,
            self.episodes_resolved
        );
        tracing::info!(
            "Skipped shows: {} catalog, {} history, {} already in results, {} before resume point",
            self.shows_skipped_catalog,
            self.shows_skipped_history,
            self.shows_skipped_results,
            self.shows_skipped_resume
        );

        if self.episodes_no_source > 0 || self.episodes_failed > 0 || self.listing_failures > 0 {
            tracing::warn!(
                "{} episodes without source, {} episodes failed, {} listing pages failed",
                self.episodes_no_source,
                self.episodes_failed,
                self.listing_failures
            );
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Categories processed: {}", stats.categories_processed);
    if stats.categories_resumed_complete > 0 {
        println!(
            "  Categories already complete: {}",
            stats.categories_resumed_complete
        );
    }
    println!("  Shows discovered: {}", stats.shows_discovered);
    println!("  Seasons visited: {}", stats.seasons_visited);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Shows:");
    println!("  Extracted: {}", stats.shows_extracted);
    println!("  Empty: {}", stats.shows_empty);
    println!("  Skipped (catalog): {}", stats.shows_skipped_catalog);
    println!("  Skipped (history): {}", stats.shows_skipped_history);
    println!("  Skipped (in results): {}", stats.shows_skipped_results);
    println!("  Skipped (before resume): {}", stats.shows_skipped_resume);
    println!();

    println!("Episodes:");
    println!("  Resolved: {}", stats.episodes_resolved);
    println!("  No source found: {}", stats.episodes_no_source);
    println!("  Failed: {}", stats.episodes_failed);
    println!();

    if stats.listing_failures > 0 {
        println!("Listing pages failed: {}\n", stats.listing_failures);
    }

    if !stats.failed_episode_urls.is_empty() {
        println!("Failed Episodes ({}):", stats.failed_episode_urls.len());
        for url in &stats.failed_episode_urls {
            println!("  - {}", url);
        }
        println!();
    }

    println!(
        "Resolve Rate: {:.1}% ({} / {} episodes)",
        stats.resolve_rate(),
        stats.episodes_resolved,
        stats.episodes_attempted()
    );
}
