//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator walks every configured category top-down:
//! - Paginates the category listing into a sorted, deduplicated show list
//! - Filters shows through the catalog or the extraction history
//! - Extracts each remaining show season by season, episode by episode
//! - Commits history and checkpoint after every show
//! - Writes the results file and drops the checkpoint when a run completes
//!
//! Leaf operations return typed results; this module is where failures are
//! logged and turned into soft outcomes. Nothing here aborts the crawl.

use crate::catalog::CatalogIndex;
use crate::config::{Config, CrawlMode};
use crate::crawler::fetcher::{build_http_client, fetch_page, fetch_with_retry, FetchError};
use crate::crawler::pacer::{Pacer, PauseKind};
use crate::crawler::parser::{parse_episode_links, parse_season_links, parse_show_links};
use crate::crawler::resolver::resolve_with_strategy;
use crate::model::{
    Category, CrawlResults, Episode, EpisodeRecord, Season, SeasonResult, Show, ShowResult,
    VideoSource,
};
use crate::output::{CrawlStatistics, JsonResultSink, ResultSink};
use crate::state::{CheckpointState, CrawlStage, HistoryIndex};
use crate::storage::{open_store, StateStore};
use crate::url::listing_page_url;
use crate::{ConfigError, RippleError};
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use url::Url;

/// Per-run switches layered over the configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Disable the catalog and history filters
    pub force: bool,
    /// Ignore any existing checkpoint and start from scratch
    pub fresh: bool,
    /// Overrides the configured crawl mode
    pub mode: Option<CrawlMode>,
    /// Hash of the config file, recorded in the checkpoint
    pub config_hash: Option<String>,
}

/// Why a discovered show is not visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The resumed results already hold this show
    InResults,
    /// The catalog already knows the show
    Catalog,
    /// An earlier run already extracted the show
    History,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InResults => "already in results",
            Self::Catalog => "in catalog",
            Self::History => "already extracted",
        }
    }
}

/// Result of visiting one episode page
#[derive(Debug)]
pub enum EpisodeOutcome {
    Resolved(VideoSource),
    NoSource,
    Failed(FetchError),
}

/// Dry-run view of one category
#[derive(Debug, Clone)]
pub struct CategoryPreview {
    pub category: String,
    /// Shows a crawl would skip
    pub known: Vec<Show>,
    /// Shows a crawl would extract
    pub missing: Vec<Show>,
}

/// What a finished run hands back
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub results: CrawlResults,
    pub statistics: CrawlStatistics,
    /// Where the results were written; `None` if the write failed
    pub results_path: Option<PathBuf>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    categories: Vec<Category>,
    client: Client,
    store: Box<dyn StateStore + Send>,
    sink: Box<dyn ResultSink + Send>,
    catalog: Option<CatalogIndex>,
    history: HistoryIndex,
    checkpoint: CheckpointState,
    pacer: Pacer,
    stats: CrawlStatistics,
    stage: CrawlStage,
    mode: CrawlMode,
    force: bool,
}

impl Coordinator {
    /// Creates a coordinator backed by the JSON files named in the config
    pub fn new(config: Config, options: RunOptions) -> Result<Self, RippleError> {
        let store = open_store(&config.output);
        let sink = JsonResultSink::new(&config.output.results_path);
        Self::with_parts(config, options, Box::new(store), Box::new(sink))
    }

    /// Creates a coordinator with explicit state and result backends
    ///
    /// Unreadable history or checkpoint files are logged and replaced by
    /// empty state; a missing or unreadable catalog in missing-only mode is
    /// an error.
    pub fn with_parts(
        config: Config,
        options: RunOptions,
        store: Box<dyn StateStore + Send>,
        sink: Box<dyn ResultSink + Send>,
    ) -> Result<Self, RippleError> {
        let mode = options.mode.unwrap_or(config.crawler.mode);
        let force = options.force || config.crawler.force;

        let categories = config
            .categories
            .iter()
            .map(Category::from_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = match (mode, &config.catalog) {
            (CrawlMode::MissingOnly, Some(catalog)) => {
                let index = CatalogIndex::load(Path::new(&catalog.path))?;
                tracing::info!(
                    "Loaded catalog {} ({} shows, {} match keys)",
                    catalog.path,
                    index.len(),
                    index.key_count()
                );
                Some(index)
            }
            (CrawlMode::MissingOnly, None) => {
                return Err(ConfigError::Validation(
                    "mode \"missing-only\" requires a [catalog] section".to_string(),
                )
                .into());
            }
            (CrawlMode::SkipExtracted, _) => None,
        };

        let history = match store.load_history() {
            Ok(history) => {
                tracing::debug!("Loaded history with {} shows", history.len());
                history
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable history, starting empty: {}", e);
                HistoryIndex::new()
            }
        };

        let checkpoint = Self::initial_checkpoint(store.as_ref(), &options);
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        let pacer = Pacer::from_config(&config.crawler);

        Ok(Self {
            config,
            categories,
            client,
            store,
            sink,
            catalog,
            history,
            checkpoint,
            pacer,
            stats: CrawlStatistics::new(),
            stage: CrawlStage::ListingCategory,
            mode,
            force,
        })
    }

    /// Picks the checkpoint to start from: the stored one unless `fresh`
    fn initial_checkpoint(store: &dyn StateStore, options: &RunOptions) -> CheckpointState {
        if options.fresh {
            tracing::info!("Fresh run requested, ignoring any existing checkpoint");
            return CheckpointState::new(options.config_hash.clone());
        }

        match store.load_checkpoint() {
            Ok(Some(mut checkpoint)) => {
                let hashes = (&checkpoint.config_hash, &options.config_hash);
                if let (Some(saved), Some(current)) = hashes {
                    if saved != current {
                        tracing::warn!(
                            "Configuration changed since the checkpoint was written; resuming anyway"
                        );
                    }
                }
                tracing::info!(
                    "Resuming from checkpoint: {} shows in results, position {:?} #{}",
                    checkpoint.results.show_count(),
                    checkpoint.current_category,
                    checkpoint.current_show_index
                );
                if options.config_hash.is_some() {
                    checkpoint.config_hash = options.config_hash.clone();
                }
                checkpoint
            }
            Ok(None) => CheckpointState::new(options.config_hash.clone()),
            Err(e) => {
                tracing::warn!("Ignoring unreadable checkpoint, starting over: {}", e);
                CheckpointState::new(options.config_hash.clone())
            }
        }
    }

    /// Runs the crawl over every configured category
    ///
    /// A coordinator runs once; calling this again after completion only
    /// returns the existing results.
    pub async fn run(&mut self) -> CrawlOutcome {
        if self.stage.is_terminal() {
            tracing::warn!("Crawl already finished, not running again");
            return self.outcome(None);
        }

        let started = Instant::now();
        tracing::info!(
            "Starting crawl of {} categories (mode: {:?}, force: {})",
            self.categories.len(),
            self.mode,
            self.force
        );

        let categories = self.categories.clone();
        for category in &categories {
            if self.checkpoint.is_category_complete(&category.name) {
                tracing::info!("Category '{}' already complete, skipping", category.name);
                self.stats.categories_resumed_complete += 1;
                continue;
            }
            self.crawl_category(category).await;
        }

        self.enter(CrawlStage::Done);
        self.stats.elapsed = started.elapsed();
        let results_path = self.write_results();
        self.stats.log_summary();
        self.outcome(results_path)
    }

    /// Snapshot of results and statistics handed back to the caller
    fn outcome(&self, results_path: Option<PathBuf>) -> CrawlOutcome {
        CrawlOutcome {
            results: self.checkpoint.results.clone(),
            statistics: self.stats.clone(),
            results_path,
        }
    }

    /// Writes the results, then drops the checkpoint
    ///
    /// The checkpoint is kept whenever the results could not be written, so
    /// the next run can still produce them.
    fn write_results(&mut self) -> Option<PathBuf> {
        if let Err(e) = self.sink.write(&self.checkpoint.results) {
            tracing::error!("Failed to write results, keeping checkpoint: {}", e);
            return None;
        }

        let location = self.sink.location().map(Path::to_path_buf);
        if let Some(path) = &location {
            tracing::info!(
                "Wrote {} shows / {} episodes to {}",
                self.checkpoint.results.show_count(),
                self.checkpoint.results.episode_count(),
                path.display()
            );
        }

        if let Err(e) = self.store.clear_checkpoint() {
            tracing::error!("Failed to remove checkpoint: {}", e);
        }

        location
    }

    /// Lists one category and extracts every show not filtered out
    ///
    /// Starts at the checkpoint's resume index and marks the category
    /// complete afterwards, even when its listing failed.
    async fn crawl_category(&mut self, category: &Category) {
        tracing::info!("Category '{}': listing shows", category.name);
        let shows = self.discover_shows(category).await;
        self.stats.categories_processed += 1;
        self.stats.shows_discovered += shows.len() as u64;

        let start = self.checkpoint.resume_index(&category.name);
        if start > 0 {
            tracing::info!(
                "Resuming '{}' at show {} of {}",
                category.name,
                start,
                shows.len()
            );
        }

        let mut fetched_any = false;
        for (index, show) in shows.iter().enumerate() {
            if index < start {
                self.stats.shows_skipped_resume += 1;
                continue;
            }

            if let Some(reason) = self.skip_reason(&category.name, show) {
                tracing::debug!("Skipping '{}': {}", show.name, reason.as_str());
                self.count_skip(reason);
                continue;
            }

            if fetched_any {
                self.pacer.pause(PauseKind::BetweenShows).await;
            }
            fetched_any = true;

            tracing::info!(
                "[{}] {}/{}: extracting '{}'",
                category.name,
                index + 1,
                shows.len(),
                show.name
            );
            self.crawl_show(category, index, show).await;
        }

        self.checkpoint.finish_category(&category.name);
        self.persist_checkpoint();
    }

    /// Paginates a category listing into its shows, sorted by name
    ///
    /// Stops at the first page that adds no new show, at the first page that
    /// fails to load, or at the configured page ceiling.
    pub async fn discover_shows(&mut self, category: &Category) -> Vec<Show> {
        self.enter(CrawlStage::ListingCategory);

        let max_pages = self.config.crawler.max_listing_pages;
        let page_param = self.config.crawler.page_param.clone();
        let mut seen: HashSet<Url> = HashSet::new();
        let mut shows = Vec::new();

        for page in 1..=max_pages {
            if page > 1 {
                self.pacer.pause(PauseKind::BetweenListingPages).await;
            }

            let page_url = listing_page_url(&category.url, &page_param, page);
            let Some(html) = self.fetch_listing(&page_url).await else {
                break;
            };

            let before = shows.len();
            for show in parse_show_links(&html, &page_url) {
                if seen.insert(show.url.clone()) {
                    shows.push(show);
                }
            }

            let added = shows.len() - before;
            tracing::debug!("{} page {}: {} new shows", category.name, page, added);
            if added == 0 {
                break;
            }
        }

        shows.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::info!("Category '{}': {} shows found", category.name, shows.len());
        shows
    }

    /// Lists a category and splits its shows into skipped and to-extract
    ///
    /// Only listing pages are fetched.
    pub async fn preview_category(&mut self, category: &Category) -> CategoryPreview {
        let shows = self.discover_shows(category).await;
        let (known, missing): (Vec<Show>, Vec<Show>) = shows
            .into_iter()
            .partition(|show| self.skip_reason(&category.name, show).is_some());

        CategoryPreview {
            category: category.name.clone(),
            known,
            missing,
        }
    }

    /// Previews every configured category
    pub async fn preview(&mut self) -> Vec<CategoryPreview> {
        let categories = self.categories.clone();
        let mut previews = Vec::with_capacity(categories.len());
        for category in &categories {
            previews.push(self.preview_category(category).await);
        }
        previews
    }

    /// Decides whether a show is left out of this run
    ///
    /// Shows already in the results are always skipped; otherwise `force`
    /// disables filtering and the crawl mode picks catalog or history.
    pub fn skip_reason(&self, category: &str, show: &Show) -> Option<SkipReason> {
        if self.checkpoint.results.contains_show(category, &show.name) {
            return Some(SkipReason::InResults);
        }

        if self.force {
            return None;
        }

        match self.mode {
            CrawlMode::MissingOnly => self
                .catalog
                .as_ref()
                .filter(|catalog| catalog.is_known(&show.name))
                .map(|_| SkipReason::Catalog),
            CrawlMode::SkipExtracted => self
                .history
                .contains(category, &show.name)
                .then_some(SkipReason::History),
        }
    }

    /// Bumps the statistics counter matching a skip reason
    fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::InResults => self.stats.shows_skipped_results += 1,
            SkipReason::Catalog => self.stats.shows_skipped_catalog += 1,
            SkipReason::History => self.stats.shows_skipped_history += 1,
        }
    }

    /// Extracts one show and commits it
    ///
    /// Only a show with at least one resolved episode enters results and
    /// history; the checkpoint moves past the show either way.
    async fn crawl_show(&mut self, category: &Category, index: usize, show: &Show) {
        let result = self.extract_show(show).await;

        if result.has_episodes() {
            tracing::info!(
                "'{}': {} seasons, {} episodes",
                show.name,
                result.seasons.len(),
                result.episode_count()
            );
            self.stats.shows_extracted += 1;
            self.checkpoint
                .results
                .insert_show(&category.name, &show.name, result);
            if self.history.mark(&category.name, &show.name) {
                self.persist_history();
            }
        } else {
            tracing::warn!("'{}' yielded no episodes", show.name);
            self.stats.shows_empty += 1;
        }

        self.checkpoint.advance(&category.name, index + 1);
        self.persist_checkpoint();
    }

    /// Fetches a show page and extracts its seasons in ascending order
    ///
    /// A failed show page yields an empty result. A failed season page
    /// still contributes an empty season.
    async fn extract_show(&mut self, show: &Show) -> ShowResult {
        self.enter(CrawlStage::ListingShow);
        let mut result = ShowResult::new(show.url.as_str());

        let Some(html) = self.fetch_listing(&show.url).await else {
            return result;
        };

        let seasons = parse_season_links(&html, &show.url);
        if seasons.is_empty() {
            tracing::warn!("No seasons found for '{}'", show.name);
            return result;
        }
        tracing::debug!("'{}': {} seasons", show.name, seasons.len());

        for (position, season) in seasons.iter().enumerate() {
            if position > 0 {
                self.pacer.pause(PauseKind::BetweenSeasons).await;
            }

            self.enter(CrawlStage::ListingSeason);
            self.stats.seasons_visited += 1;
            let episodes = self.extract_season(season).await;
            result.push_season(SeasonResult {
                label: season.label(),
                number: season.number,
                episodes,
            });
        }

        result
    }

    /// Fetches a season page and resolves each of its episodes
    ///
    /// Only resolved episodes are returned; missing sources and failed
    /// fetches are counted in the statistics.
    async fn extract_season(&mut self, season: &Season) -> Vec<EpisodeRecord> {
        let Some(html) = self.fetch_listing(&season.url).await else {
            return Vec::new();
        };

        let episodes = parse_episode_links(&html, &season.url, season.number);
        tracing::debug!("{}: {} episode links", season.label(), episodes.len());

        let mut records = Vec::with_capacity(episodes.len());
        for (position, episode) in episodes.iter().enumerate() {
            if position > 0 {
                self.pacer.pause(PauseKind::BetweenEpisodes).await;
            }

            self.enter(CrawlStage::ListingEpisode);
            match self.extract_episode(episode).await {
                EpisodeOutcome::Resolved(video_source) => {
                    self.stats.episodes_resolved += 1;
                    records.push(EpisodeRecord {
                        episode: episode.number,
                        episode_url: episode.url.to_string(),
                        video_source,
                    });
                }
                EpisodeOutcome::NoSource => {
                    tracing::debug!("No video source on {}", episode.url);
                    self.stats.episodes_no_source += 1;
                }
                EpisodeOutcome::Failed(e) => {
                    tracing::warn!("Episode {} failed: {}", episode.number, e);
                    self.stats.record_failed_episode(episode.url.as_str());
                }
            }
        }

        records
    }

    /// Fetches an episode page with retries and resolves its video
    pub async fn extract_episode(&mut self, episode: &Episode) -> EpisodeOutcome {
        let attempts = self.config.crawler.episode_retries;
        let fetched = fetch_with_retry(&self.client, &episode.url, attempts, &mut self.pacer).await;
        let html = match fetched {
            Ok(html) => html,
            Err(e) => return EpisodeOutcome::Failed(e),
        };

        match resolve_with_strategy(&html, &episode.url) {
            Some((strategy, source)) => {
                tracing::debug!(
                    "Episode {}: {} via {}",
                    episode.number,
                    source.kind(),
                    strategy.as_str()
                );
                EpisodeOutcome::Resolved(source)
            }
            None => EpisodeOutcome::NoSource,
        }
    }

    /// Single-attempt fetch of a listing page; failures end that listing
    ///
    /// The failure is logged and counted here, so callers only see `None`.
    async fn fetch_listing(&mut self, url: &Url) -> Option<String> {
        match fetch_page(&self.client, url).await {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::warn!("Listing page failed: {}", e);
                self.stats.listing_failures += 1;
                None
            }
        }
    }

    /// Saves the checkpoint; a failure is logged and the crawl goes on
    fn persist_checkpoint(&mut self) {
        if let Err(e) = self.store.save_checkpoint(&self.checkpoint) {
            tracing::error!("Failed to save checkpoint: {}", e);
        }
    }

    /// Saves the history; a failure is logged and the crawl goes on
    fn persist_history(&mut self) {
        if let Err(e) = self.store.save_history(&self.history) {
            tracing::error!("Failed to save history: {}", e);
        }
    }

    /// Moves the stage machine forward
    fn enter(&mut self, next: CrawlStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "invalid stage transition {} -> {}",
            self.stage,
            next
        );
        tracing::trace!("Stage {} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Counters gathered so far
    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Results accumulated so far, including resumed ones
    pub fn results(&self) -> &CrawlResults {
        &self.checkpoint.results
    }

    pub fn checkpoint(&self) -> &CheckpointState {
        &self.checkpoint
    }

    /// Shows known to be extracted, including this run's
    pub fn history(&self) -> &HistoryIndex {
        &self.history
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    pub fn stage(&self) -> CrawlStage {
        self.stage
    }

    pub fn mode(&self) -> CrawlMode {
        self.mode
    }

    /// Configured categories, in crawl order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}
