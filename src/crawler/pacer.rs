//! Request pacing for the crawl
//!
//! The crawl talks to a single host, one request at a time. Politeness is a
//! fixed delay at each granularity (episode, season/show, listing page,
//! retry). Delays never adapt to latency or failures, so the request rhythm
//! stays predictable. Traversal code only asks the pacer to pause; it never
//! sleeps on its own.

use crate::config::CrawlerConfig;
use std::collections::HashMap;
use std::time::Duration;

/// The points in a crawl where the pacer inserts a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseKind {
    /// Between two episode page fetches (shortest)
    BetweenEpisodes,
    /// Between two seasons of the same show
    BetweenSeasons,
    /// Between two extracted shows
    BetweenShows,
    /// Between two pages of a category listing
    BetweenListingPages,
    /// Before re-attempting a failed episode fetch
    BeforeRetry,
}

/// Constant delays per pause kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingPolicy {
    pub episode: Duration,
    pub show: Duration,
    pub listing_page: Duration,
    pub retry: Duration,
}

impl PacingPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            episode: Duration::from_millis(config.episode_delay_ms),
            show: Duration::from_millis(config.show_delay_ms),
            listing_page: Duration::from_millis(config.page_delay_ms),
            retry: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// A policy without any delay, for tests and local mirrors
    pub fn immediate() -> Self {
        Self {
            episode: Duration::ZERO,
            show: Duration::ZERO,
            listing_page: Duration::ZERO,
            retry: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, kind: PauseKind) -> Duration {
        match kind {
            PauseKind::BetweenEpisodes => self.episode,
            PauseKind::BetweenSeasons | PauseKind::BetweenShows => self.show,
            PauseKind::BetweenListingPages => self.listing_page,
            PauseKind::BeforeRetry => self.retry,
        }
    }
}

/// Sleeps according to a `PacingPolicy` and keeps count of every pause
#[derive(Debug)]
pub struct Pacer {
    policy: PacingPolicy,
    pauses: HashMap<PauseKind, u32>,
}

impl Pacer {
    pub fn new(policy: PacingPolicy) -> Self {
        Self {
            policy,
            pauses: HashMap::new(),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(PacingPolicy::from_config(config))
    }

    pub fn delay_for(&self, kind: PauseKind) -> Duration {
        self.policy.delay_for(kind)
    }

    /// Waits out the delay configured for `kind`
    pub async fn pause(&mut self, kind: PauseKind) {
        *self.pauses.entry(kind).or_insert(0) += 1;

        let delay = self.delay_for(kind);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Number of pauses of the given kind so far
    pub fn pause_count(&self, kind: PauseKind) -> u32 {
        self.pauses.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_pauses(&self) -> u32 {
        self.pauses.values().sum()
    }
}
