//! Data model for the crawled hierarchy
//!
//! - `Category`, `Show`, `Season`, `Episode`: transient link records rebuilt
//!   from live pages on every run
//! - `VideoSource`: the canonical descriptor of an episode's playable reference
//! - `CrawlResults`: the nested Category → Show → Season → Episode structure
//!   that is checkpointed and finally written out

mod results;
mod video_source;

pub use results::{CrawlResults, EpisodeRecord, SeasonResult, ShowResult};
pub use video_source::VideoSource;

use crate::config::CategoryEntry;
use crate::url::{show_name_from_slug, show_slug};
use url::Url;

/// A top-level listing with its own pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: Url,
}

impl Category {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }

    /// Builds a category from its configuration entry
    pub fn from_entry(entry: &CategoryEntry) -> Result<Self, url::ParseError> {
        Ok(Self::new(entry.name.clone(), Url::parse(&entry.url)?))
    }
}

/// A show discovered on a category listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    /// Display name derived from the slug
    pub name: String,
    pub url: Url,
    pub slug: String,
}

impl Show {
    /// Derives the show from its landing URL; `None` if the URL has no slug
    pub fn from_url(url: Url) -> Option<Self> {
        let slug = show_slug(&url)?;
        let name = show_name_from_slug(&slug);
        if name.trim().is_empty() {
            return None;
        }
        Some(Self { name, url, slug })
    }
}

/// A season page of a show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub number: u32,
    pub url: Url,
}

impl Season {
    /// Label used as the season key in results ("Season 3")
    pub fn label(&self) -> String {
        format!("Season {}", self.number)
    }
}

/// An episode page belonging to a season
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub number: u32,
    pub url: Url,
}
