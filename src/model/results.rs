//! Nested crawl results: Category → Show → Season → [Episode]

use crate::model::VideoSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One resolved episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: u32,
    pub episode_url: String,
    pub video_source: VideoSource,
}

/// The resolved episodes of one season, ascending by episode number
///
/// Only `label` and `episodes` reach the results file; `number` orders
/// seasons and is recovered from the label when reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonResult {
    pub label: String,
    pub number: u32,
    pub episodes: Vec<EpisodeRecord>,
}

/// Everything extracted for one show
///
/// Serialized as `{"url": ..., "seasons": {"Season 1": [...], ...}}`, with
/// season keys in ascending season order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowResult {
    pub url: String,
    #[serde(with = "season_map")]
    pub seasons: Vec<SeasonResult>,
}

impl ShowResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            seasons: Vec::new(),
        }
    }

    /// Adds a season, keeping seasons ordered by number
    ///
    /// A second season with an already present number is merged into the
    /// first, so every label appears once.
    pub fn push_season(&mut self, season: SeasonResult) {
        if let Some(existing) = self
            .seasons
            .iter_mut()
            .find(|existing| existing.number == season.number)
        {
            for record in season.episodes {
                let known = existing
                    .episodes
                    .iter()
                    .any(|e| e.episode_url == record.episode_url);
                if !known {
                    existing.episodes.push(record);
                }
            }
            existing.episodes.sort_by_key(|e| e.episode);
            return;
        }

        let at = self
            .seasons
            .partition_point(|existing| existing.number <= season.number);
        self.seasons.insert(at, season);
    }

    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }

    /// A show counts as extracted only when at least one episode resolved
    pub fn has_episodes(&self) -> bool {
        self.episode_count() > 0
    }
}

/// Results accumulated over a run, keyed by category then show name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlResults {
    categories: BTreeMap<String, BTreeMap<String, ShowResult>>,
}

impl CrawlResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a show, replacing any earlier result under the same name
    pub fn insert_show(&mut self, category: &str, show: &str, result: ShowResult) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(show.to_string(), result);
    }

    pub fn contains_show(&self, category: &str, show: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|shows| shows.contains_key(show))
    }

    pub fn category(&self, category: &str) -> Option<&BTreeMap<String, ShowResult>> {
        self.categories.get(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, ShowResult>)> {
        self.categories.iter()
    }

    pub fn show_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn episode_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(BTreeMap::values)
            .map(ShowResult::episode_count)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.show_count() == 0
    }
}

mod season_map {
    use super::{EpisodeRecord, SeasonResult};
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        seasons: &[SeasonResult],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(seasons.len()))?;
        for season in seasons {
            map.serialize_entry(&season.label, &season.episodes)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<SeasonResult>, D::Error> {
        let labelled = BTreeMap::<String, Vec<EpisodeRecord>>::deserialize(deserializer)?;

        let mut seasons = Vec::with_capacity(labelled.len());
        for (label, episodes) in labelled {
            let number = label_number(&label)
                .ok_or_else(|| D::Error::custom(format!("unrecognised season label {:?}", label)))?;
            seasons.push(SeasonResult {
                label,
                number,
                episodes,
            });
        }
        seasons.sort_by_key(|season| season.number);
        Ok(seasons)
    }

    /// `"Season 12"` → 12
    fn label_number(label: &str) -> Option<u32> {
        label.rsplit(' ').next()?.parse().ok()
    }
}
