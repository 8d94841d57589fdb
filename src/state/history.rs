//! Cross-run record of fully extracted shows
//!
//! Entries are only ever added. A show lands here once its extraction has
//! produced at least one resolved episode.

use std::collections::{BTreeMap, BTreeSet};

/// Category name → names of shows already extracted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryIndex {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: &str, show: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|shows| shows.contains(show))
    }

    /// Marks a show as extracted; returns false if it already was
    pub fn mark(&mut self, category: &str, show: &str) -> bool {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(show.to_string())
    }

    /// Shows recorded for a category, sorted by name
    pub fn shows(&self, category: &str) -> impl Iterator<Item = &str> {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(|shows| shows.iter().map(String::as_str))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Total number of recorded shows
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain `{category: [names]}` view, as persisted
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.categories
            .iter()
            .map(|(category, shows)| (category.clone(), shows.iter().cloned().collect()))
            .collect()
    }
}

impl From<BTreeMap<String, Vec<String>>> for HistoryIndex {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            categories: map
                .into_iter()
                .map(|(category, shows)| (category, shows.into_iter().collect()))
                .collect(),
        }
    }
}
