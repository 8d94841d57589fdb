//! Show-name matching against the catalog
//!
//! Matching is deliberately lenient: exact membership of any normalized form,
//! then a containment check between alnum forms longer than four characters.
//! The containment rule can over-match a short title embedded in a longer,
//! unrelated one; see `CatalogIndex::is_known`.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Both sides of a containment match must be longer than this
pub const MIN_CONTAINMENT_LEN: usize = 4;

lazy_static! {
    static ref SEASON_WORD_SUFFIX: Regex = Regex::new(r"[\s_-]*season[\s_-]*\d+$").unwrap();
    static ref SEASON_SHORT_SUFFIX: Regex = Regex::new(r"[\s_-]+s\d+$").unwrap();
    static ref NON_ALNUM_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Lowercases and strips a trailing "season N" / "sN" suffix
pub fn normalize_candidate(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = SEASON_WORD_SUFFIX.replace(&lowered, "");
    let stripped = SEASON_SHORT_SUFFIX.replace(&stripped, "");
    stripped.trim().to_string()
}

/// Keeps only ASCII letters and digits, lowercased
pub fn alnum(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Collapses every run of non-alphanumerics into a single dash
pub fn dash_slug(value: &str) -> String {
    let lowered = value.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Registered keys of a catalog, split by how they are compared
#[derive(Debug, Clone, Default)]
pub(crate) struct KeySet {
    /// Raw slugs, raw titles, alnum titles and dash-slug titles
    exact: HashSet<String>,
    /// Alnum form of every exact key, for the containment rule
    containment: BTreeSet<String>,
}

impl KeySet {
    pub(crate) fn register_slug(&mut self, slug: &str) {
        self.insert(slug.trim().to_lowercase());
    }

    pub(crate) fn register_title(&mut self, title: &str) {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return;
        }
        self.insert(alnum(&title));
        self.insert(dash_slug(&title));
        self.insert(title);
    }

    fn insert(&mut self, key: String) {
        if key.is_empty() {
            return;
        }
        let folded = alnum(&key);
        if folded.len() > MIN_CONTAINMENT_LEN {
            self.containment.insert(folded);
        }
        self.exact.insert(key);
    }

    pub(crate) fn len(&self) -> usize {
        self.exact.len()
    }

    pub(crate) fn matches(&self, candidate: &str) -> bool {
        let normalized = normalize_candidate(candidate);
        let folded = alnum(&normalized);
        let slug = dash_slug(&normalized);

        if [&normalized, &folded, &slug]
            .iter()
            .any(|form| !form.is_empty() && self.exact.contains(form.as_str()))
        {
            return true;
        }

        if folded.len() <= MIN_CONTAINMENT_LEN {
            return false;
        }

        self.containment
            .iter()
            .any(|known| known.contains(folded.as_str()) || folded.contains(known.as_str()))
    }
}
