//! In-flight crawl progress
//!
//! The checkpoint carries everything extracted so far plus the position of
//! the next show to process. It is rewritten after every show boundary and
//! removed once a whole run finishes.

use crate::model::CrawlResults;

/// Resumable position of a running crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointState {
    /// Results committed so far, across all categories
    pub results: CrawlResults,

    /// Category whose show loop is in progress
    pub current_category: Option<String>,

    /// Index of the next show to process in that category's sorted list
    pub current_show_index: usize,

    /// Categories whose show loop has finished in this run
    pub completed_categories: Vec<String>,

    /// Hash of the configuration the run started under
    pub config_hash: Option<String>,
}

impl CheckpointState {
    pub fn new(config_hash: Option<String>) -> Self {
        Self {
            config_hash,
            ..Self::default()
        }
    }

    /// Show index to start from for `category`
    ///
    /// Zero unless this checkpoint was taken inside that category.
    pub fn resume_index(&self, category: &str) -> usize {
        match &self.current_category {
            Some(current) if current == category => self.current_show_index,
            _ => 0,
        }
    }

    /// Records that every show before `next_index` in `category` is done
    pub fn advance(&mut self, category: &str, next_index: usize) {
        self.current_category = Some(category.to_string());
        self.current_show_index = next_index;
    }

    /// Closes a category: clears the position but keeps its results
    pub fn finish_category(&mut self, category: &str) {
        if !self.is_category_complete(category) {
            self.completed_categories.push(category.to_string());
        }
        self.current_category = None;
        self.current_show_index = 0;
    }

    pub fn is_category_complete(&self, category: &str) -> bool {
        self.completed_categories.iter().any(|c| c == category)
    }

    /// Whether there is anything worth resuming from
    pub fn has_progress(&self) -> bool {
        !self.results.is_empty()
            || self.current_category.is_some()
            || !self.completed_categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShowResult;

    #[test]
    fn test_resume_index_only_for_current_category() {
        let mut checkpoint = CheckpointState::default();
        checkpoint.advance("English Seasons", 7);

        assert_eq!(checkpoint.resume_index("English Seasons"), 7);
        assert_eq!(checkpoint.resume_index("Hindi Seasons"), 0);
        assert!(checkpoint.has_progress());
    }

    #[test]
    fn test_finish_category_keeps_results() {
        let mut checkpoint = CheckpointState::new(Some("abc".to_string()));
        checkpoint
            .results
            .insert_show("English Seasons", "Dark", ShowResult::new("u"));
        checkpoint.advance("English Seasons", 3);

        checkpoint.finish_category("English Seasons");
        checkpoint.finish_category("English Seasons");

        assert_eq!(checkpoint.current_category, None);
        assert_eq!(checkpoint.current_show_index, 0);
        assert_eq!(checkpoint.completed_categories, vec!["English Seasons"]);
        assert!(checkpoint.is_category_complete("English Seasons"));
        assert!(checkpoint.results.contains_show("English Seasons", "Dark"));
        assert_eq!(checkpoint.resume_index("English Seasons"), 0);
    }

    #[test]
    fn test_empty_checkpoint_has_no_progress() {
        assert!(!CheckpointState::new(None).has_progress());
    }
}
