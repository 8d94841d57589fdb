/// Traversal stage definitions
///
/// A crawl walks each category top-down; the stage records how deep the
/// traversal currently is.
use std::fmt;

/// Where the traversal currently is in the site hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStage {
    /// Paginating a category listing
    ListingCategory,
    /// Reading a show page for its seasons
    ListingShow,
    /// Reading a season page for its episodes
    ListingSeason,
    /// Fetching and resolving a single episode page
    ListingEpisode,
    /// All categories processed
    Done,
}

impl CrawlStage {
    /// Nesting depth: category 0 through episode 3
    ///
    /// `Done` has no depth.
    pub fn depth(&self) -> Option<u8> {
        match self {
            Self::ListingCategory => Some(0),
            Self::ListingShow => Some(1),
            Self::ListingSeason => Some(2),
            Self::ListingEpisode => Some(3),
            Self::Done => None,
        }
    }

    /// Returns true once the crawl has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether the traversal may move from this stage to `next`
    ///
    /// Moves go one level deeper, back up to any shallower or equal level,
    /// or to `Done`. Nothing leaves `Done`.
    pub fn can_transition_to(&self, next: CrawlStage) -> bool {
        match (self.depth(), next.depth()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(from), Some(to)) => to <= from + 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListingCategory => "listing_category",
            Self::ListingShow => "listing_show",
            Self::ListingSeason => "listing_season",
            Self::ListingEpisode => "listing_episode",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
