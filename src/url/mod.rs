//! URL-shape rules for the episode site
//!
//! The site encodes its hierarchy in URL paths: show pages end in an
//! `-online-<tag>` connector, season pages carry a `season-N` token and episode
//! pages an `episode-N` token. Everything the listing parser knows about link
//! types lives here.

mod domain;
mod tokens;

use ::url::Url;

pub use domain::{extract_host, matches_wildcard};
pub use tokens::{
    episode_number, has_episode_marker, listing_page_url, season_number, show_name_from_slug,
    show_slug, title_case,
};

/// The kind of hierarchy page a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// A show landing page
    Show,
    /// A season page with its parsed number
    Season(u32),
    /// An episode page; `season` is absent when the URL carries no season token
    Episode { season: Option<u32>, episode: u32 },
}

/// Classifies a resolved link by the shape of its path
///
/// Precedence follows specificity: an episode-number token wins over a season
/// token, which wins over the show connector rule. Links matching nothing
/// (navigation, pagination, media) yield `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use reel_ripple::url::{classify_link, LinkClass};
///
/// let show = Url::parse("https://site.test/breaking-bad-online-free/").unwrap();
/// assert_eq!(classify_link(&show), Some(LinkClass::Show));
///
/// let season = Url::parse("https://site.test/breaking-bad-seasons-2/").unwrap();
/// assert_eq!(classify_link(&season), Some(LinkClass::Season(2)));
/// ```
pub fn classify_link(url: &Url) -> Option<LinkClass> {
    let path = url.path().to_lowercase();

    if let Some(episode) = episode_number(&path) {
        return Some(LinkClass::Episode {
            season: season_number(&path),
            episode,
        });
    }

    if has_episode_marker(&path) {
        return None;
    }

    if let Some(season) = season_number(&path) {
        return Some(LinkClass::Season(season));
    }

    if tokens::is_show_path(&path) {
        return Some(LinkClass::Show);
    }

    None
}
