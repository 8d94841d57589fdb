//! Listing parser: typed child links from a listing page
//!
//! Category pages yield shows, show pages yield seasons, season pages yield
//! episodes. Links are classified purely by URL shape (see `crate::url`),
//! deduplicated by URL, and returned in a stable order:
//! - shows alphabetically by name
//! - seasons and episodes ascending by number, ties in document order

use crate::model::{Episode, Season, Show};
use crate::url::{classify_link, LinkClass};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts every followable anchor target, resolved against the page URL
///
/// Skips `javascript:`, `mailto:`, `tel:`, `data:` and same-page fragment
/// links, drops fragments, and keeps only HTTP(S) results. Order follows the
/// document; duplicates are kept.
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}

fn dedup_by_url<T>(items: Vec<(Url, T)>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|(url, _)| seen.insert(url.clone()))
        .map(|(_, item)| item)
        .collect()
}

/// Shows linked from a category listing page
pub fn parse_show_links(html: &str, page_url: &Url) -> Vec<Show> {
    let candidates = extract_links(html, page_url)
        .into_iter()
        .filter(|url| classify_link(url) == Some(LinkClass::Show))
        .filter_map(|url| Show::from_url(url.clone()).map(|show| (url, show)))
        .collect();

    let mut shows = dedup_by_url(candidates);
    shows.sort_by(|a, b| a.name.cmp(&b.name));
    shows
}

/// Seasons linked from a show page
///
/// Links whose season number cannot be parsed never make it here: the season
/// class only exists for URLs with a parseable number.
pub fn parse_season_links(html: &str, page_url: &Url) -> Vec<Season> {
    let candidates = extract_links(html, page_url)
        .into_iter()
        .filter_map(|url| match classify_link(&url) {
            Some(LinkClass::Season(number)) => Some((url.clone(), Season { number, url })),
            _ => None,
        })
        .collect();

    let mut seasons = dedup_by_url(candidates);
    seasons.sort_by_key(|season| season.number);
    seasons
}

/// Episodes of `season_number` linked from a season page
///
/// Episode links pointing at another season (next/previous season
/// navigation, related shows) are dropped.
pub fn parse_episode_links(html: &str, page_url: &Url, season_number: u32) -> Vec<Episode> {
    let candidates = extract_links(html, page_url)
        .into_iter()
        .filter_map(|url| match classify_link(&url) {
            Some(LinkClass::Episode {
                season: Some(season),
                episode,
            }) if season == season_number => Some((
                url.clone(),
                Episode {
                    number: episode,
                    url,
                },
            )),
            _ => None,
        })
        .collect();

    let mut episodes = dedup_by_url(candidates);
    episodes.sort_by_key(|episode| episode.number);
    episodes
}
