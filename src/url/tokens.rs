use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref SEASON_TOKEN: Regex = Regex::new(r"seasons?-(\d+)").unwrap();
    static ref EPISODE_TOKEN: Regex = Regex::new(r"episodes?-(\d+)").unwrap();
    static ref SHOW_PATH: Regex = Regex::new(r"/[^/]+-online-[^/]+/?$").unwrap();
}

const ONLINE_CONNECTOR: &str = "-online-";

fn capture_number(pattern: &Regex, text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    pattern
        .captures(&lowered)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses the season number from a `season-N` / `seasons-N` token
///
/// Returns `None` when the token is missing or the number does not fit.
pub fn season_number(text: &str) -> Option<u32> {
    capture_number(&SEASON_TOKEN, text)
}

/// Parses the episode number from an `episode-N` / `episodes-N` token
pub fn episode_number(text: &str) -> Option<u32> {
    capture_number(&EPISODE_TOKEN, text)
}

/// True when the text mentions episodes at all, numbered or not
pub fn has_episode_marker(text: &str) -> bool {
    text.to_lowercase().contains("episode")
}

pub(crate) fn is_show_path(path: &str) -> bool {
    SHOW_PATH.is_match(path)
}

/// Derives a show slug from its landing URL
///
/// The slug is the last path segment up to its final `-online-` connector:
/// `/breaking-bad-online-free/` → `breaking-bad`.
pub fn show_slug(url: &Url) -> Option<String> {
    let segment = url
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()?
        .to_lowercase();
    let cut = segment.rfind(ONLINE_CONNECTOR)?;
    let slug = &segment[..cut];
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

/// Turns a slug into a display name: `the-last-of-us` → `The Last Of Us`
pub fn show_name_from_slug(slug: &str) -> String {
    title_case(&slug.replace('-', " "))
}

/// Title-cases text: a letter following a non-letter is uppercased, any other
/// letter is lowercased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

/// Builds the URL of a paginated listing page
///
/// Page 1 is the listing URL itself; later pages append `<param>=<page>`.
pub fn listing_page_url(base: &Url, param: &str, page: u32) -> Url {
    let mut url = base.clone();
    if page > 1 {
        url.query_pairs_mut().append_pair(param, &page.to_string());
    }
    url
}
