//! Video source resolver
//!
//! Turns an episode page into a `VideoSource` by running an ordered chain of
//! detection strategies. The first strategy that matches wins; the order is a
//! priority, so a frame on a known host always beats a raw identifier found
//! elsewhere in the page text.
//!
//! | # | Strategy | Result |
//! |---|----------|--------|
//! | 1 | frame on the drive host with an extractable file id | `DriveEmbed` |
//! | 2 | frame on the Mega host | `MegaEmbed` |
//! | 3 | frame on a YouTube host | `YoutubeEmbed` |
//! | 4 | frame on any other whitelisted host | `GenericIframe` |
//! | 5 | `<video>` source (direct or nested `<source>`) | `Html5Direct` |
//! | 6 | drive file id anywhere in the raw markup | `DriveEmbed` |
//! | 7 | Mega `file-id#key` link anywhere in the raw markup | `MegaEmbed` |
//! | 8 | attribute value pointing at a media file | `DirectFileLink` |
//!
//! Finding nothing is a normal outcome and yields `None`.

use crate::model::VideoSource;
use crate::url::{extract_host, matches_wildcard};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

const DRIVE_HOSTS: &[&str] = &["drive.google.com"];
const MEGA_HOSTS: &[&str] = &["*.mega.nz", "*.mega.co.nz", "*.mega.io"];
const YOUTUBE_HOSTS: &[&str] = &["*.youtube.com", "youtu.be", "*.youtube-nocookie.com"];
const OTHER_FRAME_HOSTS: &[&str] = &["*.vimeo.com"];

lazy_static! {
    /// Drive file id encodings, most specific first
    static ref DRIVE_ID_PATTERNS: Vec<Regex> = [
        r"(?i)drive\.google\.com/file/d/([a-zA-Z0-9_-]+)",
        r"(?i)drive\.google\.com/(?:open|uc)\?(?:[^\s&]+&(?:amp;)?)*id=([a-zA-Z0-9_-]+)",
        r"(?i)drive-video-([a-zA-Z0-9_-]+)",
        r"(?i)/file/d/([a-zA-Z0-9_-]+)/preview",
        r#"(?i)data-id="([a-zA-Z0-9_-]+)""#,
        r#"(?i)fileId["\s:=]+([a-zA-Z0-9_-]+)"#,
        r#"(?i)video[_-]?id["\s:=]+([a-zA-Z0-9_-]+)"#,
        r#"(?i)src="[^"]*?/d/([a-zA-Z0-9_-]+)"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();

    static ref MEGA_LINK: Regex =
        Regex::new(r"(?i)mega\.nz/(?:file|embed)/([A-Za-z0-9]+)(?:#([A-Za-z0-9_-]+))?").unwrap();

    static ref MEDIA_FILE_ATTR: Regex = Regex::new(
        r#"(?i)(?:src|href|data-src)=["']([^"']*\.(?:mp4|webm|ogg|avi|mkv)[^"']*)["']"#
    )
    .unwrap();
}

/// One detection step of the resolver chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DriveFrame,
    MegaFrame,
    YoutubeFrame,
    WhitelistedFrame,
    Html5Video,
    RawDriveId,
    RawMegaLink,
    RawMediaFile,
}

/// The chain, in priority order
pub const STRATEGY_CHAIN: [Strategy; 8] = [
    Strategy::DriveFrame,
    Strategy::MegaFrame,
    Strategy::YoutubeFrame,
    Strategy::WhitelistedFrame,
    Strategy::Html5Video,
    Strategy::RawDriveId,
    Strategy::RawMegaLink,
    Strategy::RawMediaFile,
];

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DriveFrame => "drive_frame",
            Self::MegaFrame => "mega_frame",
            Self::YoutubeFrame => "youtube_frame",
            Self::WhitelistedFrame => "whitelisted_frame",
            Self::Html5Video => "html5_video",
            Self::RawDriveId => "raw_drive_id",
            Self::RawMegaLink => "raw_mega_link",
            Self::RawMediaFile => "raw_media_file",
        }
    }

    fn apply(&self, page: &EpisodePage<'_>) -> Option<VideoSource> {
        match self {
            Self::DriveFrame => match page.frame.as_ref()? {
                (FrameHost::Drive, src) => extract_drive_id(src.as_str()).map(VideoSource::drive),
                _ => None,
            },
            Self::MegaFrame => match page.frame.as_ref()? {
                (FrameHost::Mega, src) => Some(VideoSource::mega(src.as_str())),
                _ => None,
            },
            Self::YoutubeFrame => match page.frame.as_ref()? {
                (FrameHost::Youtube, src) => Some(VideoSource::youtube(src.as_str())),
                _ => None,
            },
            Self::WhitelistedFrame => page
                .frame
                .as_ref()
                .map(|(_, src)| VideoSource::iframe(src.as_str())),
            Self::Html5Video => page.video.as_ref().map(|src| VideoSource::html5(src.as_str())),
            Self::RawDriveId => extract_drive_id(page.raw).map(VideoSource::drive),
            Self::RawMegaLink => extract_mega_link(page.raw).map(VideoSource::mega),
            Self::RawMediaFile => MEDIA_FILE_ATTR
                .captures(page.raw)
                .and_then(|caps| caps.get(1))
                .and_then(|m| page.base.join(m.as_str()).ok())
                .map(|url| VideoSource::direct_file(url.as_str())),
        }
    }
}

/// Hosting families a player frame may point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameHost {
    Drive,
    Mega,
    Youtube,
    Other,
}

fn classify_frame_host(url: &Url) -> Option<FrameHost> {
    let host = extract_host(url)?;
    let any = |patterns: &[&str]| patterns.iter().any(|p| matches_wildcard(p, &host));

    if any(DRIVE_HOSTS) {
        Some(FrameHost::Drive)
    } else if any(MEGA_HOSTS) {
        Some(FrameHost::Mega)
    } else if any(YOUTUBE_HOSTS) {
        Some(FrameHost::Youtube)
    } else if any(OTHER_FRAME_HOSTS) {
        Some(FrameHost::Other)
    } else {
        None
    }
}

/// What the DOM-based strategies need, parsed once per page
struct EpisodePage<'a> {
    raw: &'a str,
    base: &'a Url,
    /// First frame whose target is on a whitelisted host
    frame: Option<(FrameHost, Url)>,
    /// Resolved source of the first `<video>` element
    video: Option<Url>,
}

impl<'a> EpisodePage<'a> {
    fn parse(raw: &'a str, base: &'a Url) -> Self {
        let document = Html::parse_document(raw);
        Self {
            raw,
            base,
            frame: first_known_frame(&document, base),
            video: first_video_source(&document, base),
        }
    }
}

fn first_known_frame(document: &Html, base: &Url) -> Option<(FrameHost, Url)> {
    let selector = Selector::parse("iframe[src]").ok()?;
    document
        .select(&selector)
        .filter_map(|frame| frame.value().attr("src"))
        .filter_map(|src| base.join(src.trim()).ok())
        .find_map(|url| classify_frame_host(&url).map(|host| (host, url)))
}

fn first_video_source(document: &Html, base: &Url) -> Option<Url> {
    let video_selector = Selector::parse("video").ok()?;
    let source_selector = Selector::parse("source[src]").ok()?;

    let video = document.select(&video_selector).next()?;
    let src = video
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .or_else(|| {
            video
                .select(&source_selector)
                .filter_map(|source| source.value().attr("src"))
                .map(str::trim)
                .find(|src| !src.is_empty())
        })?;

    base.join(src).ok()
}

/// Finds a drive file id using the ordered fallback patterns
pub fn extract_drive_id(content: &str) -> Option<String> {
    DRIVE_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Finds a Mega link and canonicalizes it to its embed form
pub fn extract_mega_link(content: &str) -> Option<String> {
    let caps = MEGA_LINK.captures(content)?;
    let file_id = caps.get(1)?.as_str();
    Some(match caps.get(2) {
        Some(key) => format!("https://mega.nz/embed/{}#{}", file_id, key.as_str()),
        None => format!("https://mega.nz/embed/{}", file_id),
    })
}

/// Resolves the page's video and reports which strategy found it
pub fn resolve_with_strategy(html: &str, base_url: &Url) -> Option<(Strategy, VideoSource)> {
    let page = EpisodePage::parse(html, base_url);
    STRATEGY_CHAIN
        .iter()
        .find_map(|strategy| strategy.apply(&page).map(|source| (*strategy, source)))
}

/// Resolves the page's video source
///
/// # Example
///
/// ```
/// use url::Url;
/// use reel_ripple::crawler::resolve;
///
/// let base = Url::parse("https://site.test/dark-seasons-1-episode-1/").unwrap();
/// let html = r#"<iframe src="https://drive.google.com/file/d/1aB2c3/preview"></iframe>"#;
/// let source = resolve(html, &base).unwrap();
/// assert_eq!(source.direct_link(), "https://drive.google.com/file/d/1aB2c3/view");
/// ```
pub fn resolve(html: &str, base_url: &Url) -> Option<VideoSource> {
    resolve_with_strategy(html, base_url).map(|(_, source)| source)
}
