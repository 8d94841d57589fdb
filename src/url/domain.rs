use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use reel_ripple::url::extract_host;
///
/// let url = Url::parse("https://Drive.Google.com/file/d/abc/preview").unwrap();
/// assert_eq!(extract_host(&url), Some("drive.google.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks if a host matches a wildcard pattern
///
/// `"mega.nz"` matches only itself; `"*.youtube.com"` matches `youtube.com`
/// and any of its subdomains. The candidate is expected to be lowercase.
///
/// ```
/// use reel_ripple::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.youtube.com", "www.youtube.com"));
/// assert!(matches_wildcard("*.youtube.com", "youtube.com"));
/// assert!(!matches_wildcard("*.youtube.com", "notyoutube.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
