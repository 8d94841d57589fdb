//! Shared fixtures: test configuration, page markup and mock mounting

use reel_ripple::config::{CategoryEntry, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CATEGORY: &str = "English Seasons";
pub const CATEGORY_PATH: &str = "/literature/seasons/english-seasons/";

/// Creates a test configuration pointing at the mock server, with no delays
pub fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        crawler: CrawlerConfig {
            episode_retries: 3,
            retry_delay_ms: 0,
            episode_delay_ms: 0,
            show_delay_ms: 0,
            page_delay_ms: 0,
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            results_path: state_path(dir, "results.json"),
            checkpoint_path: state_path(dir, "checkpoint.json"),
            history_path: state_path(dir, "history.json"),
        },
        catalog: None,
        categories: vec![CategoryEntry {
            name: CATEGORY.to_string(),
            url: format!("{}{}", server.uri(), CATEGORY_PATH),
        }],
    }
}

pub fn state_path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

pub fn file_in(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// A page holding the given anchors plus some site chrome
pub fn links_page(hrefs: &[String]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    format!(
        r#"<html><head><title>Listing</title></head><body>
        <nav><a href="/">Home</a><a href="/literature/seasons/hindi-seasons/">Hindi</a></nav>
        <ul>{}</ul>
        <a href="javascript:void(0)">Share</a>
        </body></html>"#,
        anchors
    )
}

pub fn show_href(slug: &str) -> String {
    format!("/{}-online-hd/", slug)
}

pub fn season_href(slug: &str, season: u32) -> String {
    format!("/{}-seasons-{}/", slug, season)
}

pub fn episode_href(slug: &str, season: u32, episode: u32) -> String {
    format!("/{}-seasons-{}-episode-{}/", slug, season, episode)
}

/// Episode page with a drive player frame
pub fn drive_episode(file_id: &str) -> String {
    format!(
        r#"<html><body><h1>Episode</h1>
        <iframe src="https://drive.google.com/file/d/{}/preview" allowfullscreen></iframe>
        </body></html>"#,
        file_id
    )
}

/// Mounts a GET route that may be hit any number of times
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a GET route that must be hit exactly `times` times
pub async fn mount_page_expect(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a GET route answering with an error status
pub async fn mount_status(server: &MockServer, route: &str, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts listing page `page` (> 1) of the category
///
/// Must be mounted before the unqualified first page, which would otherwise
/// also answer paginated requests.
pub async fn mount_category_page(server: &MockServer, page: u32, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .and(query_param("pg", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a show with the given seasons, each holding drive-backed episodes
pub async fn mount_show(server: &MockServer, slug: &str, seasons: &[(u32, &[u32])]) {
    let season_links: Vec<String> = seasons
        .iter()
        .map(|(season, _)| season_href(slug, *season))
        .collect();
    mount_page(server, &show_href(slug), links_page(&season_links)).await;

    for (season, episodes) in seasons {
        let episode_links: Vec<String> = episodes
            .iter()
            .map(|episode| episode_href(slug, *season, *episode))
            .collect();
        mount_page(server, &season_href(slug, *season), links_page(&episode_links)).await;

        for episode in *episodes {
            mount_page(
                server,
                &episode_href(slug, *season, *episode),
                drive_episode(&format!("{}-s{}e{}", slug, season, episode)),
            )
            .await;
        }
    }
}
