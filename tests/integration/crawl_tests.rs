//! Full-crawl and pagination behavior against a mock site

use crate::support::*;
use reel_ripple::crawler::{run_crawl, run_crawl_with_upload, Coordinator, RunOptions};
use reel_ripple::output::{ArtifactUploader, OutputResult, UploadReceipt, UploadRequest};
use reel_ripple::VideoSource;
use std::sync::Mutex;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_crawl_single_category() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let shows = vec![show_href("dark"), show_href("lost")];
    // Page 2 repeats page 1, so listing stops there
    mount_category_page(&server, 3, links_page(&[]), 0).await;
    mount_category_page(&server, 2, links_page(&shows), 1).await;
    mount_page_expect(&server, CATEGORY_PATH, links_page(&shows), 1).await;

    // Dark: season 1 has a drive and an html5 episode plus a link into season 2
    mount_page(
        &server,
        &show_href("dark"),
        links_page(&[season_href("dark", 2), season_href("dark", 1)]),
    )
    .await;
    mount_page(
        &server,
        &season_href("dark", 1),
        links_page(&[
            episode_href("dark", 1, 2),
            episode_href("dark", 1, 1),
            episode_href("dark", 2, 1),
            episode_href("dark", 1, 1),
        ]),
    )
    .await;
    mount_page(
        &server,
        &season_href("dark", 2),
        links_page(&[episode_href("dark", 2, 1)]),
    )
    .await;
    mount_page_expect(&server, &episode_href("dark", 1, 1), drive_episode("DarkS1E1"), 1).await;
    mount_page_expect(
        &server,
        &episode_href("dark", 1, 2),
        r#"<html><body><video controls><source src="/media/dark-1-2.mp4"></video></body></html>"#
            .to_string(),
        1,
    )
    .await;
    mount_page_expect(
        &server,
        &episode_href("dark", 2, 1),
        r#"<iframe src="https://www.youtube.com/embed/dark21"></iframe>"#.to_string(),
        1,
    )
    .await;

    // Lost has no seasons at all
    mount_page(&server, &show_href("lost"), links_page(&[])).await;

    let config = create_test_config(&server, &dir);
    let outcome = run_crawl(config, RunOptions::default()).await.unwrap();

    let category = outcome.results.category(CATEGORY).expect("category present");
    assert_eq!(category.len(), 1);
    let dark = &category["Dark"];
    assert!(dark.url.ends_with("/dark-online-hd/"));

    let season_numbers: Vec<u32> = dark.seasons.iter().map(|s| s.number).collect();
    assert_eq!(season_numbers, vec![1, 2]);
    assert_eq!(dark.seasons[0].label, "Season 1");

    let first = &dark.seasons[0].episodes;
    assert_eq!(first.iter().map(|e| e.episode).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(first[0].video_source, VideoSource::drive("DarkS1E1"));
    assert_eq!(first[1].video_source.kind(), "html5");
    assert_eq!(
        first[1].video_source.direct_link(),
        format!("{}/media/dark-1-2.mp4", server.uri())
    );
    assert_eq!(dark.seasons[1].episodes[0].video_source.kind(), "youtube");

    let stats = &outcome.statistics;
    assert_eq!(stats.shows_discovered, 2);
    assert_eq!(stats.shows_extracted, 1);
    assert_eq!(stats.shows_empty, 1);
    assert_eq!(stats.episodes_resolved, 3);
    assert_eq!(stats.episodes_failed, 0);

    let results_path = outcome.results_path.expect("results written");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(results_path).unwrap()).unwrap();
    let written_seasons = &written[CATEGORY]["Dark"]["seasons"];
    assert_eq!(
        written_seasons["Season 1"][0]["video_source"]["type"],
        "google_drive"
    );
    assert_eq!(written_seasons["Season 2"][0]["episode"], 1);

    assert!(!file_in(&dir, "checkpoint.json").exists());
    let history: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file_in(&dir, "history.json")).unwrap())
            .unwrap();
    assert_eq!(history["categories"][CATEGORY], serde_json::json!(["Dark"]));
}

#[tokio::test]
async fn test_pagination_stops_at_first_page_without_new_shows() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 4, links_page(&[show_href("zeta")]), 0).await;
    mount_category_page(
        &server,
        3,
        links_page(&[show_href("beta"), show_href("alpha")]),
        1,
    )
    .await;
    mount_category_page(&server, 2, links_page(&[show_href("beta")]), 1).await;
    mount_page_expect(
        &server,
        CATEGORY_PATH,
        links_page(&[show_href("gamma"), show_href("alpha")]),
        1,
    )
    .await;

    let config = create_test_config(&server, &dir);
    let mut coordinator = Coordinator::new(config, RunOptions::default()).unwrap();
    let category = coordinator.categories()[0].clone();
    let shows = coordinator.discover_shows(&category).await;

    let names: Vec<&str> = shows.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn test_pagination_respects_page_ceiling() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 3, links_page(&[show_href("show-c")]), 0).await;
    mount_category_page(&server, 2, links_page(&[show_href("show-b")]), 1).await;
    mount_page_expect(&server, CATEGORY_PATH, links_page(&[show_href("show-a")]), 1).await;

    let mut config = create_test_config(&server, &dir);
    config.crawler.max_listing_pages = 2;
    let mut coordinator = Coordinator::new(config, RunOptions::default()).unwrap();
    let category = coordinator.categories()[0].clone();
    let shows = coordinator.discover_shows(&category).await;

    assert_eq!(shows.len(), 2);
    assert_eq!(coordinator.pacer().total_pauses(), 1);
}

#[tokio::test]
async fn test_listing_failure_keeps_earlier_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .and(query_param("pg", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    mount_page_expect(&server, CATEGORY_PATH, links_page(&[show_href("dark")]), 1).await;

    let config = create_test_config(&server, &dir);
    let mut coordinator = Coordinator::new(config, RunOptions::default()).unwrap();
    let category = coordinator.categories()[0].clone();
    let shows = coordinator.discover_shows(&category).await;

    assert_eq!(shows.len(), 1);
    assert_eq!(coordinator.statistics().listing_failures, 1);
}

#[tokio::test]
async fn test_episode_failure_is_soft() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(&server, CATEGORY_PATH, links_page(&[show_href("dark")])).await;
    mount_page(
        &server,
        &show_href("dark"),
        links_page(&[season_href("dark", 1)]),
    )
    .await;
    mount_page(
        &server,
        &season_href("dark", 1),
        links_page(&[
            episode_href("dark", 1, 1),
            episode_href("dark", 1, 2),
            episode_href("dark", 1, 3),
        ]),
    )
    .await;
    mount_page(&server, &episode_href("dark", 1, 1), drive_episode("ok1")).await;
    // Every attempt fails: exactly `episode_retries` requests
    mount_status(&server, &episode_href("dark", 1, 2), 500, 3).await;
    mount_page(
        &server,
        &episode_href("dark", 1, 3),
        "<html><body>Coming soon</body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&server, &dir);
    let outcome = run_crawl(config, RunOptions::default()).await.unwrap();

    let dark = &outcome.results.category(CATEGORY).unwrap()["Dark"];
    let episodes: Vec<u32> = dark.seasons[0].episodes.iter().map(|e| e.episode).collect();
    assert_eq!(episodes, vec![1]);

    let stats = &outcome.statistics;
    assert_eq!(stats.episodes_resolved, 1);
    assert_eq!(stats.episodes_failed, 1);
    assert_eq!(stats.episodes_no_source, 1);
    assert!(stats.failed_episode_urls[0].ends_with("/dark-seasons-1-episode-2/"));
}

#[tokio::test]
async fn test_failed_season_keeps_other_seasons() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(&server, CATEGORY_PATH, links_page(&[show_href("dark")])).await;
    mount_page(
        &server,
        &show_href("dark"),
        links_page(&[season_href("dark", 1), season_href("dark", 2)]),
    )
    .await;
    mount_page(
        &server,
        &season_href("dark", 1),
        links_page(&[episode_href("dark", 1, 1)]),
    )
    .await;
    mount_page(&server, &episode_href("dark", 1, 1), drive_episode("s1e1")).await;
    mount_status(&server, &season_href("dark", 2), 404, 1).await;

    let config = create_test_config(&server, &dir);
    let outcome = run_crawl(config, RunOptions::default()).await.unwrap();

    let dark = &outcome.results.category(CATEGORY).unwrap()["Dark"];
    assert_eq!(dark.episode_count(), 1);
    assert_eq!(dark.seasons.len(), 2);
    assert!(dark.seasons[1].episodes.is_empty());
    assert_eq!(outcome.statistics.listing_failures, 1);
}

struct RecordingUploader {
    requests: Mutex<Vec<UploadRequest>>,
}

impl ArtifactUploader for RecordingUploader {
    fn upload(&self, request: &UploadRequest) -> OutputResult<UploadReceipt> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(UploadReceipt {
            success: true,
            identifier: Some("results-upload".to_string()),
            urls: vec![],
        })
    }
}

#[tokio::test]
async fn test_results_are_handed_to_uploader() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(&server, CATEGORY_PATH, links_page(&[show_href("dark")])).await;
    mount_show(&server, "dark", &[(1, &[1, 2])]).await;

    let uploader = RecordingUploader {
        requests: Mutex::new(Vec::new()),
    };
    let config = create_test_config(&server, &dir);
    let outcome = run_crawl_with_upload(config, RunOptions::default(), &uploader)
        .await
        .unwrap();

    let requests = uploader.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(Some(&requests[0].file_path), outcome.results_path.as_ref());
    assert_eq!(requests[0].metadata["episodes"], "2");
}
