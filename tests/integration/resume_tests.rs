//! Resuming from checkpoints and skipping through history

use crate::support::*;
use reel_ripple::crawler::{run_crawl, Coordinator, RunOptions};
use reel_ripple::model::{CrawlResults, ShowResult};
use reel_ripple::output::{OutputError, OutputResult, ResultSink};
use reel_ripple::storage::{JsonFileStore, StateStore, StorageError, StorageResult};
use reel_ripple::{CheckpointState, HistoryIndex};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::MockServer;

fn store_for(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::new(
        file_in(dir, "checkpoint.json"),
        file_in(dir, "history.json"),
    )
}

#[tokio::test]
async fn test_resume_continues_at_saved_index() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let slugs = [
        "show-a", "show-b", "show-c", "show-d", "show-e", "show-f", "show-g", "show-h", "show-i",
    ];
    let hrefs: Vec<String> = slugs.iter().map(|slug| show_href(slug)).collect();
    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(&server, CATEGORY_PATH, links_page(&hrefs)).await;

    // Everything before the saved position must not be fetched again
    for slug in &slugs[..7] {
        mount_page_expect(&server, &show_href(slug), links_page(&[]), 0).await;
    }
    mount_show(&server, "show-h", &[(1, &[1])]).await;
    mount_show(&server, "show-i", &[(1, &[1, 2])]).await;

    let mut saved = CheckpointState::new(None);
    saved.advance(CATEGORY, 7);
    store_for(&dir).save_checkpoint(&saved).unwrap();

    let config = create_test_config(&server, &dir);
    let outcome = run_crawl(config, RunOptions::default()).await.unwrap();

    assert_eq!(outcome.statistics.shows_skipped_resume, 7);
    assert_eq!(outcome.statistics.shows_extracted, 2);

    let names: Vec<&String> = outcome.results.category(CATEGORY).unwrap().keys().collect();
    assert_eq!(names, vec!["Show H", "Show I"]);
    assert_eq!(outcome.results.episode_count(), 3);
    assert!(!file_in(&dir, "checkpoint.json").exists());
}

#[tokio::test]
async fn test_checkpoint_results_are_kept_and_not_refetched() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(
        &server,
        CATEGORY_PATH,
        links_page(&[show_href("dark"), show_href("lost")]),
    )
    .await;
    mount_page_expect(&server, &show_href("dark"), links_page(&[]), 0).await;
    mount_show(&server, "lost", &[(1, &[1])]).await;

    // Interrupted before the index moved past Dark
    let mut saved = CheckpointState::new(None);
    saved.results.insert_show(
        CATEGORY,
        "Dark",
        ShowResult::new(format!("{}{}", server.uri(), show_href("dark"))),
    );
    store_for(&dir).save_checkpoint(&saved).unwrap();

    let config = create_test_config(&server, &dir);
    let options = RunOptions {
        force: true,
        ..RunOptions::default()
    };
    let outcome = run_crawl(config, options).await.unwrap();

    assert_eq!(outcome.statistics.shows_skipped_results, 1);
    assert!(outcome.results.contains_show(CATEGORY, "Dark"));
    assert!(outcome.results.contains_show(CATEGORY, "Lost"));
}

#[tokio::test]
async fn test_history_skips_extracted_shows() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(
        &server,
        CATEGORY_PATH,
        links_page(&[show_href("dark"), show_href("lost")]),
    )
    .await;
    mount_page_expect(&server, &show_href("dark"), links_page(&[]), 0).await;
    mount_show(&server, "lost", &[(1, &[1])]).await;

    let mut history = HistoryIndex::new();
    history.mark(CATEGORY, "Dark");
    store_for(&dir).save_history(&history).unwrap();

    let config = create_test_config(&server, &dir);
    let outcome = run_crawl(config, RunOptions::default()).await.unwrap();

    assert_eq!(outcome.statistics.shows_skipped_history, 1);
    assert!(!outcome.results.contains_show(CATEGORY, "Dark"));
    assert!(outcome.results.contains_show(CATEGORY, "Lost"));

    let history = store_for(&dir).load_history().unwrap();
    assert!(history.contains(CATEGORY, "Dark"));
    assert!(history.contains(CATEGORY, "Lost"));
}

#[tokio::test]
async fn test_force_extracts_shows_in_history() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(&server, CATEGORY_PATH, links_page(&[show_href("dark")])).await;
    mount_show(&server, "dark", &[(1, &[1, 2]), (2, &[1])]).await;

    let mut history = HistoryIndex::new();
    history.mark(CATEGORY, "Dark");
    store_for(&dir).save_history(&history).unwrap();

    let config = create_test_config(&server, &dir);
    let options = RunOptions {
        force: true,
        ..RunOptions::default()
    };
    let outcome = run_crawl(config, options).await.unwrap();

    assert_eq!(outcome.statistics.shows_skipped(), 0);
    assert_eq!(outcome.statistics.shows_extracted, 1);
    assert_eq!(outcome.results.episode_count(), 3);
}

#[tokio::test]
async fn test_completed_categories_are_not_listed_again() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page_expect(&server, CATEGORY_PATH, links_page(&[]), 0).await;

    let mut saved = CheckpointState::new(None);
    saved
        .results
        .insert_show(CATEGORY, "Dark", ShowResult::new("https://site.test/dark-online-hd/"));
    saved.finish_category(CATEGORY);
    store_for(&dir).save_checkpoint(&saved).unwrap();

    let config = create_test_config(&server, &dir);
    let outcome = run_crawl(config, RunOptions::default()).await.unwrap();

    assert_eq!(outcome.statistics.categories_resumed_complete, 1);
    assert_eq!(outcome.statistics.categories_processed, 0);
    assert!(outcome.results.contains_show(CATEGORY, "Dark"));
    assert!(outcome.results_path.is_some());
    assert!(!file_in(&dir, "checkpoint.json").exists());
}

struct FailingSink;

impl ResultSink for FailingSink {
    fn write(&mut self, _results: &CrawlResults) -> OutputResult<()> {
        Err(OutputError::Write {
            path: PathBuf::from("/unwritable/results.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn location(&self) -> Option<&Path> {
        None
    }
}

#[tokio::test]
async fn test_checkpoint_survives_failed_results_write() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(&server, CATEGORY_PATH, links_page(&[show_href("dark")])).await;
    mount_show(&server, "dark", &[(1, &[1])]).await;

    let config = create_test_config(&server, &dir);
    let mut coordinator = Coordinator::with_parts(
        config,
        RunOptions::default(),
        Box::new(store_for(&dir)),
        Box::new(FailingSink),
    )
    .unwrap();
    let outcome = coordinator.run().await;

    assert!(outcome.results_path.is_none());
    assert_eq!(outcome.statistics.shows_extracted, 1);

    let checkpoint = store_for(&dir)
        .load_checkpoint()
        .unwrap()
        .expect("checkpoint kept");
    assert!(checkpoint.results.contains_show(CATEGORY, "Dark"));
    assert!(checkpoint.is_category_complete(CATEGORY));
}

/// Loads nothing and fails every write, counting the attempts
struct UnwritableStore {
    failed_writes: Arc<Mutex<u32>>,
}

impl UnwritableStore {
    fn fail(&self, what: &str) -> StorageError {
        *self.failed_writes.lock().unwrap() += 1;
        StorageError::Io {
            path: PathBuf::from(format!("/read-only/{}.json", what)),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
    }
}

impl StateStore for UnwritableStore {
    fn load_checkpoint(&self) -> StorageResult<Option<CheckpointState>> {
        Ok(None)
    }

    fn save_checkpoint(&mut self, _checkpoint: &CheckpointState) -> StorageResult<()> {
        Err(self.fail("checkpoint"))
    }

    fn clear_checkpoint(&mut self) -> StorageResult<()> {
        Err(self.fail("checkpoint"))
    }

    fn load_history(&self) -> StorageResult<HistoryIndex> {
        Ok(HistoryIndex::new())
    }

    fn save_history(&mut self, _history: &HistoryIndex) -> StorageResult<()> {
        Err(self.fail("history"))
    }
}

#[tokio::test]
async fn test_state_write_failures_do_not_stop_the_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_category_page(&server, 2, links_page(&[]), 1).await;
    mount_page(
        &server,
        CATEGORY_PATH,
        links_page(&[show_href("dark"), show_href("lost")]),
    )
    .await;
    mount_show(&server, "dark", &[(1, &[1, 2])]).await;
    mount_show(&server, "lost", &[(1, &[1])]).await;

    let failed_writes = Arc::new(Mutex::new(0));
    let store = UnwritableStore {
        failed_writes: Arc::clone(&failed_writes),
    };
    let config = create_test_config(&server, &dir);
    let sink = reel_ripple::output::JsonResultSink::new(&config.output.results_path);
    let mut coordinator =
        Coordinator::with_parts(config, RunOptions::default(), Box::new(store), Box::new(sink))
            .unwrap();
    let outcome = coordinator.run().await;

    assert_eq!(outcome.statistics.shows_extracted, 2);
    assert_eq!(outcome.results.episode_count(), 3);
    assert!(outcome.results_path.is_some());
    assert!(file_in(&dir, "results.json").exists());
    assert!(coordinator.history().contains(CATEGORY, "Lost"));

    // Checkpoint after each show and at the category end, history after each
    // show, then the checkpoint removal
    assert_eq!(*failed_writes.lock().unwrap(), 3 + 2 + 1);
}
