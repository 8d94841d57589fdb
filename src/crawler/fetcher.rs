//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured timeout and user agent
//! - Single-attempt GETs for listing pages
//! - Bounded, constant-delay retries for episode pages
//! - Error classification into network error kinds

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::pacer::{Pacer, PauseKind};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Network failure kinds for a single page fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Transport { url, .. } => url,
        }
    }

    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            Self::Transport {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use reel_ripple::config::{CrawlerConfig, UserAgentConfig};
/// use reel_ripple::crawler::build_http_client;
///
/// let agent = UserAgentConfig {
///     crawler_name: "ReelRipple".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&CrawlerConfig::default(), &agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(crawler.request_timeout_secs);

    Client::builder()
        .user_agent(agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body with a single GET
///
/// Any non-2xx status is a failure; the body of an error page is never
/// handed to the parsers.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))
}

/// Fetches a page, retrying every network failure up to `attempts` times
///
/// Attempts are separated by the pacer's constant retry delay; there is no
/// backoff growth. The error of the final attempt is returned.
pub async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    attempts: u32,
    pacer: &mut Pacer,
) -> Result<String, FetchError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match fetch_page(client, url).await {
            Ok(body) => return Ok(body),
            Err(error) if attempt >= attempts => return Err(error),
            Err(_) => {
                attempt += 1;
                pacer.pause(PauseKind::BeforeRetry).await;
            }
        }
    }
}
