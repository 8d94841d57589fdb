use serde::Deserialize;

/// Main configuration structure for Reel-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// Which shows of a category are worth visiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlMode {
    /// Skip shows already recorded in the extraction history
    #[default]
    SkipExtracted,
    /// Skip shows the external catalog already knows about
    MissingOnly,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts made for each episode page before giving up
    #[serde(default = "default_episode_retries")]
    pub episode_retries: u32,

    /// Constant delay between episode fetch attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Delay between two episode fetches (milliseconds)
    #[serde(default = "default_episode_delay_ms")]
    pub episode_delay_ms: u64,

    /// Delay between two shows (milliseconds)
    #[serde(default = "default_show_delay_ms")]
    pub show_delay_ms: u64,

    /// Delay between two category listing pages (milliseconds)
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Safety ceiling for category pagination
    #[serde(default = "default_max_listing_pages")]
    pub max_listing_pages: u32,

    /// Query parameter carrying the listing page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    #[serde(default)]
    pub mode: CrawlMode,

    /// Re-extract shows even when the catalog or history knows them
    #[serde(default)]
    pub force: bool,
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_episode_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_episode_delay_ms() -> u64 {
    2000
}

fn default_show_delay_ms() -> u64 {
    4000
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_max_listing_pages() -> u32 {
    100
}

fn default_page_param() -> String {
    "pg".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            episode_retries: default_episode_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            episode_delay_ms: default_episode_delay_ms(),
            show_delay_ms: default_show_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
            max_listing_pages: default_max_listing_pages(),
            page_param: default_page_param(),
            mode: CrawlMode::default(),
            force: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where the final nested results are written
    pub results_path: String,

    /// In-flight progress, deleted once every category finishes
    pub checkpoint_path: String,

    /// Shows already extracted, kept across runs
    pub history_path: String,
}

/// External catalog snapshot location
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub path: String,
}

/// A category listing to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    pub url: String,
}
