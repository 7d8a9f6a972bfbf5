use serde::Deserialize;

/// Thread crawled when no seed is configured
pub const DEFAULT_SEED: &str = "https://bitcointalk.org/index.php?topic=3809457.00";

/// Output path that selects stdout
pub const STDOUT_PATH: &str = "-";

/// Main configuration structure for Threadwalk
///
/// Every section is optional; missing sections fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First page of each thread to walk
    pub seeds: Vec<String>,

    /// Maximum number of pages to fetch (0 = until pagination is exhausted)
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Minimum time between consecutive requests (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seeds: vec![DEFAULT_SEED.to_string()],
            max_pages: 0,
            request_delay: 1000,
            request_timeout: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
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

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "threadwalk".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/threadwalk".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON Lines file, or "-" for stdout
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "posts.jsonl".to_string(),
        }
    }
}

impl OutputConfig {
    /// True when records go to stdout
    pub fn is_stdout(&self) -> bool {
        self.path == STDOUT_PATH
    }
}
