use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory that receives one text file per saved page
pub const DEFAULT_OUTPUT_DIR: &str = "scraped_content";

/// Default delay between requests, in seconds
pub const DEFAULT_DELAY_SECONDS: f64 = 1.0;

/// Longest accepted delay between requests, in seconds (one day)
pub const MAX_DELAY_SECONDS: f64 = 86_400.0;

/// Default ceiling on saved pages per run
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Default per-request timeout, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for a single crawl run
///
/// Every key is optional in the TOML file; missing keys take the defaults
/// above. The base URL normally comes from the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Seed URL; only pages on this site are crawled
    pub base_url: String,

    /// Directory the page files are written to (flat layout)
    pub output_dir: PathBuf,

    /// Minimum spacing between requests, in seconds
    pub delay_seconds: f64,

    /// Maximum number of pages saved in one run
    pub max_pages: usize,

    /// User agent sent with every request and matched against robots.txt groups
    pub user_agent: String,

    /// Timeout for each HTTP request, in seconds
    pub request_timeout_secs: u64,

    /// Append a slug of the page title to each file stem
    pub title_in_filename: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            delay_seconds: DEFAULT_DELAY_SECONDS,
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: default_user_agent(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            title_in_filename: false,
        }
    }
}

impl CrawlConfig {
    /// Creates a configuration for `base_url` with every other setting defaulted
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Configured delay as a `Duration`
    ///
    /// Out-of-range values are clamped to `0..=MAX_DELAY_SECONDS`; NaN
    /// becomes zero.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds.clamp(0.0, MAX_DELAY_SECONDS))
            .unwrap_or_default()
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_user_agent() -> String {
    format!("site-scraper/{}", env!("CARGO_PKG_VERSION"))
}
