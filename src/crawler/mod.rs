//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` seam
//! - HTML title, text and link extraction
//! - The breadth-first frontier and request pacing
//! - Overall crawl control

mod controller;
mod extract;
mod fetcher;
mod frontier;
mod pacer;

pub use controller::CrawlController;
pub use extract::{parse_html, ContentExtractor, ExtractError, ExtractedPage, HtmlExtractor};
pub use fetcher::{build_http_client, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::Frontier;
pub use pacer::Pacer;

use crate::config::CrawlConfig;
use crate::output::CrawlSummary;
use crate::ScraperError;
use url::Url;

/// Content of one fetched page, ready to be saved
#[derive(Debug, Clone)]
pub struct PageResult {
    /// The URL that was requested
    pub url: Url,
    /// Document title, if any
    pub title: Option<String>,
    /// Visible text
    pub text: String,
    /// Absolute, normalized links found on the page
    pub links: Vec<Url>,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Create the output directory
/// 3. Load robots.txt
/// 4. Fetch, extract and save pages breadth-first
/// 5. Return the run summary
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The crawl ran; per-page failures are in the summary
/// * `Err(ScraperError)` - The crawl could not start
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlSummary, ScraperError> {
    let controller = CrawlController::new(config)?;
    controller.run().await
}
