//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the reqwest client with user agent and timeout
//! - The `PageFetcher` seam the controller and robots loader use
//! - Classifying transport failures

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Content types treated as HTML pages
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// A completed HTTP exchange, whatever its status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, if present
    pub content_type: Option<String>,
    /// Response body decoded as text
    pub body: String,
}

impl FetchedPage {
    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the Content-Type names an HTML document
    ///
    /// A missing header is not HTML.
    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().map_or(false, |value| {
            let value = value.to_ascii_lowercase();
            HTML_CONTENT_TYPES.iter().any(|html| value.contains(html))
        })
    }
}

/// Transport-level failure; the request produced no response
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },
}

/// Performs HTTP GET requests on behalf of the crawler
///
/// Implementations must not fail for non-success statuses; those come
/// back as a `FetchedPage` so the caller decides what they mean.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// `PageFetcher` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        build_http_client(user_agent, timeout).map(Self::new)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent string sent with every request
/// * `timeout` - Whole-request timeout; expiry is reported as a fetch error
///
/// # Example
///
/// ```no_run
/// use site_scraper::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("site-scraper/1.0", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            body,
        })
    }
}

fn classify_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
