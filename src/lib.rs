//! Site Scraper: a polite single-site text scraper
//!
//! This crate crawls one website breadth-first, starting from a base URL,
//! and saves the visible text of every HTML page it reaches as a plain text
//! file. It stays on the starting site, respects robots.txt and spaces its
//! requests out.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fatal scraper failures
///
/// Anything that goes wrong with a single page is recorded in the
/// `CrawlSummary` instead; these errors stop the run before it starts.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: output::OutputError,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{run_crawl, CrawlController};
pub use output::CrawlSummary;
pub use crate::url::{normalize_url, UrlFilter};
