//! Run summary
//!
//! Collects what happened to every URL the crawler touched and prints the
//! final report.

use crate::url::FilterRejection;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Why a URL was not fetched or not saved
///
/// These are policy decisions, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Refused by the same-site / denylist filter
    Filtered(FilterRejection),
    /// Matches a robots.txt disallow prefix
    RobotsDisallowed { rule: String },
    /// Response was not an HTML document
    NotHtml { content_type: Option<String> },
    /// A redirect led off the site
    RedirectedOffSite { final_url: String },
}

impl From<FilterRejection> for SkipReason {
    fn from(rejection: FilterRejection) -> Self {
        Self::Filtered(rejection)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filtered(rejection) => write!(f, "{}", rejection),
            Self::RobotsDisallowed { rule } => write!(f, "disallowed by robots.txt ({})", rule),
            Self::NotHtml { content_type } => write!(
                f,
                "not HTML ({})",
                content_type.as_deref().unwrap_or("no content type")
            ),
            Self::RedirectedOffSite { final_url } => {
                write!(f, "redirected off-site to {}", final_url)
            }
        }
    }
}

/// Category of a per-page failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageErrorKind {
    /// Timeout, connection failure or unreadable body
    Fetch,
    /// The server answered with a non-success status
    HttpStatus(u16),
    /// The document could not be turned into content
    Extraction,
    /// The page file could not be written
    Write,
}

impl fmt::Display for PageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::HttpStatus(status) => write!(f, "HTTP {}", status),
            Self::Extraction => write!(f, "extraction"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// A URL that failed; the crawl continued past it
#[derive(Debug, Clone)]
pub struct PageError {
    pub url: String,
    pub kind: PageErrorKind,
    pub message: String,
}

/// A URL that was skipped by policy
#[derive(Debug, Clone)]
pub struct SkippedUrl {
    pub url: String,
    pub reason: SkipReason,
}

/// A page written to disk
#[derive(Debug, Clone)]
pub struct SavedPage {
    pub url: String,
    pub title: Option<String>,
    pub path: PathBuf,
}

/// Result of a non-fatal crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Number of page files written
    pub pages_saved: usize,

    /// Number of URLs skipped by policy
    pub pages_skipped: usize,

    /// Saved pages, in crawl order
    pub saved: Vec<SavedPage>,

    /// Skipped URLs, each recorded once
    pub skipped: Vec<SkippedUrl>,

    /// Per-page failures
    pub errors: Vec<PageError>,

    /// Whether robots.txt was fetched and parsed
    pub robots_available: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlSummary {
    /// Creates an empty summary stamped with the current time
    pub fn start() -> Self {
        Self {
            pages_saved: 0,
            pages_skipped: 0,
            saved: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            robots_available: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_saved(&mut self, url: &str, title: Option<&str>, path: PathBuf) {
        self.pages_saved += 1;
        self.saved.push(SavedPage {
            url: url.to_string(),
            title: title.map(str::to_string),
            path,
        });
    }

    pub fn record_skip(&mut self, url: &str, reason: SkipReason) {
        self.pages_skipped += 1;
        self.skipped.push(SkippedUrl {
            url: url.to_string(),
            reason,
        });
    }

    pub fn record_error(&mut self, url: &str, kind: PageErrorKind, message: impl Into<String>) {
        self.errors.push(PageError {
            url: url.to_string(),
            kind,
            message: message.into(),
        });
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Skip entry for the URL, if it was skipped
    pub fn skip_reason(&self, url: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|skipped| skipped.url == url)
            .map(|skipped| &skipped.reason)
    }

    /// Returns true if the URL appears among the errors
    pub fn has_error(&self, url: &str) -> bool {
        self.errors.iter().any(|error| error.url == url)
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Pages saved: {}", summary.pages_saved);
    println!("  Pages skipped: {}", summary.pages_skipped);
    println!("  Errors: {}", summary.errors.len());
    println!(
        "  robots.txt: {}",
        if summary.robots_available {
            "loaded"
        } else {
            "unavailable (allowing all)"
        }
    );
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {:.1}s", seconds);
    }
    println!();

    if !summary.errors.is_empty() {
        println!("Errors:");
        for error in &summary.errors {
            println!("  [{}] {}: {}", error.kind, error.url, error.message);
        }
        println!();
    }

    if !summary.skipped.is_empty() {
        println!("Skipped:");
        for skipped in &summary.skipped {
            println!("  {} ({})", skipped.url, skipped.reason);
        }
        println!();
    }

    if let Some(first) = summary.saved.first() {
        if let Some(dir) = first.path.parent() {
            println!("Files saved in: {}", dir.display());
        }
    }
}
