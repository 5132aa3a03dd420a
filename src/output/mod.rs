//! Output module for page files and the run summary
//!
//! This module handles:
//! - Deriving unique file names for saved pages
//! - Writing one text file per page
//! - Recording and printing the crawl summary

mod naming;
mod summary;
mod writer;

pub use naming::{derive_stem, NameAllocator};
pub use summary::{
    print_summary, CrawlSummary, PageError, PageErrorKind, SavedPage, SkipReason, SkippedUrl,
};
pub use writer::{format_page, TextFileWriter};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
