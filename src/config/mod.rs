//! Configuration module for the site scraper
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then command-line overrides. The result is validated once.
//!
//! # Example
//!
//! ```no_run
//! use site_scraper::config::{load_config, ConfigOverrides};
//!
//! let overrides = ConfigOverrides {
//!     base_url: Some("https://example.com".to_string()),
//!     ..Default::default()
//! };
//! let config = load_config(None, overrides).unwrap();
//! println!("Saving at most {} pages", config.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    CrawlConfig, DEFAULT_DELAY_SECONDS, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT_DIR,
    DEFAULT_REQUEST_TIMEOUT_SECS, MAX_DELAY_SECONDS,
};

pub use parser::{load_config, read_config_file, ConfigOverrides};
pub use validation::{parse_base_url, validate};
