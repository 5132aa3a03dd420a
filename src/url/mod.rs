//! URL handling module for the site scraper
//!
//! This module provides URL normalization, site-domain extraction and the
//! same-site / denylist filter applied to every discovered link.

mod domain;
mod filter;
mod normalize;

pub use domain::{robots_url, site_domain};
pub use filter::{FilterRejection, UrlFilter, DENIED_EXTENSIONS, DENIED_PATH_SEGMENTS};
pub use normalize::{normalize_url, resolve_url};
