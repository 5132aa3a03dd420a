//! Robots.txt handling module
//!
//! This module fetches and parses the site's robots.txt once per run and
//! answers the two politeness questions the crawler asks: may this URL be
//! fetched, and how long must we wait between requests.

mod parser;

pub use parser::{PathRule, PolitenessRules, MAX_CRAWL_DELAY};

use crate::crawler::PageFetcher;
use crate::url::robots_url;
use std::time::Duration;
use url::Url;

/// Outcome of loading robots.txt
///
/// `was_available` separates "no robots.txt could be read" from "robots.txt
/// was read and is empty"; in both cases `rules` may be permissive.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotsLoad {
    /// Rules that apply to this crawler
    pub rules: PolitenessRules,
    /// Whether a robots.txt was actually fetched and parsed
    pub was_available: bool,
}

impl RobotsLoad {
    /// Permissive fallback used when robots.txt is unavailable
    pub fn unavailable() -> Self {
        Self {
            rules: PolitenessRules::allow_all(),
            was_available: false,
        }
    }
}

/// Fetches robots.txt for the site serving `base_url`
///
/// Best effort: a network error, a non-success status or a missing host
/// all fall back to allow-all rules. This never fails.
///
/// # Arguments
///
/// * `fetcher` - The fetcher used for every request of the run
/// * `base_url` - Any URL on the site; only scheme, host and port are used
/// * `user_agent` - The user agent whose group should be applied
pub async fn load_rules<F>(fetcher: &F, base_url: &Url, user_agent: &str) -> RobotsLoad
where
    F: PageFetcher + ?Sized,
{
    let Some(location) = robots_url(base_url) else {
        tracing::warn!("Cannot derive robots.txt location from {}", base_url);
        return RobotsLoad::unavailable();
    };

    match fetcher.get(&location).await {
        Ok(response) if response.is_success() => {
            let rules = PolitenessRules::parse(&response.body, user_agent);
            tracing::info!(
                "Loaded robots.txt from {} ({} disallow rules, crawl-delay {:?})",
                location,
                rules.disallowed().len(),
                rules.crawl_delay()
            );
            RobotsLoad {
                rules,
                was_available: true,
            }
        }
        Ok(response) => {
            tracing::info!(
                "No robots.txt at {} (HTTP {}), allowing all",
                location,
                response.status
            );
            RobotsLoad::unavailable()
        }
        Err(e) => {
            tracing::warn!("Could not load robots.txt: {}", e);
            RobotsLoad::unavailable()
        }
    }
}

/// Checks if a URL is allowed by the rules
pub fn is_allowed(rules: &PolitenessRules, url: &Url) -> bool {
    rules.is_allowed(url)
}

/// Calculates the spacing to keep between requests
///
/// This takes the maximum of the configured delay and the robots.txt
/// crawl delay: the site can raise the spacing but never lower it.
pub fn effective_delay(rules: &PolitenessRules, configured: Duration) -> Duration {
    rules
        .crawl_delay()
        .map_or(configured, |site| site.max(configured))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{FetchError, FetchedPage};
    use async_trait::async_trait;

    struct StaticFetcher {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            assert_eq!(url.path(), "/robots.txt");
            Ok(FetchedPage {
                final_url: url.clone(),
                status: self.status,
                content_type: Some("text/plain".to_string()),
                body: self.body.to_string(),
            })
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl PageFetcher for FailingFetcher {
        async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            Err(FetchError::Connect {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn base() -> Url {
        Url::parse("https://example.com/docs/start").unwrap()
    }

    #[test]
    fn test_effective_delay_uses_config() {
        let rules = PolitenessRules::allow_all();
        assert_eq!(
            effective_delay(&rules, Duration::from_secs(1)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_effective_delay_robots_larger() {
        let rules = PolitenessRules::new(vec![], Some(Duration::from_secs(5)));
        assert_eq!(
            effective_delay(&rules, Duration::from_secs(1)),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_effective_delay_robots_smaller_than_config() {
        let rules = PolitenessRules::new(vec![], Some(Duration::from_millis(500)));
        assert_eq!(
            effective_delay(&rules, Duration::from_secs(1)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_is_allowed_delegates() {
        let rules = PolitenessRules::new(vec!["/admin".to_string()], None);
        assert!(!is_allowed(&rules, &Url::parse("https://example.com/admin/x").unwrap()));
        assert!(is_allowed(&rules, &Url::parse("https://example.com/docs").unwrap()));
    }

    #[tokio::test]
    async fn test_load_rules_available() {
        let fetcher = StaticFetcher {
            status: 200,
            body: "User-agent: *\nDisallow: /private\nCrawl-delay: 2",
        };
        let load = load_rules(&fetcher, &base(), "TestBot").await;
        assert!(load.was_available);
        assert_eq!(load.rules.disallowed(), vec!["/private"]);
        assert_eq!(load.rules.crawl_delay(), Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_load_rules_empty_file_is_available() {
        let fetcher = StaticFetcher {
            status: 200,
            body: "",
        };
        let load = load_rules(&fetcher, &base(), "TestBot").await;
        assert!(load.was_available);
        assert!(load.rules.is_permissive());
    }

    #[tokio::test]
    async fn test_load_rules_missing_file() {
        let fetcher = StaticFetcher {
            status: 404,
            body: "not found",
        };
        let load = load_rules(&fetcher, &base(), "TestBot").await;
        assert_eq!(load, RobotsLoad::unavailable());
    }

    #[tokio::test]
    async fn test_load_rules_survives_absurd_crawl_delay() {
        let fetcher = StaticFetcher {
            status: 200,
            body: "User-agent: *\nCrawl-delay: 1e30\nAllow: /private/open\nDisallow: /private",
        };
        let load = load_rules(&fetcher, &base(), "TestBot").await;
        assert!(load.was_available);
        assert_eq!(load.rules.crawl_delay(), None);
        assert!(load
            .rules
            .is_allowed(&Url::parse("https://example.com/private/open/a").unwrap()));
        assert!(!load
            .rules
            .is_allowed(&Url::parse("https://example.com/private/b").unwrap()));
    }

    #[tokio::test]
    async fn test_load_rules_network_error() {
        let load = load_rules(&FailingFetcher, &base(), "TestBot").await;
        assert!(!load.was_available);
        assert!(load.rules.is_permissive());
    }
}
