//! Crawl controller - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Loading robots.txt once at start
//! - Draining the breadth-first frontier
//! - Applying robots.txt and the URL filter to every dequeued URL
//! - Pacing, fetching, extracting and saving pages
//! - Enqueueing newly discovered links
//!
//! One URL is processed at a time, so crawl order is deterministic and the
//! pacing is a simple sequential delay.

use crate::config::{parse_base_url, validate, CrawlConfig};
use crate::crawler::extract::{ContentExtractor, HtmlExtractor};
use crate::crawler::fetcher::{FetchedPage, HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::pacer::Pacer;
use crate::crawler::PageResult;
use crate::output::{CrawlSummary, PageErrorKind, SkipReason, TextFileWriter};
use crate::robots::{effective_delay, load_rules, PolitenessRules};
use crate::url::{normalize_url, resolve_url, site_domain, UrlFilter};
use crate::ScraperError;
use std::collections::HashSet;
use std::time::Instant;
use url::Url;

/// Drives one crawl of a single site
pub struct CrawlController<F = HttpFetcher, E = HtmlExtractor> {
    config: CrawlConfig,
    base_url: Url,
    filter: UrlFilter,
    fetcher: F,
    extractor: E,
}

/// Mutable state of one run, owned by `CrawlController::run`
struct RunState {
    rules: PolitenessRules,
    frontier: Frontier,
    /// URLs already taken off the frontier
    processed: HashSet<String>,
    /// Discovered links refused by the filter, so each is reported once
    rejected: HashSet<String>,
    pacer: Pacer,
    writer: TextFileWriter,
    summary: CrawlSummary,
}

impl CrawlController<HttpFetcher, HtmlExtractor> {
    /// Creates a controller that fetches over HTTP and parses HTML
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlController)` - Configuration is valid and the client was built
    /// * `Err(ScraperError)` - Invalid configuration or base URL
    pub fn new(config: CrawlConfig) -> Result<Self, ScraperError> {
        let fetcher = HttpFetcher::with_settings(&config.user_agent, config.request_timeout())?;
        Self::with_components(config, fetcher, HtmlExtractor)
    }
}

impl<F, E> CrawlController<F, E>
where
    F: PageFetcher,
    E: ContentExtractor,
{
    /// Creates a controller with explicit fetcher and extractor
    pub fn with_components(config: CrawlConfig, fetcher: F, extractor: E) -> Result<Self, ScraperError> {
        validate(&config)?;

        let parsed = parse_base_url(&config.base_url)?;
        let base_url = normalize_url(parsed.as_str()).map_err(|e| ScraperError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let filter = UrlFilter::for_base_url(&base_url).ok_or_else(|| ScraperError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: "no host".to_string(),
        })?;

        Ok(Self {
            config,
            base_url,
            filter,
            fetcher,
            extractor,
        })
    }

    /// Returns the normalized seed URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs the crawl to completion
    ///
    /// The loop ends when the frontier is empty or `max_pages` pages have
    /// been saved, whichever comes first. Per-page problems are recorded in
    /// the summary; only setup failures are returned as errors.
    pub async fn run(&self) -> Result<CrawlSummary, ScraperError> {
        let writer = TextFileWriter::create(&self.config.output_dir, self.config.title_in_filename)
            .map_err(|source| ScraperError::OutputDir {
                path: self.config.output_dir.clone(),
                source,
            })?;

        tracing::info!("Starting to scrape: {}", self.base_url);
        tracing::info!("Output directory: {}", self.config.output_dir.display());
        tracing::info!("Max pages: {}", self.config.max_pages);

        let mut summary = CrawlSummary::start();

        let robots = load_rules(&self.fetcher, &self.base_url, &self.config.user_agent).await;
        summary.robots_available = robots.was_available;

        let delay = effective_delay(&robots.rules, self.config.delay());
        if delay > self.config.delay() {
            tracing::info!("robots.txt crawl-delay raises request spacing to {:?}", delay);
        }
        let mut pacer = Pacer::new(delay);
        // The robots.txt request counts toward pacing
        pacer.record_fetch_end(Instant::now());

        let mut state = RunState {
            rules: robots.rules,
            frontier: Frontier::with_seed(self.base_url.clone()),
            processed: HashSet::new(),
            rejected: HashSet::new(),
            pacer,
            writer,
            summary,
        };

        let start_time = Instant::now();

        while state.summary.pages_saved < self.config.max_pages {
            let Some(url) = state.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if !state.processed.insert(url.as_str().to_string()) {
                continue;
            }

            let saved_before = state.summary.pages_saved;
            self.process_url(&url, &mut state).await;

            if state.summary.pages_saved > saved_before && state.summary.pages_saved % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages saved, {} in frontier, {:.1}s elapsed",
                    state.summary.pages_saved,
                    state.frontier.len(),
                    start_time.elapsed().as_secs_f64()
                );
            }
        }

        if state.summary.pages_saved >= self.config.max_pages && !state.frontier.is_empty() {
            tracing::info!(
                "Reached max pages ({}), {} URLs left in frontier",
                self.config.max_pages,
                state.frontier.len()
            );
        }

        let mut summary = state.summary;
        summary.finish();

        tracing::info!(
            "Scraping completed. Saved {} pages, skipped {}, {} errors in {:?}",
            summary.pages_saved,
            summary.pages_skipped,
            summary.errors.len(),
            start_time.elapsed()
        );

        Ok(summary)
    }

    /// Processes a single dequeued URL
    ///
    /// This method:
    /// 1. Checks robots.txt and the URL filter
    /// 2. Waits for the pacing delay and fetches the page
    /// 3. Extracts title, text and links
    /// 4. Saves the page file
    /// 5. Enqueues unseen links that pass the filter
    async fn process_url(&self, url: &Url, state: &mut RunState) {
        let url_str = url.as_str();

        if let Some(rule) = state.rules.matching_rule(url) {
            tracing::info!("Robots.txt disallows: {}", url_str);
            let rule = rule.to_string();
            state
                .summary
                .record_skip(url_str, SkipReason::RobotsDisallowed { rule });
            return;
        }

        if let Err(rejection) = self.filter.check(url) {
            tracing::debug!("Filtered {}: {}", url_str, rejection);
            state.summary.record_skip(url_str, rejection.into());
            return;
        }

        state.pacer.wait().await;
        let response = self.fetcher.get(url).await;
        state.pacer.record_fetch_end(Instant::now());

        let page = match response {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Request error for {}: {}", url_str, e);
                state
                    .summary
                    .record_error(url_str, PageErrorKind::Fetch, e.to_string());
                return;
            }
        };

        let Some(page) = self.check_response(url, page, state) else {
            return;
        };

        let extracted = match self.extractor.extract(&page.body, &page.final_url) {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::warn!("Extraction error for {}: {}", url_str, e);
                state
                    .summary
                    .record_error(url_str, PageErrorKind::Extraction, e.to_string());
                return;
            }
        };

        // Empty text is still saved
        let result = PageResult {
            url: url.clone(),
            title: extracted.title,
            text: extracted.text,
            links: extracted
                .links
                .iter()
                .filter_map(|link| resolve_url(&page.final_url, link).ok())
                .collect(),
        };

        match state.writer.save(&result) {
            Ok(path) => state
                .summary
                .record_saved(url_str, result.title.as_deref(), path),
            Err(e) => {
                tracing::error!("Error saving {}: {}", url_str, e);
                state
                    .summary
                    .record_error(url_str, PageErrorKind::Write, e.to_string());
            }
        }

        let new_links = self.enqueue_links(&result.links, state);
        tracing::info!("Scraped: {} (found {} new links)", url_str, new_links);
    }

    /// Applies status, redirect and content-type checks to a response
    ///
    /// Returns the page when it should be extracted; otherwise records the
    /// error or skip and returns None.
    fn check_response(&self, url: &Url, page: FetchedPage, state: &mut RunState) -> Option<FetchedPage> {
        let url_str = url.as_str();

        if !page.is_success() {
            tracing::warn!("HTTP {} for {}", page.status, url_str);
            state.summary.record_error(
                url_str,
                PageErrorKind::HttpStatus(page.status),
                format!("HTTP {}", page.status),
            );
            return None;
        }

        if site_domain(&page.final_url).as_deref() != Some(self.filter.base_domain()) {
            tracing::info!("Redirected off-site: {} -> {}", url_str, page.final_url);
            state.summary.record_skip(
                url_str,
                SkipReason::RedirectedOffSite {
                    final_url: page.final_url.to_string(),
                },
            );
            return None;
        }

        if !page.is_html() {
            tracing::info!("Skipping non-HTML content: {}", url_str);
            state.summary.record_skip(
                url_str,
                SkipReason::NotHtml {
                    content_type: page.content_type,
                },
            );
            return None;
        }

        Some(page)
    }

    /// Enqueues unseen links that pass the filter
    ///
    /// Links are marked visited as they are enqueued. Rejected links are
    /// recorded as skipped once and never fetched.
    ///
    /// # Returns
    ///
    /// The number of newly enqueued links
    fn enqueue_links(&self, links: &[Url], state: &mut RunState) -> usize {
        let mut added = 0;

        for link in links {
            if state.frontier.is_visited(link) || state.rejected.contains(link.as_str()) {
                continue;
            }

            match self.filter.check(link) {
                Ok(()) => {
                    if state.frontier.push(link.clone()) {
                        added += 1;
                    }
                }
                Err(rejection) => {
                    tracing::debug!("Not following {}: {}", link, rejection);
                    state.rejected.insert(link.as_str().to_string());
                    state.summary.record_skip(link.as_str(), rejection.into());
                }
            }
        }

        added
    }
}
