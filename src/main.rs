//! Site Scraper main entry point
//!
//! This is the command-line interface for the single-site text scraper.

use clap::Parser;
use site_scraper::config::{load_config, ConfigOverrides, CrawlConfig};
use site_scraper::crawler::run_crawl;
use site_scraper::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site Scraper: save the text of every page on one website
///
/// Starting from the base URL, the scraper follows links on the same site
/// breadth-first, respects robots.txt and writes one text file per page.
#[derive(Parser, Debug)]
#[command(name = "site-scraper")]
#[command(version)]
#[command(about = "Scrape website content to text files", long_about = None)]
struct Cli {
    /// Base URL to start crawling from (https:// is assumed if missing)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Output directory for page files [default: scraped_content]
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Delay between requests in seconds [default: 1.0]
    #[arg(short, long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Maximum number of pages to save [default: 100]
    #[arg(short, long, value_name = "N")]
    max_pages: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// User agent sent with requests and matched against robots.txt
    #[arg(long, value_name = "AGENT")]
    user_agent: Option<String>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Append a slug of the page title to each file name
    #[arg(long)]
    title_in_name: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.url.clone(),
            output_dir: self.output.clone(),
            delay_seconds: self.delay,
            max_pages: self.max_pages,
            user_agent: self.user_agent.clone(),
            request_timeout_secs: self.timeout,
            title_in_filename: self.title_in_name.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = match load_config(cli.config.as_deref(), cli.overrides()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_scraper=info,warn"),
            1 => EnvFilter::new("site_scraper=debug,info"),
            2 => EnvFilter::new("site_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Delay: {}s, user agent: {}",
        config.delay_seconds,
        config.user_agent
    );

    match run_crawl(config).await {
        Ok(summary) => {
            println!();
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
