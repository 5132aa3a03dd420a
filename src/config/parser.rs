use crate::config::types::CrawlConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over the configuration file
///
/// `None` leaves the file (or default) value in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub delay_seconds: Option<f64>,
    pub max_pages: Option<usize>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub title_in_filename: Option<bool>,
}

impl ConfigOverrides {
    /// Applies every present override onto `config`
    pub fn apply(self, config: &mut CrawlConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(delay) = self.delay_seconds {
            config.delay_seconds = delay;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(timeout) = self.request_timeout_secs {
            config.request_timeout_secs = timeout;
        }
        if let Some(title_in_filename) = self.title_in_filename {
            config.title_in_filename = title_in_filename;
        }
    }
}

/// Reads a TOML configuration file without validating it
///
/// The file may omit any key, including the base URL, since the command
/// line usually supplies it.
pub fn read_config_file(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: CrawlConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Builds the effective configuration: defaults, then the optional file,
/// then the command-line overrides, then validation
///
/// # Example
///
/// ```no_run
/// use site_scraper::config::{load_config, ConfigOverrides};
/// use std::path::Path;
///
/// let overrides = ConfigOverrides {
///     base_url: Some("https://example.com".to_string()),
///     ..Default::default()
/// };
/// let config = load_config(Some(Path::new("scraper.toml")), overrides).unwrap();
/// println!("Max pages: {}", config.max_pages);
/// ```
pub fn load_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<CrawlConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => CrawlConfig::default(),
    };

    overrides.apply(&mut config);
    validate(&config)?;

    Ok(config)
}
