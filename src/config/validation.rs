use crate::config::types::{CrawlConfig, MAX_DELAY_SECONDS};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    parse_base_url(&config.base_url)?;
    validate_pacing(config)?;
    validate_limits(config)?;
    validate_identity(config)?;
    Ok(())
}

/// Parses the seed URL, assuming `https://` when no scheme is given
///
/// # Examples
///
/// ```
/// use site_scraper::config::parse_base_url;
///
/// let url = parse_base_url("example.com/docs").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::InvalidUrl("base URL cannot be empty".to_string()));
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base URL '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Base URL '{}' must use http or https, got {}",
            raw,
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Base URL '{}' has no host",
            raw
        )));
    }

    Ok(url)
}

fn validate_pacing(config: &CrawlConfig) -> Result<(), ConfigError> {
    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay_seconds
        )));
    }

    if config.delay_seconds > MAX_DELAY_SECONDS {
        return Err(ConfigError::Validation(format!(
            "delay must be at most {} seconds, got {}",
            MAX_DELAY_SECONDS, config.delay_seconds
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

fn validate_limits(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_identity(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
