use url::Url;

/// Extracts the site domain used for same-site comparisons
///
/// The host is lowercased and a leading `www.` is dropped, so
/// `www.example.com` and `example.com` count as the same site. A
/// non-default port is kept (`127.0.0.1:8080`), since a different port
/// is a different server.
///
/// This is narrower than a registrable domain: any subdomain other than
/// `www.` is its own site, so `blog.example.com` is not `example.com`.
///
/// # Returns
///
/// * `Some(String)` - The site domain
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_scraper::url::site_domain;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(site_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(site_domain(&url), Some("localhost:8080".to_string()));
/// ```
pub fn site_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }

    let host = match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => host,
    };

    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Builds the robots.txt location for the site serving `url`
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_scraper::url::robots_url;
///
/// let url = Url::parse("https://example.com/docs/intro?x=1").unwrap();
/// assert_eq!(robots_url(&url).unwrap().as_str(), "https://example.com/robots.txt");
/// ```
pub fn robots_url(url: &Url) -> Option<Url> {
    url.host_str()?;
    url.join("/robots.txt").ok()
}
