use crate::UrlError;
use url::Url;

/// Normalizes an absolute URL into the form used as a frontier key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https`
/// 3. Require a host (lowercased by the parser, default port dropped)
/// 4. Resolve dot segments; an empty path becomes `/`
/// 5. Remove the fragment (everything after `#`)
/// 6. Keep the query string untouched
///
/// Normalizing an already-normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use site_scraper::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM/a/../Docs?page=2#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/Docs?page=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Resolves `href` against the page it was found on, then normalizes it
///
/// # Examples
///
/// ```
/// use site_scraper::url::resolve_url;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/intro").unwrap();
/// let link = resolve_url(&page, "setup#install").unwrap();
/// assert_eq!(link.as_str(), "https://example.com/docs/setup");
/// ```
pub fn resolve_url(base: &Url, href: &str) -> Result<Url, UrlError> {
    let joined = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(joined)
}

fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    // A bare `?` carries no parameters
    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
