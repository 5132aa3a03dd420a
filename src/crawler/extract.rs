//! HTML content extraction
//!
//! This module turns a fetched HTML document into what the crawler keeps:
//! - The page title (from `<title>`, falling back to the first `<h1>`)
//! - Readable text with boilerplate containers removed
//! - Outbound links, resolved to absolute URLs in document order

use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;
use url::Url;

/// Elements whose text never belongs to the readable content
///
/// `head` covers `<title>`: the title goes into the file header, not the text.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "noscript", "template", "head",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPage {
    /// The page title, if one was found
    pub title: Option<String>,

    /// Readable text; may be empty
    pub text: String,

    /// All followable links (absolute URLs, fragments not yet stripped)
    pub links: Vec<String>,
}

/// The document could not be turned into page content
#[derive(Debug, Error)]
#[error("Failed to extract content from {url}: {message}")]
pub struct ExtractError {
    pub url: String,
    pub message: String,
}

/// Turns HTML into title, text and links
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, html: &str, page_url: &Url) -> Result<ExtractedPage, ExtractError>;
}

/// `ContentExtractor` built on the scraper crate
#[derive(Debug, Clone, Default)]
pub struct HtmlExtractor;

impl ContentExtractor for HtmlExtractor {
    fn extract(&self, html: &str, page_url: &Url) -> Result<ExtractedPage, ExtractError> {
        parse_html(html, page_url)
    }
}

/// Parses HTML content and extracts title, text and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same-page anchors)
/// - Anything that does not resolve to http(s)
///
/// # Example
///
/// ```
/// use site_scraper::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hello</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, &base_url).unwrap();
/// assert_eq!(page.title, Some("Test".to_string()));
/// assert_eq!(page.text, "Hello Link");
/// assert_eq!(page.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> Result<ExtractedPage, ExtractError> {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let text = extract_text(&document);
    let links = extract_links(&document, base_url);

    Ok(ExtractedPage { title, text, links })
}

/// Extracts the page title, falling back to the first `<h1>`
fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"].iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        document
            .select(&selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .filter(|s| !s.is_empty())
    })
}

/// Collects the visible text of the document
///
/// Text under skipped elements is dropped; whitespace runs collapse to a
/// single space.
fn extract_text(document: &Html) -> String {
    let mut chunks: Vec<String> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ElementRef::wrap(ancestor)
                .map_or(false, |element| SKIPPED_ELEMENTS.contains(&element.value().name()))
        });
        if hidden {
            continue;
        }

        let chunk = collapse_whitespace(text);
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
    }

    chunks.join(" ")
}

/// Extracts all followable links from the document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        // Skip if it has the download attribute
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
