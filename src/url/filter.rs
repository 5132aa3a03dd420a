use crate::url::domain::site_domain;
use std::fmt;
use url::Url;

/// File extensions that never hold crawlable page content
///
/// Documents, images, archives, stylesheets, scripts, fonts and media.
pub const DENIED_EXTENSIONS: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "rtf", "csv",
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tif", "tiff", "avif",
    // archives and binaries
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz", "exe", "dmg", "msi", "iso", "apk",
    // stylesheets and scripts
    "css", "js", "mjs", "map",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // media
    "mp3", "mp4", "m4a", "wav", "ogg", "avi", "mov", "mkv", "webm", "flac",
];

/// Path segment prefixes that mark administrative or non-content areas
///
/// A segment matches when it starts with one of these, so `/login.php` and
/// `/administrator` are refused along with `/login` and `/admin`.
pub const DENIED_PATH_SEGMENTS: &[&str] = &[
    "admin",
    "wp-admin",
    "wp-content",
    "wp-includes",
    "login",
    "logout",
    "search",
];

/// Why a URL was refused by the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRejection {
    /// The URL is on another site (or has no host)
    OffSite,
    /// The path ends in a denied file extension
    DeniedExtension(String),
    /// A path segment starts with a denied administrative prefix
    DeniedPath(String),
}

impl fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffSite => write!(f, "off-site"),
            Self::DeniedExtension(ext) => write!(f, "denied extension .{}", ext),
            Self::DeniedPath(segment) => write!(f, "denied path /{}", segment),
        }
    }
}

/// Decides which discovered URLs are worth fetching
///
/// Rules are applied in order: same site, extension denylist, path
/// denylist. Host comparison is case-insensitive; path prefixes are
/// matched case-sensitively per segment, while extensions are matched
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    base_domain: String,
}

impl UrlFilter {
    /// Creates a filter restricted to `base_domain` (as returned by `site_domain`)
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into().to_lowercase(),
        }
    }

    /// Creates a filter for the site serving `base_url`
    pub fn for_base_url(base_url: &Url) -> Option<Self> {
        site_domain(base_url).map(Self::new)
    }

    /// Returns the site domain this filter accepts
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Returns true if the URL may be crawled
    pub fn is_scrapable(&self, url: &Url) -> bool {
        self.check(url).is_ok()
    }

    /// Checks the URL against every rule, reporting the first one it breaks
    pub fn check(&self, url: &Url) -> Result<(), FilterRejection> {
        match site_domain(url) {
            Some(domain) if domain == self.base_domain => {}
            _ => return Err(FilterRejection::OffSite),
        }

        if let Some(ext) = denied_extension(url.path()) {
            return Err(FilterRejection::DeniedExtension(ext));
        }

        if let Some(segment) = denied_segment(url.path()) {
            return Err(FilterRejection::DeniedPath(segment.to_string()));
        }

        Ok(())
    }
}

fn denied_extension(path: &str) -> Option<String> {
    let last = path.rsplit('/').next()?;
    let (_, ext) = last.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    DENIED_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

fn denied_segment(path: &str) -> Option<&'static str> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .find_map(|segment| {
            DENIED_PATH_SEGMENTS
                .iter()
                .copied()
                .find(|denied| segment.starts_with(denied))
        })
}
