//! Deterministic, collision-free output file names
//!
//! A page's name comes from its URL path (`/docs/intro` becomes
//! `docs-intro`, the empty path becomes `home`), optionally followed by a
//! slug of its title. When a name was already handed out, `_1`, `_2`, ...
//! is appended until a free one is found.

use std::collections::{HashMap, HashSet};
use url::Url;

/// Stem used for the site root
pub const ROOT_STEM: &str = "home";

/// Maximum characters kept from the URL path
pub const MAX_PATH_STEM_LEN: usize = 100;

/// Maximum characters kept from the title
pub const MAX_TITLE_SLUG_LEN: usize = 50;

/// File extension of every page file
pub const PAGE_EXTENSION: &str = "txt";

/// Hands out unique file names for the lifetime of one run
///
/// Names are compared case-insensitively so two pages never map to the
/// same file on case-insensitive filesystems. A name is never reused, even
/// if its file disappears later.
#[derive(Debug, Default)]
pub struct NameAllocator {
    /// Whether the title slug is appended to the path stem
    include_title: bool,

    /// Next suffix to try for each stem (lowercased)
    next_suffix: HashMap<String, usize>,

    /// Every name handed out so far (lowercased, without extension)
    issued: HashSet<String>,
}

impl NameAllocator {
    /// Creates an allocator; `include_title` appends `_<title-slug>` to stems
    pub fn new(include_title: bool) -> Self {
        Self {
            include_title,
            ..Self::default()
        }
    }

    /// Returns a file name for the page that no earlier call returned
    ///
    /// # Examples
    ///
    /// ```
    /// use site_scraper::output::NameAllocator;
    /// use url::Url;
    ///
    /// let mut names = NameAllocator::new(false);
    /// let root = Url::parse("https://example.com/").unwrap();
    /// assert_eq!(names.allocate(&root, Some("Home")), "home.txt");
    /// assert_eq!(names.allocate(&root, Some("Home")), "home_1.txt");
    /// ```
    pub fn allocate(&mut self, url: &Url, title: Option<&str>) -> String {
        let stem = derive_stem(url, title, self.include_title);
        let key = stem.to_lowercase();
        let mut suffix = self.next_suffix.get(&key).copied().unwrap_or(0);

        loop {
            let candidate = if suffix == 0 {
                stem.clone()
            } else {
                format!("{}_{}", stem, suffix)
            };
            suffix += 1;

            if self.issued.insert(candidate.to_lowercase()) {
                self.next_suffix.insert(key, suffix);
                return format!("{}.{}", candidate, PAGE_EXTENSION);
            }
        }
    }

    /// Returns how many names were handed out
    pub fn allocated(&self) -> usize {
        self.issued.len()
    }
}

/// Builds the stem for a page before deduplication
pub fn derive_stem(url: &Url, title: Option<&str>, include_title: bool) -> String {
    let mut stem = slugify(url.path(), MAX_PATH_STEM_LEN);
    if stem.is_empty() {
        stem = ROOT_STEM.to_string();
    }

    if include_title {
        let slug = title
            .map(|t| slugify(t, MAX_TITLE_SLUG_LEN))
            .unwrap_or_default();
        if !slug.is_empty() {
            stem = format!("{}_{}", stem, slug);
        }
    }

    stem
}

/// Collapses every run of non-alphanumeric characters into one `-`,
/// trims separators from both ends and caps the length in characters
fn slugify(raw: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for c in raw.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    let capped: String = slug.chars().take(max_len).collect();
    capped.trim_end_matches('-').to_string()
}
