//! Robots.txt parser implementation
//!
//! Reduces a robots.txt file to the rules that apply to one user agent:
//! an ordered list of allow/disallow path prefixes and an optional crawl
//! delay.

use std::time::Duration;
use url::Url;

/// Longest crawl delay honored; larger values are clamped to it
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// One `Allow` or `Disallow` line of the selected group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    /// True for `Allow`, false for `Disallow`
    pub allow: bool,
    /// Path prefix, compared against path plus query
    pub prefix: String,
}

impl PathRule {
    pub fn allow(prefix: impl Into<String>) -> Self {
        Self {
            allow: true,
            prefix: prefix.into(),
        }
    }

    pub fn disallow(prefix: impl Into<String>) -> Self {
        Self {
            allow: false,
            prefix: prefix.into(),
        }
    }
}

/// Politeness rules for this crawler, taken from one site's robots.txt
///
/// Immutable once built; the default value allows everything and adds no
/// delay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolitenessRules {
    /// Path rules, in the order they were listed
    rules: Vec<PathRule>,
    /// Minimum spacing between requests requested by the site
    crawl_delay: Option<Duration>,
}

/// One `User-agent` group as written in the file
#[derive(Debug, Default)]
struct Group {
    agents: Vec<String>,
    rules: Vec<PathRule>,
    crawl_delay: Option<Duration>,
}

impl PolitenessRules {
    /// Creates a permissive rule set that allows everything
    ///
    /// This is used when robots.txt cannot be fetched or is missing.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Builds rules directly from disallowed prefixes and a delay
    pub fn new(disallowed: Vec<String>, crawl_delay: Option<Duration>) -> Self {
        Self::with_rules(
            disallowed.into_iter().map(PathRule::disallow).collect(),
            crawl_delay,
        )
    }

    /// Builds rules from an ordered list of allow/disallow rules
    pub fn with_rules(rules: Vec<PathRule>, crawl_delay: Option<Duration>) -> Self {
        Self { rules, crawl_delay }
    }

    /// Parses raw robots.txt content for the given user agent
    ///
    /// Group selection: the group whose `User-agent` token is the longest
    /// case-insensitive match inside `user_agent` wins; several groups
    /// naming that same token are merged in file order. Without a
    /// specific match the `*` groups apply. Lines that cannot be parsed
    /// are ignored, so garbage input yields a permissive rule set.
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let groups = parse_groups(content);
        let agent = user_agent.to_lowercase();

        let best_token = groups
            .iter()
            .flat_map(|group| group.agents.iter())
            .filter(|token| token.as_str() != "*" && agent.contains(token.as_str()))
            .max_by_key(|token| token.len())
            .cloned();

        let selected: Vec<&Group> = match best_token {
            Some(token) => groups
                .iter()
                .filter(|group| group.agents.contains(&token))
                .collect(),
            None => groups
                .iter()
                .filter(|group| group.agents.iter().any(|a| a == "*"))
                .collect(),
        };

        let rules = selected
            .iter()
            .flat_map(|group| group.rules.iter().cloned())
            .collect();
        let crawl_delay = selected.iter().find_map(|group| group.crawl_delay);

        Self { rules, crawl_delay }
    }

    /// All path rules, in file order
    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// Disallowed path prefixes, in file order
    pub fn disallowed(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|rule| !rule.allow)
            .map(|rule| rule.prefix.as_str())
            .collect()
    }

    /// Crawl delay requested by the site, if any
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.crawl_delay
    }

    /// Returns true if no rule restricts crawling
    pub fn is_permissive(&self) -> bool {
        self.rules.iter().all(|rule| rule.allow) && self.crawl_delay.is_none()
    }

    /// Returns the first listed rule whose prefix matches the URL
    ///
    /// The prefix is compared against the path plus query string.
    pub fn first_match(&self, url: &Url) -> Option<&PathRule> {
        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        self.rules
            .iter()
            .find(|rule| target.starts_with(rule.prefix.as_str()))
    }

    /// Returns the disallow prefix that blocks the URL, if any
    ///
    /// Only the first matching rule counts: an earlier `Allow` wins over a
    /// later `Disallow`.
    pub fn matching_rule(&self, url: &Url) -> Option<&str> {
        self.first_match(url)
            .filter(|rule| !rule.allow)
            .map(|rule| rule.prefix.as_str())
    }

    /// Checks if a URL may be fetched
    pub fn is_allowed(&self, url: &Url) -> bool {
        self.matching_rule(url).is_none()
    }
}

/// Splits the file into user-agent groups
///
/// Consecutive `User-agent` lines share a group; a `User-agent` line after
/// any rule line starts a new one.
fn parse_groups(content: &str) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut current: Option<Group> = None;
    let mut in_agent_lines = false;

    for line in content.lines() {
        // Strip comments
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if !in_agent_lines {
                    if let Some(group) = current.take() {
                        groups.push(group);
                    }
                    current = Some(Group::default());
                    in_agent_lines = true;
                }
                if let Some(group) = current.as_mut() {
                    group.agents.push(value.to_lowercase());
                }
            }
            "allow" | "disallow" => {
                in_agent_lines = false;
                if let Some(group) = current.as_mut() {
                    // An empty value matches nothing
                    if !value.is_empty() {
                        group.rules.push(PathRule {
                            allow: key == "allow",
                            prefix: value.to_string(),
                        });
                    }
                }
            }
            "crawl-delay" => {
                in_agent_lines = false;
                if let Some(group) = current.as_mut() {
                    if group.crawl_delay.is_none() {
                        group.crawl_delay = parse_delay(value);
                    }
                }
            }
            _ => {
                // Sitemap, Host and unknown directives do not affect
                // path rules or the delay
                in_agent_lines = false;
            }
        }
    }

    if let Some(group) = current {
        groups.push(group);
    }

    groups
}

/// Parses a `Crawl-delay` value in seconds
///
/// Negative, non-numeric and unrepresentable values are ignored; anything
/// longer than `MAX_CRAWL_DELAY` is clamped to it.
fn parse_delay(value: &str) -> Option<Duration> {
    let seconds = value.parse::<f64>().ok()?;
    let delay = Duration::try_from_secs_f64(seconds).ok()?;
    Some(delay.min(MAX_CRAWL_DELAY))
}
