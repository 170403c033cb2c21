//! Robots.txt parser implementation
//!
//! Allow/deny decisions are delegated to the robotstxt crate. Extension
//! directives and sitemaps are collected with a line scanner.

use crate::robots::{robot_id, PolicyParser, RuleSet};
use crate::url::Site;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::sync::Arc;

/// Scheme and host prepended to request paths before matching
const MATCH_BASE: &str = "http://robots.invalid";

/// Parsed robots.txt data for one agent
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Product token matched against `User-agent` lines
    robot_id: String,
    /// Extension directives of the group that applies to the agent
    options: HashMap<String, String>,
    /// `Sitemap` values in document order
    sitemaps: Vec<String>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    /// * `user_agent` - The agent identity; its product token selects the group
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_robots::ParsedRobots;
    ///
    /// let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin", "SumiBot/1.0");
    /// assert!(robots.is_allowed("/"));
    /// assert!(!robots.is_allowed("/admin/users"));
    /// ```
    pub fn from_content(content: &str, user_agent: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let token = robot_id(user_agent).to_string();
        let (options, sitemaps) = scan_directives(content, &token);

        Self {
            content: content.to_string(),
            robot_id: token,
            options,
            sitemaps,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks if a path is allowed for the agent
    ///
    /// # Arguments
    ///
    /// * `path` - The URL path to check (e.g., "/page.html?x=1")
    pub fn is_allowed(&self, path: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        // The matcher extracts the path from a full URL; a bare "//a/b" would
        // be read as a network-path reference with host "a"
        let url = format!("{}{}", MATCH_BASE, path);
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, &self.robot_id, &url)
    }
}

/// Parses a `Crawl-delay` value into seconds
///
/// Returns `None` for values that are not a finite, non-negative number.
pub fn parse_crawl_delay(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|delay| delay.is_finite() && *delay >= 0.0)
}

impl RuleSet for ParsedRobots {
    fn allows(&self, path: &str) -> bool {
        self.is_allowed(path)
    }

    fn options(&self) -> &HashMap<String, String> {
        &self.options
    }

    fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

/// The default [`PolicyParser`], producing [`ParsedRobots`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RobotsTxtParser;

impl PolicyParser for RobotsTxtParser {
    fn parse(&self, text: &str, site: &Site, user_agent: &str) -> Arc<dyn RuleSet> {
        let robots = ParsedRobots::from_content(text, user_agent);
        tracing::trace!(
            "Parsed robots.txt for {}: {} option(s), {} sitemap(s)",
            site,
            robots.options.len(),
            robots.sitemaps.len()
        );
        Arc::new(robots)
    }
}

/// Which kind of `User-agent` line opened the current group
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct GroupMatch {
    specific: bool,
    wildcard: bool,
}

/// Collects extension directives and sitemaps
///
/// Groups start with one or more `User-agent` lines. If any group names the
/// agent, only those groups count; otherwise the `*` groups do. Later values
/// replace earlier ones. `Sitemap` lines are global and never end a group.
fn scan_directives(content: &str, agent_token: &str) -> (HashMap<String, String>, Vec<String>) {
    let mut specific_options = HashMap::new();
    let mut wildcard_options = HashMap::new();
    let mut sitemaps = Vec::new();

    let mut group = GroupMatch::default();
    let mut in_rules = false;
    let mut seen_specific = false;

    for line in content.lines() {
        // Strip comments
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                // A user-agent line after rules starts a new group
                if in_rules {
                    group = GroupMatch::default();
                    in_rules = false;
                }
                if value.starts_with('*') {
                    group.wildcard = true;
                } else if robot_id(value).eq_ignore_ascii_case(agent_token) {
                    group.specific = true;
                    seen_specific = true;
                }
            }
            "sitemap" | "site-map" => {
                if !value.is_empty() {
                    sitemaps.push(value.to_string());
                }
            }
            "allow" | "disallow" => in_rules = true,
            _ => {
                in_rules = true;
                if group.specific {
                    specific_options.insert(key, value.to_string());
                } else if group.wildcard {
                    wildcard_options.insert(key, value.to_string());
                }
            }
        }
    }

    let options = if seen_specific {
        specific_options
    } else {
        wildcard_options
    };
    (options, sitemaps)
}
