//! Robots.txt rules and caching
//!
//! This module defines the rule evaluation seam and the per-site cache:
//! - [`RuleSet`]: an immutable, agent-scoped view of one robots.txt
//! - [`PolicyParser`]: turns robots.txt text into a [`RuleSet`]
//! - [`RobotsTxtParser`]: the default parser, backed by the robotstxt crate
//! - [`RobotsCache`]: populate-once storage of rule sets keyed by site

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::{parse_crawl_delay, ParsedRobots, RobotsTxtParser};

use crate::url::Site;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Parsed robots.txt rules for one agent
///
/// Rule sets are built once per site and then shared read-only between
/// callers, so implementations must be immutable.
pub trait RuleSet: fmt::Debug + Send + Sync {
    /// Returns true if the agent may fetch `path` (path and query of a URL)
    fn allows(&self, path: &str) -> bool;

    /// Returns extension directives (e.g. `crawl-delay`) keyed by lowercase name
    fn options(&self) -> &HashMap<String, String>;

    /// Returns the declared sitemap URLs in document order
    fn sitemaps(&self) -> &[String];
}

/// Builds a [`RuleSet`] from robots.txt text
pub trait PolicyParser: Send + Sync {
    /// Parses `text` fetched from `site` for the agent `user_agent`
    ///
    /// Empty text means no directives, which allows everything.
    fn parse(&self, text: &str, site: &Site, user_agent: &str) -> Arc<dyn RuleSet>;
}

/// Extracts the product token used to match `User-agent` lines
///
/// `SumiBot/1.0 (+https://example.com)` matches as `SumiBot`. Only ASCII
/// letters, `-` and `_` are kept, which is how the robotstxt matcher reads the
/// `User-agent` lines themselves.
///
/// # Examples
///
/// ```
/// use sumi_robots::robots::robot_id;
///
/// assert_eq!(robot_id("SumiBot/1.0 (+https://example.com)"), "SumiBot");
/// assert_eq!(robot_id("  Googlebot-Image "), "Googlebot-Image");
/// ```
pub fn robot_id(user_agent: &str) -> &str {
    let trimmed = user_agent.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .unwrap_or(trimmed.len());

    if end == 0 {
        trimmed
    } else {
        &trimmed[..end]
    }
}
