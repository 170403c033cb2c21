//! Sumi-Robots: a robots.txt access gate for polite crawlers
//!
//! This crate answers "may this agent fetch this URL?" by resolving the URL to
//! its site, fetching and parsing that site's robots.txt once per client, and
//! querying the cached rules for allow/deny decisions, extended options
//! (such as `Crawl-delay`) and declared sitemaps.
//!
//! # Example
//!
//! ```no_run
//! use sumi_robots::RobotsClient;
//!
//! # async fn example() -> sumi_robots::Result<()> {
//! let robots = RobotsClient::new("SumiBot/1.0")?;
//! if robots.allowed("https://example.com/page").await? {
//!     println!("ok to fetch");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Fetch failures
//!
//! A robots.txt that answers 404 is treated as empty, which allows everything.
//! Any other failure (non-success status, transport error, redirect chain
//! longer than ten requests) is returned to the caller as
//! [`RobotsError::FetchFailed`] and is **not** cached: the next query for the
//! same site fetches again.

pub mod client;
pub mod config;
pub mod fetcher;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Robots operations
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Non-absolute URI: {0}")]
    NotAbsolute(String),

    #[error("Non-HTTP/HTTPS URI: {0}")]
    UnsupportedScheme(String),

    #[error("Failed to fetch robots.txt from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: fetcher::FetchError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

impl RobotsError {
    /// Returns true if this error came from an exhausted redirect chain
    pub fn is_too_many_redirects(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed {
                source: fetcher::FetchError::TooManyRedirects { .. },
                ..
            }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sumi-Robots operations
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{RobotsClient, RobotsClientBuilder};
pub use config::Config;
pub use fetcher::{FetchError, HttpFetcher, PolicyTransport};
pub use robots::{ParsedRobots, PolicyParser, RobotsTxtParser, RuleSet};
pub use crate::url::{canonicalize, IntoRequestUrl, Site, ROBOTS_TXT_PATH};
