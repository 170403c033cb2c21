//! Access façade
//!
//! [`RobotsClient`] ties the pieces together: it canonicalizes the requested
//! URL, looks the site up in its [`RobotsCache`] (fetching and parsing
//! robots.txt on a miss) and answers the query from the cached rules.
//!
//! # Fetch failure policy
//!
//! | Fetch outcome | Effect |
//! |---------------|--------|
//! | 2xx | Body parsed and cached |
//! | 404 | Empty robots.txt parsed and cached; everything allowed |
//! | Anything else | `RobotsError::FetchFailed` returned, nothing cached |
//!
//! Because failures are not cached, a later query for the same site fetches
//! again; callers decide whether to skip, retry, or stop crawling the site.

use crate::config::{Config, FetchConfig};
use crate::fetcher::{HttpFetcher, PolicyTransport};
use crate::robots::{
    parse_crawl_delay, CachedRobots, PolicyParser, RobotsCache, RobotsTxtParser, RuleSet,
};
use crate::url::{canonicalize, is_robots_txt_path, IntoRequestUrl, Site};
use crate::{Result, RobotsError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Robots.txt gate for one crawler identity
///
/// Each client owns its cache, so independent clients never share state. The
/// client is `Send + Sync`; wrap it in an `Arc` to share it between tasks.
///
/// # Example
///
/// ```no_run
/// use sumi_robots::RobotsClient;
///
/// # async fn example() -> sumi_robots::Result<()> {
/// let robots = RobotsClient::new("SumiBot/1.0 (+https://example.com/bot)")?;
///
/// if robots.disallowed("https://example.com/private/page").await? {
///     println!("skipping");
/// }
/// for sitemap in robots.sitemaps("https://example.com/").await? {
///     println!("sitemap: {}", sitemap);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RobotsClient {
    user_agent: String,
    transport: Arc<dyn PolicyTransport>,
    parser: Arc<dyn PolicyParser>,
    cache: RobotsCache,
}

impl RobotsClient {
    /// Creates a client fetching over HTTP with default settings
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Sent as the `User-Agent` header; its product token
    ///   (e.g. `SumiBot` in `SumiBot/1.0`) is matched against robots.txt groups
    pub fn new(user_agent: impl Into<String>) -> Result<Self> {
        Self::builder(user_agent).build()
    }

    /// Creates a client from a loaded configuration file
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::builder(config.user_agent.header_value())
            .fetch_config(config.fetch.clone())
            .build()
    }

    /// Starts building a client with custom transport, parser or fetch settings
    pub fn builder(user_agent: impl Into<String>) -> RobotsClientBuilder {
        RobotsClientBuilder {
            user_agent: user_agent.into(),
            transport: None,
            parser: None,
            fetch_config: FetchConfig::default(),
        }
    }

    /// Returns the agent identity given at construction
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the number of sites whose robots.txt is cached
    pub fn cached_sites(&self) -> usize {
        self.cache.len()
    }

    /// Tests if the agent may fetch `url`
    ///
    /// The site's robots.txt itself is always allowed and never fetched for
    /// this check.
    ///
    /// # Errors
    ///
    /// * `InvalidUri` - `url` is a malformed string
    /// * `NotAbsolute` - `url` lacks a scheme or host
    /// * `UnsupportedScheme` - `url` is not HTTP or HTTPS
    /// * `FetchFailed` - the site's robots.txt could not be fetched
    pub async fn allowed<U: IntoRequestUrl>(&self, url: U) -> Result<bool> {
        let (site, request_path) = canonicalize(url)?;
        if is_robots_txt_path(&request_path) {
            return Ok(true);
        }

        let robots = self.robots_txt(&site).await?;
        let allowed = robots.is_allowed(&request_path);
        if !allowed {
            tracing::debug!("{} disallowed by robots.txt of {}", request_path, site);
        }
        Ok(allowed)
    }

    /// Equivalent to `!allowed(url)`
    pub async fn disallowed<U: IntoRequestUrl>(&self, url: U) -> Result<bool> {
        Ok(!self.allowed(url).await?)
    }

    /// Returns the extension directives that apply to the agent at `url`'s site
    ///
    /// Keys are lowercase (`crawl-delay`, `request-rate`, ...); look them up
    /// lowercased too. See [`allowed`](Self::allowed) for errors.
    pub async fn options<U: IntoRequestUrl>(&self, url: U) -> Result<HashMap<String, String>> {
        Ok(self.rules_for(url).await?.options().clone())
    }

    /// Returns one extension directive, matching `token` case-insensitively
    ///
    /// Equivalent to `options(url)[token.to_lowercase()]`.
    pub async fn option<U: IntoRequestUrl>(&self, url: U, token: &str) -> Result<Option<String>> {
        let rules = self.rules_for(url).await?;
        Ok(rules.options().get(&token.to_lowercase()).cloned())
    }

    /// Returns the declared `Crawl-delay` in seconds, if any
    ///
    /// The value is reported, not enforced.
    pub async fn crawl_delay<U: IntoRequestUrl>(&self, url: U) -> Result<Option<f64>> {
        Ok(self
            .option(url, "crawl-delay")
            .await?
            .and_then(|value| parse_crawl_delay(&value)))
    }

    /// Returns the sitemap URLs declared in the site's robots.txt
    ///
    /// URLs are returned exactly as declared, in document order, duplicates
    /// included. See [`allowed`](Self::allowed) for errors.
    pub async fn sitemaps<U: IntoRequestUrl>(&self, url: U) -> Result<Vec<String>> {
        Ok(self.rules_for(url).await?.sitemaps().to_vec())
    }

    async fn rules_for<U: IntoRequestUrl>(&self, url: U) -> Result<Arc<dyn RuleSet>> {
        let (site, _) = canonicalize(url)?;
        Ok(self.robots_txt(&site).await?.rules)
    }

    async fn robots_txt(&self, site: &Site) -> Result<CachedRobots> {
        self.cache
            .get_or_fetch(site, || self.fetch_and_parse(site))
            .await
    }

    async fn fetch_and_parse(&self, site: &Site) -> Result<Arc<dyn RuleSet>> {
        let robots_url = site.robots_txt_url();
        tracing::debug!("Fetching robots.txt: {}", robots_url);

        let body = match self.transport.get(&robots_url).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                tracing::debug!("No robots.txt at {}, allowing everything", robots_url);
                String::new()
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", robots_url, e);
                return Err(RobotsError::FetchFailed {
                    url: robots_url.to_string(),
                    source: e,
                });
            }
        };

        Ok(self.parser.parse(&body, site, &self.user_agent))
    }
}

impl fmt::Debug for RobotsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotsClient")
            .field("user_agent", &self.user_agent)
            .field("cached_sites", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RobotsClient`]
pub struct RobotsClientBuilder {
    user_agent: String,
    transport: Option<Arc<dyn PolicyTransport>>,
    parser: Option<Arc<dyn PolicyParser>>,
    fetch_config: FetchConfig,
}

impl RobotsClientBuilder {
    /// Replaces the HTTP transport used to download robots.txt
    pub fn transport<T: PolicyTransport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Replaces the robots.txt parser
    pub fn parser<P: PolicyParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Sets timeouts and TLS options for the default HTTP transport
    ///
    /// Ignored when a custom transport is supplied.
    pub fn fetch_config(mut self, fetch_config: FetchConfig) -> Self {
        self.fetch_config = fetch_config;
        self
    }

    /// Builds the client
    ///
    /// # Errors
    ///
    /// * `ClientBuild` - The default HTTP client could not be created
    pub fn build(self) -> Result<RobotsClient> {
        let transport: Arc<dyn PolicyTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpFetcher::new(&self.user_agent, &self.fetch_config)?),
        };

        Ok(RobotsClient {
            user_agent: self.user_agent,
            transport,
            parser: self.parser.unwrap_or_else(|| Arc::new(RobotsTxtParser)),
            cache: RobotsCache::new(),
        })
    }
}
