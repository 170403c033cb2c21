//! HTTP transport for robots.txt
//!
//! This module handles the outbound requests for robots.txt, including:
//! - Building HTTP clients with the configured user agent
//! - Manual redirect handling with a hop limit and `Referer` headers
//! - A deadline covering the whole redirect chain
//! - Status and error classification

use crate::config::FetchConfig;
use crate::fetcher::{FetchError, PolicyTransport};
use async_trait::async_trait;
use reqwest::header::{LOCATION, REFERER};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum number of requests in one redirect chain, the first one included
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Builds an HTTP client for robots.txt requests
///
/// Redirects are disabled at the client level so [`HttpFetcher`] can count
/// hops and set `Referer` itself.
///
/// # Arguments
///
/// * `user_agent` - Value sent in the `User-Agent` header
/// * `config` - Timeouts and TLS settings
///
/// # Example
///
/// ```no_run
/// use sumi_robots::config::FetchConfig;
/// use sumi_robots::fetcher::build_http_client;
///
/// let client = build_http_client("SumiBot/1.0", &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::none()) // Handle redirects manually
        .referer(false)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Default robots.txt transport over HTTP(S)
///
/// # Request Flow
///
/// | Response | Result |
/// |----------|--------|
/// | 2xx | Body text |
/// | 3xx | Follow `Location`, sending the previous URL as `Referer` |
/// | 3xx on the 10th request | `TooManyRedirects` |
/// | 404 | `NotFound` |
/// | Other status | `Status` |
/// | Timeout | `Timeout` |
/// | Other transport error | `Http` |
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    deadline: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher with its own HTTP client
    pub fn new(user_agent: &str, config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(user_agent, config)?,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    /// Wraps an existing client
    ///
    /// The client should have redirects disabled; otherwise reqwest follows
    /// them before this fetcher sees them. `deadline` bounds the whole chain.
    pub fn with_client(client: Client, deadline: Duration) -> Self {
        Self { client, deadline }
    }

    async fn follow_redirects(&self, start: &Url) -> Result<String, FetchError> {
        let mut url = start.clone();
        let mut referer: Option<String> = None;

        for hop in 1..=MAX_REDIRECT_HOPS {
            let mut request = self.client.get(url.clone());
            if let Some(referer) = &referer {
                request = request.header(REFERER, referer.as_str());
            }

            tracing::debug!("GET {} (request {} of {})", url, hop, MAX_REDIRECT_HOPS);
            let response = request.send().await.map_err(|e| classify_error(&url, e))?;
            let status = response.status();

            if status.is_success() {
                return response.text().await.map_err(|e| classify_error(&url, e));
            }

            if status.is_redirection() {
                let next = redirect_target(&url, &response)?;
                tracing::debug!("Redirect {} -> {} ({})", url, next, status.as_u16());
                referer = Some(url.to_string());
                url = next;
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound {
                    url: url.to_string(),
                });
            }

            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Err(FetchError::TooManyRedirects {
            url: start.to_string(),
        })
    }
}

#[async_trait]
impl PolicyTransport for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        match tokio::time::timeout(self.deadline, self.follow_redirects(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }
}

/// Resolves the `Location` header of a redirect against the current URL
fn redirect_target(current: &Url, response: &Response) -> Result<Url, FetchError> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|location| current.join(location).ok())
        .ok_or_else(|| FetchError::InvalidRedirect {
            url: current.to_string(),
        })
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
