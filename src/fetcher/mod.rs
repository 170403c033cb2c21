//! Robots.txt retrieval
//!
//! This module defines the transport seam used to download robots.txt files
//! and the default HTTP implementation:
//! - [`PolicyTransport`]: "given a URL, return the body or say it was not found"
//! - [`HttpFetcher`]: reqwest-backed transport with manual redirect handling
//! - [`FetchError`]: failure classification, with not-found kept distinct

mod http;

pub use http::{build_http_client, HttpFetcher, MAX_REDIRECT_HOPS};

use async_trait::async_trait;
use std::future::Future;
use thiserror::Error;
use url::Url;

/// Errors produced while fetching a robots.txt file
///
/// `NotFound` is the only variant that does not count as a failure: the
/// client treats it as an empty robots.txt.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Too many redirects from {url}")]
    TooManyRedirects { url: String },

    #[error("Redirect from {url} has no usable Location header")]
    InvalidRedirect { url: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns true if the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A capability that downloads a robots.txt file
///
/// Implementations return the body text on success and
/// [`FetchError::NotFound`] when the resource does not exist. Every other
/// error is treated as a failed fetch.
///
/// Closures of the shape `Fn(Url) -> impl Future<Output = Result<String, FetchError>>`
/// implement this trait, which makes stub transports easy to write:
///
/// ```
/// use sumi_robots::{FetchError, RobotsClient};
///
/// let robots = RobotsClient::builder("TestBot")
///     .transport(|url: url::Url| async move {
///         Err::<String, _>(FetchError::NotFound { url: url.to_string() })
///     })
///     .build()
///     .unwrap();
/// ```
#[async_trait]
pub trait PolicyTransport: Send + Sync {
    /// Fetches the resource at `url`
    async fn get(&self, url: &Url) -> Result<String, FetchError>;
}

#[async_trait]
impl<F, Fut> PolicyTransport for F
where
    F: Fn(Url) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, FetchError>> + Send + 'static,
{
    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        (self)(url.clone()).await
    }
}
