use crate::url::Site;
use crate::RobotsError;
use url::{ParseError, Url};

/// Conversion of caller-supplied URL values into a parsed [`Url`]
///
/// Implemented for string types (parsed, reporting malformed input) and for
/// already-parsed `Url` values.
pub trait IntoRequestUrl {
    /// Converts `self` into a parsed URL
    fn into_request_url(self) -> Result<Url, RobotsError>;
}

impl IntoRequestUrl for &str {
    fn into_request_url(self) -> Result<Url, RobotsError> {
        Url::parse(self).map_err(|e| match e {
            // A relative reference or a bare "http://" is well-formed, just not absolute
            ParseError::RelativeUrlWithoutBase | ParseError::EmptyHost => {
                RobotsError::NotAbsolute(self.to_string())
            }
            other => RobotsError::InvalidUri(format!("{}: {}", self, other)),
        })
    }
}

impl IntoRequestUrl for String {
    fn into_request_url(self) -> Result<Url, RobotsError> {
        self.as_str().into_request_url()
    }
}

impl IntoRequestUrl for &String {
    fn into_request_url(self) -> Result<Url, RobotsError> {
        self.as_str().into_request_url()
    }
}

impl IntoRequestUrl for Url {
    fn into_request_url(self) -> Result<Url, RobotsError> {
        Ok(self)
    }
}

impl IntoRequestUrl for &Url {
    fn into_request_url(self) -> Result<Url, RobotsError> {
        Ok(self.clone())
    }
}

/// Splits a URL into the site that owns it and its request path
///
/// # Steps
///
/// 1. Parse the URL if given as a string; reject if malformed
/// 2. Require a scheme and host (absolute URL)
/// 3. Require the `http` or `https` scheme
/// 4. Lowercase the host and reduce the URL to its site root
/// 5. Keep path and query as the request path
///
/// # Arguments
///
/// * `url` - A URL string or parsed `Url`
///
/// # Returns
///
/// * `Ok((Site, String))` - The owning site and the request path
/// * `Err(RobotsError)` - `InvalidUri`, `NotAbsolute` or `UnsupportedScheme`
///
/// # Examples
///
/// ```
/// use sumi_robots::url::canonicalize;
///
/// let (site, path) = canonicalize("http://WWW.Example.com/a/b?c=d#e").unwrap();
/// assert_eq!(site.to_string(), "http://www.example.com/");
/// assert_eq!(path, "/a/b?c=d");
/// ```
pub fn canonicalize<U: IntoRequestUrl>(url: U) -> Result<(Site, String), RobotsError> {
    let url = url.into_request_url()?;
    let site = Site::from_url(&url)?;
    Ok((site, request_path(&url)))
}

/// Returns the path and query of a URL, the part robots.txt rules match
pub fn request_path(url: &Url) -> String {
    let path = if url.path().is_empty() { "/" } else { url.path() };
    match url.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}
