use crate::RobotsError;
use std::fmt;
use url::Url;

/// The scheme, host and port a robots.txt file governs
///
/// A site is stored as its root URL (path `/`, no query, fragment or
/// credentials). Hosts are lowercase and default ports are elided by the `url`
/// crate, so two sites compare equal exactly when scheme, host and effective
/// port are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    root: Url,
}

impl Site {
    /// Builds the site owning an absolute HTTP or HTTPS URL
    ///
    /// # Errors
    ///
    /// * `RobotsError::NotAbsolute` - The URL has no host
    /// * `RobotsError::UnsupportedScheme` - The scheme is neither `http` nor `https`
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use sumi_robots::url::Site;
    ///
    /// let url = Url::parse("https://EXAMPLE.com:443/a/b?c=d").unwrap();
    /// let site = Site::from_url(&url).unwrap();
    /// assert_eq!(site.to_string(), "https://example.com/");
    /// ```
    pub fn from_url(url: &Url) -> Result<Self, RobotsError> {
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
            _ => return Err(RobotsError::NotAbsolute(url.to_string())),
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RobotsError::UnsupportedScheme(url.to_string()));
        }

        let mut root = url.clone();
        if root.host_str() != Some(host.as_str()) {
            root.set_host(Some(&host))
                .map_err(|e| RobotsError::InvalidUri(format!("{}: {}", url, e)))?;
        }
        // Credentials are not part of a site's identity; http(s) URLs always accept these
        let _ = root.set_username("");
        let _ = root.set_password(None);
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);

        Ok(Self { root })
    }

    /// Returns the URL scheme (`http` or `https`)
    pub fn scheme(&self) -> &str {
        self.root.scheme()
    }

    /// Returns the lowercase host
    pub fn host(&self) -> &str {
        self.root.host_str().unwrap_or_default()
    }

    /// Returns the effective port, falling back to the scheme default
    pub fn port(&self) -> u16 {
        self.root
            .port_or_known_default()
            .unwrap_or(if self.scheme() == "https" { 443 } else { 80 })
    }

    /// Returns the site root URL (path `/`)
    pub fn url(&self) -> &Url {
        &self.root
    }

    /// Returns the URL of this site's robots.txt
    pub fn robots_txt_url(&self) -> Url {
        let mut url = self.root.clone();
        url.set_path(super::ROBOTS_TXT_PATH);
        url
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root.as_str())
    }
}
