use serde::Deserialize;

/// Main configuration structure for Sumi-Robots
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the token matched against `User-agent` lines
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default)]
    pub crawler_version: Option<String>,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Creates a configuration carrying only a crawler name
    pub fn new(crawler_name: impl Into<String>) -> Self {
        Self {
            crawler_name: crawler_name.into(),
            crawler_version: None,
            contact_url: None,
            contact_email: None,
        }
    }

    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`, leaving out
    /// whatever is not configured.
    pub fn header_value(&self) -> String {
        let mut value = self.crawler_name.clone();
        if let Some(version) = &self.crawler_version {
            value.push('/');
            value.push_str(version);
        }

        let contact: Vec<String> = self
            .contact_url
            .iter()
            .map(|url| format!("+{}", url))
            .chain(self.contact_email.iter().cloned())
            .collect();
        if !contact.is_empty() {
            value.push_str(&format!(" ({})", contact.join("; ")));
        }

        value
    }
}

/// Outbound request configuration for robots.txt fetches
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Deadline for a robots.txt fetch including all redirects (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,

    /// Skip TLS certificate verification
    #[serde(rename = "accept-invalid-certs", default)]
    pub accept_invalid_certs: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}
