//! Configuration for the family companion client.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Configuration for [`FamilyClient`](crate::FamilyClient).
///
/// It's recommended to load these values from environment variables or
/// a secure config source.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the VetSupport ecosystem.
    pub url: Url,

    /// API key identifying this companion app.
    pub api_key: String,

    /// Per-request timeout applied to the shared HTTP client.
    pub request_timeout: Option<Duration>,

    /// Spacing between connection-health probes.
    pub health_check_interval: Duration,

    /// Where to keep the veteran-connection pointer across restarts.
    /// `None` keeps it in memory only.
    pub connection_cache_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str, api_key: impl Into<String>) -> Result<Self, Error> {
        let url = Url::parse(url_str)?;
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config("api_key cannot be empty".to_string()));
        }
        Ok(Self {
            url,
            api_key,
            request_timeout: Some(Duration::from_secs(30)),
            health_check_interval: Duration::from_secs(30),
            connection_cache_path: None,
        })
    }

    /// Attempts to create configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        let url_str = std::env::var("VETSUPPORT_URL").map_err(|_| {
            Error::Config("VETSUPPORT_URL environment variable not found".to_string())
        })?;
        let api_key = std::env::var("VETSUPPORT_API_KEY").map_err(|_| {
            Error::Config("VETSUPPORT_API_KEY environment variable not found".to_string())
        })?;
        Self::new(&url_str, api_key)
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the spacing between health probes.
    pub fn with_health_check_interval(mut self, value: Duration) -> Self {
        self.health_check_interval = value;
        self
    }

    /// Persist the veteran-connection pointer at `path`.
    pub fn with_connection_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.connection_cache_path = Some(path.into());
        self
    }

    /// Base URL without a trailing slash, ready for endpoint joining.
    pub(crate) fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }
}
