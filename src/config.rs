//! Configuration for talking to the classification service.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The base URL is an explicit value handed to
//! [`crate::client::ApiClient::new`], so two clients pointing at different
//! services (or a test mock) can coexist in one process.

use crate::error::ClientError;

/// Environment variable that overrides the service base URL.
pub const API_URL_ENV: &str = "VITE_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Configuration for an [`crate::client::ApiClient`].
///
/// # Example
/// ```rust
/// use kidney_classify::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://127.0.0.1:9000/")
///     .request_timeout_secs(15)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://127.0.0.1:9000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, without a trailing slash. Default: `http://localhost:8080`.
    pub base_url: String,

    /// Timeout for `/predict`, `/model-info` and `/train` in seconds. Default: 30.
    ///
    /// Bounds how long the view can stay in `Uploading`.
    pub request_timeout_secs: u64,

    /// Timeout for the `/health` probe in seconds. Default: 10.
    pub health_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            health_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults, with the base URL taken from `VITE_API_URL` when it is set
    /// and non-empty.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                builder = builder.base_url(url);
            }
        }
        builder.build()
    }

    /// Join an endpoint path (`"/health"`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn health_timeout_secs(mut self, secs: u64) -> Self {
        self.config.health_timeout_secs = secs.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let c = &self.config;
        if !is_http_url(&c.base_url) {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        Ok(self.config)
    }
}

/// Check if the string looks like an HTTP(S) URL.
pub fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
