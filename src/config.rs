//! Client configuration
//!
//! [`ClientConfig`] is the construction contract shared by the async and
//! blocking clients. Only the API key is required; everything else has the
//! service defaults.
//!
//! ```rust
//! use screencraft::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new("your-api-key")
//!     .with_timeout(Duration::from_secs(90))
//!     .with_max_retries(5);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{Error, Result};
use crate::retry::RetryConfig;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://screencraftapi.com/api/v1";

/// Default per-attempt request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("screencraft-rust/", env!("CARGO_PKG_VERSION"));

/// Settings for a ScreenCraft client
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Timeout for each individual attempt, not the whole retry loop
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Default configuration for the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Set the API base URL; a trailing slash is ignored
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-attempt request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the whole retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set maximum number of retries after the first attempt
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry.base_delay = delay;
        self
    }

    /// Set maximum delay between retries
    pub fn with_retry_max_delay(mut self, delay: Duration) -> Self {
        self.retry.max_delay = delay;
        self
    }

    /// Set backoff multiplier for exponential growth
    pub fn with_retry_backoff(mut self, multiplier: f64) -> Self {
        self.retry.backoff_multiplier = multiplier;
        self
    }

    /// Override the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject configurations that could never make a successful request.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("API key is required".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::Configuration("base URL must not be empty".into()));
        }
        let url = Url::parse(&self.endpoint_url("")).map_err(|e| {
            Error::Configuration(format!("invalid base URL {:?}: {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "base URL must use http or https, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Join the base URL and an endpoint path.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}
