//! Error types for the ScreenCraft SDK.
//!
//! Every fallible operation returns [`Result`], whose error side is the closed
//! [`Error`] taxonomy below. Response-derived errors carry the HTTP status and
//! the parsed JSON body so callers can branch programmatically.
//!
//! # Error Types
//!
//! | Error | Status | Retried by the engine |
//! |-------|--------|-----------------------|
//! | [`Error::Api`] | any other | No |
//! | [`Error::Authentication`] | 401 | No |
//! | [`Error::RateLimit`] | 429 | Yes (honors `Retry-After`) |
//! | [`Error::Validation`] | 400 | No |
//! | [`Error::NotFound`] | 404 | No |
//! | [`Error::Server`] | 5xx | Yes |
//! | [`Error::Timeout`] | - | Yes |
//! | [`Error::Connection`] | - | Yes |
//! | [`Error::Webhook`] | - | No |
//! | [`Error::RetryExhausted`] | - | No |
//! | [`Error::Configuration`] | - | No |
//! | [`Error::Http`] | - | No |
//! | [`Error::Json`] | - | No |
//!
//! # Example
//!
//! ```rust,no_run
//! use screencraft::{Error, ScreenCraftClient, ScreenshotOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ScreenCraftClient::new(std::env::var("SCREENCRAFT_API_KEY")?)?;
//!
//! match client.screenshot(ScreenshotOptions::new("https://example.com")).await {
//!     Ok(shot) => println!("captured {} bytes", shot.data.len()),
//!     Err(Error::Authentication { message, .. }) => {
//!         println!("Auth failed: {} - check your API key", message);
//!     }
//!     Err(Error::Validation { field, message, .. }) => {
//!         println!("Rejected field {:?}: {}", field, message);
//!     }
//!     Err(Error::RateLimit { retry_after, .. }) => {
//!         println!("Still rate limited, server asked for {:?}s", retry_after);
//!     }
//!     Err(e) => println!("Failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;
use thiserror::Error;

/// Result type alias using the SDK's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ScreenCraft SDK operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API returned an error status that has no dedicated kind.
    #[error("{}", with_status(.status, .message))]
    Api {
        /// Human-readable message
        message: String,
        /// HTTP status code, when one was received
        status: Option<u16>,
        /// Parsed JSON error body, if the body was a JSON object
        body: Option<Value>,
    },

    /// Invalid or missing API key (HTTP 401).
    #[error("[401] {message}")]
    Authentication {
        message: String,
        body: Option<Value>,
    },

    /// Rate limit exceeded (HTTP 429).
    ///
    /// `retry_after` comes from the `Retry-After` header and is `None` when the
    /// server omitted it.
    #[error("[429] {message}")]
    RateLimit {
        message: String,
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
        body: Option<Value>,
    },

    /// Invalid request parameters (HTTP 400).
    ///
    /// Also raised locally, before any network call, when options fail
    /// validation or a viewport preset name is unknown.
    #[error("[400] {message}")]
    Validation {
        message: String,
        /// Offending field, from the response body's `field` key
        field: Option<String>,
        body: Option<Value>,
    },

    /// Requested resource does not exist (HTTP 404).
    #[error("[404] {message}")]
    NotFound {
        message: String,
        body: Option<Value>,
    },

    /// Server error (HTTP 5xx).
    #[error("[{status}] {message}")]
    Server {
        /// HTTP status code (500-599)
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// The per-attempt transport timeout expired.
    #[error("{0}")]
    Timeout(String),

    /// Connection to the API could not be established or was interrupted.
    #[error("{0}")]
    Connection(String),

    /// A received webhook payload could not be parsed or validated.
    #[error("{0}")]
    Webhook(String),

    /// The retry budget was consumed without a typed failure to report.
    #[error("All {attempts} retry attempts exhausted: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// Client construction misuse, such as an empty API key.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// HTTP client error that is neither a timeout nor a connection failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn with_status(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("[{}] {}", code, message),
        None => message.to_string(),
    }
}

impl Error {
    /// Build a validation error that was detected locally.
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            field: Some(field.into()),
            body: None,
        }
    }

    /// Classify an HTTP error response into the taxonomy.
    ///
    /// The message is taken from the JSON body's `error` key, then `message`,
    /// then the raw body text, then a synthesized `HTTP {status}`. Bodies that
    /// are not a JSON object are treated as plain text.
    pub fn from_response(status: u16, headers: &HeaderMap, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let parsed = serde_json::from_slice::<Value>(body)
            .ok()
            .filter(Value::is_object);

        let message = match &parsed {
            Some(json) => json
                .get("error")
                .filter(|value| !value.is_null())
                .or_else(|| json.get("message").filter(|value| !value.is_null()))
                .map(|value| match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| text.to_string()),
            None if !text.is_empty() => text.to_string(),
            None => format!("HTTP {}", status),
        };

        match status {
            401 => Error::Authentication {
                message,
                body: parsed,
            },
            429 => Error::RateLimit {
                message,
                retry_after: parse_retry_after(headers),
                body: parsed,
            },
            400 => {
                let field = parsed
                    .as_ref()
                    .and_then(|json| json.get("field"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Error::Validation {
                    message,
                    field,
                    body: parsed,
                }
            }
            404 => Error::NotFound {
                message,
                body: parsed,
            },
            s if s >= 500 => Error::Server {
                status: s,
                message,
                body: parsed,
            },
            s => Error::Api {
                message,
                status: Some(s),
                body: parsed,
            },
        }
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            Error::Authentication { .. } => Some(401),
            Error::RateLimit { .. } => Some(429),
            Error::Validation { .. } => Some(400),
            Error::NotFound { .. } => Some(404),
            Error::Server { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Parsed JSON body of the error response, if it was a JSON object.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            Error::Api { body, .. }
            | Error::Authentication { body, .. }
            | Error::RateLimit { body, .. }
            | Error::Validation { body, .. }
            | Error::NotFound { body, .. }
            | Error::Server { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Human-readable message without the status prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Api { message, .. }
            | Error::Authentication { message, .. }
            | Error::RateLimit { message, .. }
            | Error::Validation { message, .. }
            | Error::NotFound { message, .. }
            | Error::Server { message, .. } => message.clone(),
            Error::Timeout(message)
            | Error::Connection(message)
            | Error::Webhook(message)
            | Error::Configuration(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Seconds the server asked us to wait, for [`Error::RateLimit`] only.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Offending field name, for [`Error::Validation`] only.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Whether the request engine treats this kind as transient.
    ///
    /// ```rust
    /// use screencraft::Error;
    ///
    /// assert!(Error::Timeout("slow".into()).is_retryable());
    /// assert!(!Error::validation("bad quality", "quality").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Timeout(_)
                | Error::Connection(_)
                | Error::Server { .. }
                | Error::RateLimit { .. }
        )
    }
}

/// Parse `Retry-After` as whole seconds. Missing, zero or non-numeric values
/// count as no hint.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|seconds| *seconds > 0)
}
