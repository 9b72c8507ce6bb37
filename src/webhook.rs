//! Webhook callback payloads
//!
//! Captures requested with a webhook are delivered to the caller's endpoint as
//! a JSON callback. Receiving the HTTP request is up to the application; this
//! module only turns the received body into a [`WebhookPayload`].
//!
//! ```rust
//! use screencraft::WebhookPayload;
//!
//! let body = br#"{"requestId": "req_1", "status": "success",
//!                 "url": "https://example.com",
//!                 "resultUrl": "https://cdn.example.com/req_1.png"}"#;
//! let payload = WebhookPayload::parse(body).unwrap();
//! assert!(payload.is_success());
//! ```

use crate::error::{Error, Result};
use crate::response::null_as_default;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Terminal status of a delivered job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    Success,
    #[default]
    Error,
}

/// Parsed webhook callback body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: WebhookStatus,
    /// The URL that was captured
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Where the finished artifact can be downloaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl WebhookPayload {
    /// Parse a raw callback body.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::Webhook(format!("Invalid webhook payload: {}", e)))?;
        Self::from_value(value)
    }

    /// Build a payload from already-decoded JSON.
    ///
    /// Missing fields take their defaults; a non-object body or a status other
    /// than `success`/`error` is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Webhook(
                "Invalid webhook payload: expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::Webhook(format!("Invalid webhook payload: {}", e)))
    }

    pub fn is_success(&self) -> bool {
        self.status == WebhookStatus::Success
    }

    /// The callback timestamp, if present and RFC 3339
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }
}

impl FromStr for WebhookPayload {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }
}
