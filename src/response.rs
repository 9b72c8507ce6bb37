//! Response models
//!
//! Captured artifacts combine the binary body with metadata the service sends
//! in headers. Every metadata field is optional because any header may be
//! missing.

use crate::error::{Error, Result};
use crate::transport::RawResponse;
use bytes::Bytes;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

pub const HEADER_REQUEST_ID: &str = "x-request-id";
pub const HEADER_CREDITS_USED: &str = "x-credits-used";
pub const HEADER_CREDITS_REMAINING: &str = "x-credits-remaining";
pub const HEADER_PAGE_COUNT: &str = "x-page-count";

/// Deserialize an explicit `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata read from response headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub request_id: Option<String>,
    pub credits_used: Option<u64>,
    pub credits_remaining: Option<u64>,
    pub content_type: Option<String>,
    /// Only sent for PDFs
    pub page_count: Option<u64>,
}

impl ResponseMetadata {
    pub fn from_response(raw: &RawResponse) -> Self {
        Self {
            request_id: raw.header(HEADER_REQUEST_ID).map(str::to_string),
            credits_used: raw.header_u64(HEADER_CREDITS_USED),
            credits_remaining: raw.header_u64(HEADER_CREDITS_REMAINING),
            content_type: raw
                .header(reqwest::header::CONTENT_TYPE.as_str())
                .map(str::to_string),
            page_count: raw.header_u64(HEADER_PAGE_COUNT),
        }
    }
}

/// A captured screenshot
#[derive(Debug, Clone)]
pub struct ScreenshotResponse {
    pub success: bool,
    /// Image bytes
    pub data: Bytes,
    /// The URL that was captured
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub credits_used: Option<u64>,
    pub credits_remaining: Option<u64>,
}

impl ScreenshotResponse {
    pub fn from_raw(url: impl Into<String>, raw: RawResponse) -> Self {
        let meta = ResponseMetadata::from_response(&raw);
        Self {
            success: true,
            data: raw.body,
            url: Some(url.into()),
            content_type: meta.content_type,
            request_id: meta.request_id,
            credits_used: meta.credits_used,
            credits_remaining: meta.credits_remaining,
        }
    }
}

/// A generated PDF
#[derive(Debug, Clone)]
pub struct PdfResponse {
    pub success: bool,
    /// PDF bytes
    pub data: Bytes,
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub page_count: Option<u64>,
    pub credits_used: Option<u64>,
    pub credits_remaining: Option<u64>,
}

impl PdfResponse {
    pub fn from_raw(url: impl Into<String>, raw: RawResponse) -> Self {
        let meta = ResponseMetadata::from_response(&raw);
        Self {
            success: true,
            data: raw.body,
            url: Some(url.into()),
            content_type: meta.content_type,
            request_id: meta.request_id,
            page_count: meta.page_count,
            credits_used: meta.credits_used,
            credits_remaining: meta.credits_remaining,
        }
    }
}

/// Acknowledgement of a capture queued for webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookJob {
    pub job_id: String,
    pub request_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobAck {
    #[serde(default, deserialize_with = "null_as_default")]
    success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    job_id: String,
    message: Option<String>,
}

impl WebhookJob {
    /// Parse the `{success, jobId, message}` acknowledgement.
    ///
    /// A body reporting `success: false` becomes [`Error::Api`] carrying the
    /// HTTP status and the service message.
    pub fn from_raw(raw: &RawResponse) -> Result<Self> {
        let ack: JobAck = raw.json()?;
        if !ack.success {
            return Err(Error::Api {
                message: ack
                    .message
                    .unwrap_or_else(|| "Webhook job was not accepted".to_string()),
                status: Some(raw.status),
                body: raw.json().ok(),
            });
        }

        Ok(Self {
            job_id: ack.job_id,
            request_id: raw.header(HEADER_REQUEST_ID).map(str::to_string),
            message: ack.message,
        })
    }
}

/// Account details and credit usage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub plan: String,
    #[serde(deserialize_with = "null_as_default")]
    pub credits_remaining: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub credits_used: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub credits_total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub api_calls_this_month: u64,
}

impl AccountInfo {
    /// Credit reset date, accepting either an RFC 3339 timestamp or a bare
    /// `YYYY-MM-DD` date.
    pub fn parsed_reset_date(&self) -> Option<NaiveDate> {
        let raw = self.reset_date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|timestamp| timestamp.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}
