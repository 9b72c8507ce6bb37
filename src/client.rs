//! Async ScreenCraft client

use crate::config::ClientConfig;
use crate::engine::RequestEngine;
use crate::error::{Error, Result};
use crate::response::{AccountInfo, PdfResponse, ScreenshotResponse, WebhookJob};
use crate::transport::{HttpTransport, Transport};
use crate::types::{PdfOptions, ScreenshotOptions, WebhookConfig};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

pub(crate) const SCREENSHOTS_ENDPOINT: &str = "/screenshots";
pub(crate) const PDFS_ENDPOINT: &str = "/pdfs";
pub(crate) const ACCOUNT_ENDPOINT: &str = "/account";

/// Resolve, validate and serialize screenshot options.
pub(crate) fn screenshot_payload(options: ScreenshotOptions) -> Result<(String, Value)> {
    let options = options.resolve_viewport_preset()?;
    options.validate()?;
    let body = serde_json::to_value(&options)?;
    Ok((options.url, body))
}

pub(crate) fn pdf_payload(options: PdfOptions) -> Result<(String, Value)> {
    options.validate()?;
    let body = serde_json::to_value(&options)?;
    Ok((options.url, body))
}

/// Webhook deliveries need somewhere to deliver to.
pub(crate) fn require_webhook(webhook: Option<&WebhookConfig>) -> Result<()> {
    match webhook {
        Some(webhook) if !webhook.url.trim().is_empty() => Ok(()),
        _ => Err(Error::validation(
            "webhook URL is required for webhook delivery",
            "webhook.url",
        )),
    }
}

/// ScreenCraft API client
///
/// Calls can run concurrently from many tasks; they share one connection pool,
/// which is opened on first use and released by [`close`](Self::close) or when
/// the client is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use screencraft::{ScreenCraftClient, ScreenshotOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ScreenCraftClient::new(std::env::var("SCREENCRAFT_API_KEY")?)?;
///
///     let shot = client
///         .screenshot(ScreenshotOptions::full_page("https://example.com"))
///         .await?;
///     std::fs::write("example.png", &shot.data)?;
///
///     Ok(())
/// }
/// ```
pub struct ScreenCraftClient<T = HttpTransport> {
    engine: RequestEngine<T>,
}

impl ScreenCraftClient<HttpTransport> {
    /// Create a client with default settings.
    ///
    /// Fails with [`Error::Configuration`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> ScreenCraftClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        Ok(Self {
            engine: RequestEngine::new(config, transport)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.engine.config()
    }

    pub fn transport(&self) -> &T {
        self.engine.transport()
    }

    /// Capture a screenshot.
    ///
    /// A viewport preset name is resolved before sending; unknown names fail
    /// with [`Error::Validation`] without a request being made.
    #[instrument(skip(self, options), fields(url = %options.url))]
    pub async fn screenshot(&self, options: ScreenshotOptions) -> Result<ScreenshotResponse> {
        let (url, body) = screenshot_payload(options)?;
        debug!("Capturing screenshot");

        let raw = self
            .engine
            .execute(Method::POST, SCREENSHOTS_ENDPOINT, Some(&body))
            .await?;
        Ok(ScreenshotResponse::from_raw(url, raw))
    }

    /// Screenshot with default options
    pub async fn screenshot_url(&self, url: impl Into<String>) -> Result<ScreenshotResponse> {
        self.screenshot(ScreenshotOptions::new(url)).await
    }

    /// Queue a screenshot for delivery to `options.webhook`.
    #[instrument(skip(self, options), fields(url = %options.url))]
    pub async fn screenshot_with_webhook(&self, options: ScreenshotOptions) -> Result<WebhookJob> {
        require_webhook(options.webhook.as_ref())?;
        let (_, body) = screenshot_payload(options)?;

        let raw = self
            .engine
            .execute(Method::POST, SCREENSHOTS_ENDPOINT, Some(&body))
            .await?;
        let job = WebhookJob::from_raw(&raw)?;
        debug!("Screenshot queued as job {}", job.job_id);
        Ok(job)
    }

    /// Generate a PDF.
    #[instrument(skip(self, options), fields(url = %options.url))]
    pub async fn pdf(&self, options: PdfOptions) -> Result<PdfResponse> {
        let (url, body) = pdf_payload(options)?;
        debug!("Generating PDF");

        let raw = self
            .engine
            .execute(Method::POST, PDFS_ENDPOINT, Some(&body))
            .await?;
        Ok(PdfResponse::from_raw(url, raw))
    }

    /// A4 PDF with default options
    pub async fn pdf_url(&self, url: impl Into<String>) -> Result<PdfResponse> {
        self.pdf(PdfOptions::new(url)).await
    }

    /// Queue a PDF for delivery to `options.webhook`.
    #[instrument(skip(self, options), fields(url = %options.url))]
    pub async fn pdf_with_webhook(&self, options: PdfOptions) -> Result<WebhookJob> {
        require_webhook(options.webhook.as_ref())?;
        let (_, body) = pdf_payload(options)?;

        let raw = self
            .engine
            .execute(Method::POST, PDFS_ENDPOINT, Some(&body))
            .await?;
        let job = WebhookJob::from_raw(&raw)?;
        debug!("PDF queued as job {}", job.job_id);
        Ok(job)
    }

    /// Current plan and credit usage
    #[instrument(skip(self))]
    pub async fn account_info(&self) -> Result<AccountInfo> {
        let raw = self
            .engine
            .execute(Method::GET, ACCOUNT_ENDPOINT, None)
            .await?;
        raw.json()
    }

    /// Release pooled connections. The client stays usable and reconnects on
    /// the next call.
    pub fn close(&self) {
        self.engine.transport().close();
    }
}
