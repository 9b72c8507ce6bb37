//! Blocking ScreenCraft client
//!
//! Same operations and error contract as [`ScreenCraftClient`](crate::ScreenCraftClient),
//! but every call holds the calling thread, including while waiting between
//! retries. Do not use it from inside an async runtime.
//!
//! ```rust,no_run
//! use screencraft::{BlockingScreenCraftClient, PdfOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BlockingScreenCraftClient::new(std::env::var("SCREENCRAFT_API_KEY")?)?;
//!
//!     let pdf = client.pdf(PdfOptions::letter("https://example.com"))?;
//!     println!("{} pages", pdf.page_count.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

use crate::client::{
    pdf_payload, require_webhook, screenshot_payload, ACCOUNT_ENDPOINT, PDFS_ENDPOINT,
    SCREENSHOTS_ENDPOINT,
};
use crate::config::ClientConfig;
use crate::engine::BlockingRequestEngine;
use crate::error::Result;
use crate::response::{AccountInfo, PdfResponse, ScreenshotResponse, WebhookJob};
use crate::transport::{BlockingHttpTransport, BlockingTransport};
use crate::types::{PdfOptions, ScreenshotOptions};
use reqwest::Method;
use tracing::{debug, instrument};

/// Blocking ScreenCraft API client
pub struct BlockingScreenCraftClient<T = BlockingHttpTransport> {
    engine: BlockingRequestEngine<T>,
}

impl BlockingScreenCraftClient<BlockingHttpTransport> {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, BlockingHttpTransport::new())
    }
}

impl<T: BlockingTransport> BlockingScreenCraftClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        Ok(Self {
            engine: BlockingRequestEngine::new(config, transport)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.engine.config()
    }

    pub fn transport(&self) -> &T {
        self.engine.transport()
    }

    #[instrument(skip(self, options), fields(url = %options.url))]
    pub fn screenshot(&self, options: ScreenshotOptions) -> Result<ScreenshotResponse> {
        let (url, body) = screenshot_payload(options)?;
        debug!("Capturing screenshot");

        let raw = self
            .engine
            .execute(Method::POST, SCREENSHOTS_ENDPOINT, Some(&body))?;
        Ok(ScreenshotResponse::from_raw(url, raw))
    }

    pub fn screenshot_url(&self, url: impl Into<String>) -> Result<ScreenshotResponse> {
        self.screenshot(ScreenshotOptions::new(url))
    }

    #[instrument(skip(self, options), fields(url = %options.url))]
    pub fn screenshot_with_webhook(&self, options: ScreenshotOptions) -> Result<WebhookJob> {
        require_webhook(options.webhook.as_ref())?;
        let (_, body) = screenshot_payload(options)?;

        let raw = self
            .engine
            .execute(Method::POST, SCREENSHOTS_ENDPOINT, Some(&body))?;
        WebhookJob::from_raw(&raw)
    }

    #[instrument(skip(self, options), fields(url = %options.url))]
    pub fn pdf(&self, options: PdfOptions) -> Result<PdfResponse> {
        let (url, body) = pdf_payload(options)?;
        debug!("Generating PDF");

        let raw = self.engine.execute(Method::POST, PDFS_ENDPOINT, Some(&body))?;
        Ok(PdfResponse::from_raw(url, raw))
    }

    pub fn pdf_url(&self, url: impl Into<String>) -> Result<PdfResponse> {
        self.pdf(PdfOptions::new(url))
    }

    #[instrument(skip(self, options), fields(url = %options.url))]
    pub fn pdf_with_webhook(&self, options: PdfOptions) -> Result<WebhookJob> {
        require_webhook(options.webhook.as_ref())?;
        let (_, body) = pdf_payload(options)?;

        let raw = self.engine.execute(Method::POST, PDFS_ENDPOINT, Some(&body))?;
        WebhookJob::from_raw(&raw)
    }

    #[instrument(skip(self))]
    pub fn account_info(&self) -> Result<AccountInfo> {
        self.engine
            .execute(Method::GET, ACCOUNT_ENDPOINT, None)?
            .json()
    }

    /// Release pooled connections; the next call reconnects.
    pub fn close(&self) {
        self.engine.transport().close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::mock::{response, ScriptedTransport};
    use crate::transport::RawResponse;
    use crate::types::{PdfFormat, WebhookConfig};
    use std::sync::Arc;
    use std::time::Duration;

    fn client(outcomes: Vec<Result<RawResponse>>) -> BlockingScreenCraftClient<Arc<ScriptedTransport>> {
        let config = ClientConfig::new("test-key")
            .with_base_url("https://api.test/api/v1")
            .with_retry_delay(Duration::from_millis(1));
        BlockingScreenCraftClient::with_transport(config, Arc::new(ScriptedTransport::new(outcomes)))
            .unwrap()
    }

    #[test]
    fn test_new_requires_key() {
        assert!(matches!(
            BlockingScreenCraftClient::new("  "),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_screenshot_retries_server_errors() {
        let client = client(vec![
            Ok(response(500, &[], b"")),
            Ok(response(503, &[], b"")),
            Ok(response(200, &[("X-Request-Id", "req_b")], b"png")),
        ]);

        let shot = client.screenshot_url("https://example.com").unwrap();
        assert_eq!(shot.request_id.as_deref(), Some("req_b"));
        assert_eq!(client.transport().calls(), 3);
    }

    #[test]
    fn test_authentication_not_retried() {
        let client = client(vec![Ok(response(401, &[], br#"{"message": "Invalid API key"}"#))]);

        let err = client.account_info().unwrap_err();
        assert!(matches!(err, Error::Authentication { .. }));
        assert_eq!(err.to_string(), "[401] Invalid API key");
        assert_eq!(client.transport().calls(), 1);
    }

    #[test]
    fn test_pdf() {
        let client = client(vec![Ok(response(
            200,
            &[("X-Page-Count", "2"), ("X-Credits-Used", "2")],
            b"%PDF",
        ))]);

        let pdf = client
            .pdf(PdfOptions::landscape("https://example.com", PdfFormat::Letter))
            .unwrap();
        assert_eq!(pdf.page_count, Some(2));
        assert_eq!(pdf.credits_used, Some(2));

        let request = &client.transport().requests()[0];
        let body: serde_json::Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["format"], "Letter");
        assert_eq!(body["landscape"], true);
    }

    #[test]
    fn test_pdf_with_webhook() {
        let client = client(vec![Ok(response(
            202,
            &[],
            br#"{"success": true, "jobId": "job_pdf", "message": "accepted"}"#,
        ))]);

        let job = client
            .pdf_with_webhook(
                PdfOptions::a4("https://example.com")
                    .with_webhook(WebhookConfig::new("https://hooks.example.com")),
            )
            .unwrap();
        assert_eq!(job.job_id, "job_pdf");

        let err = client
            .screenshot_with_webhook(ScreenshotOptions::new("https://example.com"))
            .unwrap_err();
        assert_eq!(err.field(), Some("webhook.url"));
        assert_eq!(client.transport().calls(), 1);
    }

    #[test]
    fn test_close() {
        let client = client(vec![]);
        client.close();
        client.close();
        assert_eq!(client.transport().closes(), 2);
    }
}
