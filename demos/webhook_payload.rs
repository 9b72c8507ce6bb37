//! Queue a capture for webhook delivery and parse the callback body
//!
//! The callback is normally received by your own HTTP server; here a sample
//! body is parsed directly.
//!
//! Run with:
//! ```bash
//! export SCREENCRAFT_API_KEY="your-api-key"
//! export SCREENCRAFT_WEBHOOK_URL="https://yoursite.com/webhooks/screencraft"
//! cargo run --example webhook_payload
//! ```

use anyhow::Context;
use screencraft::{ScreenCraftClient, ScreenshotOptions, WebhookConfig, WebhookPayload};

const SAMPLE_CALLBACK: &str = r#"{
    "requestId": "req_8f2c",
    "status": "success",
    "url": "https://example.com",
    "resultUrl": "https://cdn.screencraftapi.com/results/req_8f2c.png",
    "timestamp": "2024-01-15T10:30:00Z",
    "metadata": {"orderId": 1234}
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    if let (Ok(api_key), Ok(webhook_url)) = (
        std::env::var("SCREENCRAFT_API_KEY"),
        std::env::var("SCREENCRAFT_WEBHOOK_URL"),
    ) {
        let client = ScreenCraftClient::new(api_key)?;
        let options = ScreenshotOptions::full_page("https://example.com").with_webhook(
            WebhookConfig::new(webhook_url)
                .with_secret("change-me")
                .with_header("X-Source", "screencraft-demo"),
        );

        let job = client
            .screenshot_with_webhook(options)
            .await
            .context("failed to queue screenshot")?;
        println!("Queued job {}", job.job_id);
    }

    let payload = WebhookPayload::parse(SAMPLE_CALLBACK.as_bytes())?;
    if payload.is_success() {
        println!(
            "{} finished: {}",
            payload.request_id,
            payload.result_url.as_deref().unwrap_or("<no result url>")
        );
    } else {
        println!(
            "{} failed: {} ({})",
            payload.request_id,
            payload.error_message.as_deref().unwrap_or("unknown error"),
            payload.error_code.as_deref().unwrap_or("-")
        );
    }

    if let Some(at) = payload.parsed_timestamp() {
        println!("Delivered at {}", at);
    }

    Ok(())
}
