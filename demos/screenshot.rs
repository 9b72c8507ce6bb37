//! Capture a screenshot with the async client
//!
//! This example demonstrates:
//! - Creating a client from an API key
//! - Selecting a viewport preset
//! - Reading credit metadata from the response
//!
//! Run with:
//! ```bash
//! export SCREENCRAFT_API_KEY="your-api-key"
//! cargo run --example screenshot -- https://www.rust-lang.org
//! ```

use screencraft::{Error, ImageFormat, ScreenCraftClient, ScreenshotOptions, WaitUntil};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing to see retry warnings
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("SCREENCRAFT_API_KEY")
        .expect("SCREENCRAFT_API_KEY environment variable must be set");
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    let client = ScreenCraftClient::new(api_key)?;

    let options = ScreenshotOptions::full_page(&url)
        .with_format(ImageFormat::Jpeg)
        .with_quality(85)
        .with_viewport_preset("iphone_14")
        .with_wait_until(WaitUntil::NetworkIdle0)
        .with_block_ads(true);

    println!("Capturing {}...", url);

    match client.screenshot(options).await {
        Ok(shot) => {
            std::fs::write("screenshot.jpg", &shot.data)?;
            println!("Saved screenshot.jpg ({} bytes)", shot.data.len());
            println!("Request id: {:?}", shot.request_id);
            println!(
                "Credits used: {:?}, remaining: {:?}",
                shot.credits_used, shot.credits_remaining
            );
        }
        Err(Error::RateLimit { retry_after, .. }) => {
            println!("Still rate limited after retries (retry after {:?}s)", retry_after);
        }
        Err(e) => return Err(e.into()),
    }

    let account = client.account_info().await?;
    println!(
        "\nPlan: {} | {}/{} credits left",
        account.plan, account.credits_remaining, account.credits_total
    );

    client.close();
    Ok(())
}
