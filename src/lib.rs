//! # ScreenCraft SDK for Rust
//!
//! Client for the ScreenCraft API: capture screenshots and generate PDFs of web
//! pages. Requests are authenticated, failures are mapped onto a typed
//! [`Error`], and transient failures (timeouts, connection errors, 5xx, 429)
//! are retried with exponential backoff and jitter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use screencraft::{ScreenCraftClient, ScreenshotOptions, ImageFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ScreenCraftClient::new(std::env::var("SCREENCRAFT_API_KEY")?)?;
//!
//!     let options = ScreenshotOptions::new("https://example.com")
//!         .with_format(ImageFormat::Webp)
//!         .with_viewport_preset("iphone_14");
//!
//!     let shot = client.screenshot(options).await?;
//!     println!(
//!         "{} bytes, {:?} credits left",
//!         shot.data.len(),
//!         shot.credits_remaining
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Blocking
//!
//! [`BlockingScreenCraftClient`] offers the same operations without an async
//! runtime:
//!
//! ```rust,no_run
//! use screencraft::BlockingScreenCraftClient;
//!
//! # fn main() -> Result<(), screencraft::Error> {
//! let client = BlockingScreenCraftClient::new("your-api-key")?;
//! let account = client.account_info()?;
//! println!("{} credits remaining on {}", account.credits_remaining, account.plan);
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod presets;
pub mod response;
pub mod retry;
pub mod transport;
pub mod types;
pub mod webhook;

// Re-export main types for convenience
pub use blocking::BlockingScreenCraftClient;
pub use client::ScreenCraftClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use presets::viewport_preset;
pub use response::{AccountInfo, PdfResponse, ResponseMetadata, ScreenshotResponse, WebhookJob};
pub use retry::RetryConfig;
pub use transport::{BlockingHttpTransport, HttpTransport};
pub use types::{
    Clip, Cookie, ImageFormat, PdfFormat, PdfMargins, PdfOptions, SameSite, ScreenshotOptions,
    ScrollPosition, Viewport, WaitUntil, WebhookConfig,
};
pub use webhook::{WebhookPayload, WebhookStatus};
