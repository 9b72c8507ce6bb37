//! Generate a PDF with the blocking client
//!
//! Run with:
//! ```bash
//! export SCREENCRAFT_API_KEY="your-api-key"
//! cargo run --example blocking_pdf -- https://doc.rust-lang.org/book/
//! ```

use screencraft::{BlockingScreenCraftClient, ClientConfig, PdfFormat, PdfMargins, PdfOptions};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("SCREENCRAFT_API_KEY")
        .expect("SCREENCRAFT_API_KEY environment variable must be set");
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    // Long documents take a while to render
    let config = ClientConfig::new(api_key)
        .with_timeout(Duration::from_secs(120))
        .with_max_retries(5);
    let client = BlockingScreenCraftClient::with_config(config)?;

    let options = PdfOptions::new(&url)
        .with_format(PdfFormat::Letter)
        .with_margins(PdfMargins::uniform("1cm"))
        .with_header_footer(
            "<div style=\"font-size:8px\"><span class=\"title\"></span></div>",
            "<div style=\"font-size:8px\"><span class=\"pageNumber\"></span></div>",
        );

    println!("Rendering {}...", url);
    let pdf = client.pdf(options)?;

    std::fs::write("page.pdf", &pdf.data)?;
    println!(
        "Saved page.pdf: {} pages, {} bytes",
        pdf.page_count.unwrap_or_default(),
        pdf.data.len()
    );

    Ok(())
}
