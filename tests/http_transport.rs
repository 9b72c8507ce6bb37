//! End-to-end tests of the reqwest transports against a local HTTP server.

use mockito::Matcher;
use screencraft::{
    BlockingScreenCraftClient, ClientConfig, Error, PdfOptions, ScreenCraftClient,
    ScreenshotOptions,
};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

fn config(server_url: &str) -> ClientConfig {
    ClientConfig::new("test-key")
        .with_base_url(format!("{}/api/v1", server_url))
        .with_timeout(Duration::from_secs(5))
        .with_retry_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn screenshot_sends_auth_and_reads_metadata() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/screenshots")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_header("user-agent", Matcher::Regex("^screencraft-rust/".into()))
        .match_body(Matcher::PartialJson(json!({
            "url": "https://example.com",
            "fullPage": true,
            "viewport": {"width": 1920, "height": 1080}
        })))
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_header("x-request-id", "req_e2e")
        .with_header("x-credits-used", "1")
        .with_header("x-credits-remaining", "499")
        .with_body(b"\x89PNG\r\n")
        .create_async()
        .await;

    let client = ScreenCraftClient::with_config(config(&server.url())).unwrap();
    let shot = assert_ok!(
        client
            .screenshot(
                ScreenshotOptions::full_page("https://example.com").with_viewport_preset("desktop")
            )
            .await
    );

    assert_eq!(shot.data.as_ref(), b"\x89PNG\r\n");
    assert_eq!(shot.content_type.as_deref(), Some("image/png"));
    assert_eq!(shot.request_id.as_deref(), Some("req_e2e"));
    assert_eq!(shot.credits_used, Some(1));
    assert_eq!(shot.credits_remaining, Some(499));
    mock.assert_async().await;
    assert!(client.transport().is_open());

    client.close();
    assert!(!client.transport().is_open());
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/api/v1/pdfs")
        .with_status(500)
        .with_body(r#"{"error": "renderer crashed"}"#)
        .expect(2)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/api/v1/pdfs")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_header("x-page-count", "4")
        .with_body("%PDF-1.7")
        .create_async()
        .await;

    let client = ScreenCraftClient::with_config(config(&server.url())).unwrap();
    let pdf = assert_ok!(client.pdf(PdfOptions::a4("https://example.com")).await);

    assert_eq!(pdf.page_count, Some(4));
    failing.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn exhausted_retries_return_server_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/account")
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(3)
        .create_async()
        .await;

    let client =
        ScreenCraftClient::with_config(config(&server.url()).with_max_retries(2)).unwrap();
    let err = assert_err!(client.account_info().await);

    assert!(matches!(err, Error::Server { status: 503, .. }));
    assert_eq!(err.message(), "Service Unavailable");
    mock.assert_async().await;
}

#[tokio::test]
async fn validation_error_carries_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/screenshots")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "Invalid selector", "field": "waitForSelector"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = ScreenCraftClient::with_config(config(&server.url())).unwrap();
    let err = assert_err!(
        client
            .screenshot(ScreenshotOptions::new("https://example.com").with_wait_for_selector("###"))
            .await
    );

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.field(), Some("waitForSelector"));
    assert_eq!(err.to_string(), "[400] Invalid selector");
    mock.assert_async().await;
}

#[tokio::test]
async fn rate_limit_waits_for_retry_after() {
    let mut server = mockito::Server::new_async().await;
    let limited = server
        .mock("GET", "/api/v1/account")
        .with_status(429)
        .with_header("retry-after", "1")
        .with_body(r#"{"message": "Too many requests"}"#)
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("GET", "/api/v1/account")
        .with_status(200)
        .with_body(r#"{"email": "dev@example.com", "plan": "pro", "creditsRemaining": 10}"#)
        .create_async()
        .await;

    let client = ScreenCraftClient::with_config(config(&server.url())).unwrap();
    let start = Instant::now();
    let info = assert_ok!(client.account_info().await);

    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(info.credits_remaining, 10);
    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn unreachable_host_is_connection_error() {
    let config = ClientConfig::new("test-key")
        .with_base_url("http://127.0.0.1:1/api/v1")
        .with_max_retries(0);
    let client = ScreenCraftClient::with_config(config).unwrap();

    let err = assert_err!(client.account_info().await);
    assert!(matches!(err, Error::Connection(_)), "{:?}", err);
}

#[test]
fn blocking_client_round_trip() {
    let mut server = mockito::Server::new();
    let failing = server
        .mock("POST", "/api/v1/screenshots")
        .with_status(502)
        .expect(1)
        .create();
    let ok = server
        .mock("POST", "/api/v1/screenshots")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_header("x-request-id", "req_sync")
        .with_body("jpeg")
        .create();

    let client = BlockingScreenCraftClient::with_config(config(&server.url())).unwrap();
    let shot = assert_ok!(client.screenshot_url("https://example.com"));

    assert_eq!(shot.data.as_ref(), b"jpeg");
    assert_eq!(shot.request_id.as_deref(), Some("req_sync"));
    failing.assert();
    ok.assert();
}

#[test]
fn blocking_authentication_is_not_retried() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/v1/account")
        .with_status(401)
        .with_body(r#"{"error": "Invalid API key"}"#)
        .expect(1)
        .create();

    let client = BlockingScreenCraftClient::with_config(config(&server.url())).unwrap();
    let err = assert_err!(client.account_info());

    assert!(matches!(err, Error::Authentication { .. }));
    mock.assert();
}
