//! HTTP transports
//!
//! The request engines talk to the network through [`Transport`] (async) or
//! [`BlockingTransport`]. Each call sends one prepared [`ApiRequest`] and
//! returns the full [`RawResponse`], whatever its status; classifying error
//! statuses and retrying is the engine's job.
//!
//! The reqwest-backed implementations create their connection pool on first
//! use, reuse it across calls, and release it on [`Transport::close`] or drop.

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A fully prepared request, ready to be sent any number of times
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// Timeout for this attempt
    pub timeout: Duration,
}

/// Status, headers and body of a completed round-trip
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Header value parsed as an unsigned integer
    pub fn header_u64(&self, name: &str) -> Option<u64> {
        self.header(name).and_then(|value| value.trim().parse().ok())
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Async HTTP transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the whole response.
    ///
    /// Only transport-level failures are errors; any HTTP status is a response.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse>;

    /// Release pooled connections. The transport may reopen on next use.
    fn close(&self) {}
}

/// Blocking HTTP transport
pub trait BlockingTransport: Send + Sync {
    /// Send the request and read the whole response.
    fn send(&self, request: &ApiRequest) -> Result<RawResponse>;

    /// Release pooled connections. The transport may reopen on next use.
    fn close(&self) {}
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        (**self).send(request).await
    }

    fn close(&self) {
        (**self).close()
    }
}

impl<T: BlockingTransport + ?Sized> BlockingTransport for Arc<T> {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        (**self).send(request)
    }

    fn close(&self) {
        (**self).close()
    }
}

/// Map a reqwest failure onto the taxonomy.
fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("Request timed out: {}", err))
    } else if err.is_connect() || err.is_request() || err.is_body() {
        Error::Connection(format!("Failed to connect to ScreenCraft API: {}", err))
    } else {
        Error::Http(err)
    }
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// reqwest-backed async transport
#[derive(Debug, Default)]
pub struct HttpTransport {
    session: Mutex<Option<reqwest::Client>>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured reqwest client (proxy, TLS roots, ...)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            session: Mutex::new(Some(client)),
        }
    }

    /// Whether a connection pool is currently held
    pub fn is_open(&self) -> bool {
        lock(&self.session).is_some()
    }

    fn session(&self) -> Result<reqwest::Client> {
        let mut session = lock(&self.session);
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }
        tracing::debug!("Opening HTTP session");
        let client = reqwest::Client::builder().build()?;
        *session = Some(client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let client = self.session()?;

        let mut builder = client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    fn close(&self) {
        if lock(&self.session).take().is_some() {
            tracing::debug!("Closed HTTP session");
        }
    }
}

/// reqwest-backed blocking transport
///
/// Must not be used from inside an async runtime; use [`HttpTransport`] there.
#[derive(Debug, Default)]
pub struct BlockingHttpTransport {
    session: Mutex<Option<reqwest::blocking::Client>>,
}

impl BlockingHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            session: Mutex::new(Some(client)),
        }
    }

    pub fn is_open(&self) -> bool {
        lock(&self.session).is_some()
    }

    fn session(&self) -> Result<reqwest::blocking::Client> {
        let mut session = lock(&self.session);
        if let Some(client) = session.as_ref() {
            return Ok(client.clone());
        }
        tracing::debug!("Opening blocking HTTP session");
        let client = reqwest::blocking::Client::builder().build()?;
        *session = Some(client.clone());
        Ok(client)
    }
}

impl BlockingTransport for BlockingHttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let client = self.session()?;

        let mut builder = client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(transport_error)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    fn close(&self) {
        if lock(&self.session).take().is_some() {
            tracing::debug!("Closed blocking HTTP session");
        }
    }
}
