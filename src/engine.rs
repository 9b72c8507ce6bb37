//! Request execution with authentication, classification and retries
//!
//! [`RequestEngine`] and [`BlockingRequestEngine`] share every decision: the
//! request is prepared once by [`prepare_request`], each round-trip is settled
//! by [`settle`], and the loop runs through [`RetryState`](crate::retry::RetryState)
//! via the matching retry driver. The two engines differ only in how they wait.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::retry::{retry_blocking, retry_with_backoff};
use crate::transport::{ApiRequest, BlockingTransport, RawResponse, Transport};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

/// Build the request sent on every attempt of one logical call.
pub fn prepare_request(
    config: &ClientConfig,
    method: Method,
    endpoint: &str,
    body: Option<&Value>,
) -> Result<ApiRequest> {
    let mut headers = HeaderMap::new();
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
        Error::Configuration("API key contains characters not allowed in a header".into())
    })?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent)
            .map_err(|_| Error::Configuration("invalid user agent".into()))?,
    );

    let body = body.map(serde_json::to_vec).transpose()?;

    Ok(ApiRequest {
        method,
        url: config.endpoint_url(endpoint),
        headers,
        body,
        timeout: config.timeout,
    })
}

/// Turn a round-trip outcome into success or a typed failure.
///
/// Statuses below 400 pass through; anything else is classified with
/// [`Error::from_response`]. Transport failures are returned unchanged.
pub fn settle(outcome: Result<RawResponse>) -> Result<RawResponse> {
    let response = outcome?;
    debug!("Received response with status: {}", response.status);
    if response.is_success() {
        Ok(response)
    } else {
        Err(Error::from_response(
            response.status,
            &response.headers,
            &response.body,
        ))
    }
}

/// Async request engine
pub struct RequestEngine<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> RequestEngine<T> {
    /// Fails with [`Error::Configuration`] before any network activity if the
    /// configuration is unusable.
    pub fn new(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a request, retrying transient failures.
    ///
    /// Returns the first response with a status below 400. Otherwise the last
    /// typed failure is returned once the retry policy gives up.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let request = prepare_request(&self.config, method, endpoint, body)?;
        debug!("Sending {} request to {}", request.method, request.url);

        let (transport, request) = (&self.transport, &request);
        retry_with_backoff(&self.config.retry, || async move {
            settle(transport.send(request).await)
        })
        .await
    }
}

/// Blocking request engine; sleeps the calling thread between attempts
pub struct BlockingRequestEngine<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: BlockingTransport> BlockingRequestEngine<T> {
    pub fn new(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Blocking twin of [`RequestEngine::execute`].
    pub fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let request = prepare_request(&self.config, method, endpoint, body)?;
        debug!("Sending {} request to {}", request.method, request.url);

        retry_blocking(&self.config.retry, || settle(self.transport.send(&request)))
    }
}
