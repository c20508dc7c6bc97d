//! Transport abstraction and the reqwest-backed implementation.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tracing::trace;

use crate::{Request, Response, Result};

/// Sends a single request and returns the fully read response.
///
/// Implementations must be safe to share between concurrent evaluations.
/// Failures before an HTTP status is known are reported as errors; any
/// status, including 4xx/5xx, is a successful send.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Transport settings used when the client builds its own reqwest client.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("wings-http-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// [`Transport`] over a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a reqwest client from the given settings.
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(&settings.user_agent)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { inner })
    }

    /// Wrap a caller-supplied reqwest client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let (method, url, headers, body) = request.into_parts();
        trace!(method = %method, url = %url, "Sending HTTP request");

        let response = self
            .inner
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        trace!(status = %response.status(), "Received HTTP response");
        Response::from_reqwest(response).await
    }
}
