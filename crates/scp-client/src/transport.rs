//! The HTTP transport seam.
//!
//! [`Transport`] issues an already-signed request and hands back the status and
//! raw text. It owns connection-level concerns (TLS, timeouts); signing and
//! outcome classification stay in [`crate::OpenApiClient`].
//!
//! # Object safety
//!
//! The trait uses `#[async_trait]` so it stays usable as `dyn Transport`.

use std::time::Duration;

use bytes::Bytes;
use scp_core::ScpConfig;
use tracing::warn;

/// One signed request, ready to go on the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Absolute `https://` URL.
    pub url: String,
    /// Signed headers (`Content-Type`, `X-Amz-Date`, `X-Amz-Content-Sha256`,
    /// `Authorization`).
    pub headers: http::HeaderMap,
    /// The exact bytes that were hashed into the signature.
    pub body: Bytes,
}

/// The raw outcome of a request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Response status.
    pub status: http::StatusCode,
    /// Response body as text.
    pub body: String,
}

/// A request that never produced a response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends signed requests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }
}

/// Transport options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Accept self-signed or otherwise invalid certificates.
    pub insecure_skip_tls_verify: bool,
    /// Overall per-request timeout.
    pub timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            insecure_skip_tls_verify: false,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&ScpConfig> for TransportOptions {
    fn from(config: &ScpConfig) -> Self {
        Self {
            insecure_skip_tls_verify: config.insecure_skip_tls_verify,
            timeout: config.request_timeout(),
        }
    }
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying client.
    ///
    /// Certificate verification stays on unless
    /// [`TransportOptions::insecure_skip_tls_verify`] is set.
    pub fn new(options: TransportOptions) -> Result<Self, TransportError> {
        if options.insecure_skip_tls_verify {
            warn!("TLS certificate verification is disabled for open-api requests");
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.insecure_skip_tls_verify)
            .timeout(options.timeout)
            .build()
            .map_err(|e| TransportError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read response body: {e}")))?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_verify_certificates_by_default() {
        assert!(!TransportOptions::default().insecure_skip_tls_verify);
    }

    #[test]
    fn test_should_take_options_from_config() {
        let config = ScpConfig::builder()
            .insecure_skip_tls_verify(true)
            .request_timeout_secs(7)
            .build();
        let options = TransportOptions::from(&config);

        assert!(options.insecure_skip_tls_verify);
        assert_eq!(options.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_should_build_reqwest_transport() {
        assert!(ReqwestTransport::new(TransportOptions::default()).is_ok());
    }
}
