//! The signed request dispatcher.
//!
//! [`OpenApiClient`] is the only place that turns a path and payload into a
//! signed request. Every call goes through [`OpenApiClient::send_at`]:
//!
//! 1. Serialize the payload once.
//! 2. Sign exactly those bytes with a single captured timestamp.
//! 3. Send exactly those bytes.
//! 4. Classify the outcome into [`ApiResponse`] or [`ClientError`].

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use scp_auth::{Credentials, Method, SigningContext, SigningScope, sign_request};
use scp_core::{Endpoint, ScpConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::response::ApiResponse;
use crate::transport::{
    ReqwestTransport, Transport, TransportOptions, TransportRequest, TransportResponse,
};

/// Client for the open-api.
///
/// Holds the credentials read-only behind an `Arc`; concurrent calls share them
/// without locking.
#[derive(Debug, Clone)]
pub struct OpenApiClient<T = ReqwestTransport> {
    transport: T,
    credentials: Arc<Credentials>,
    endpoint: Endpoint,
    scope: SigningScope,
}

impl OpenApiClient<ReqwestTransport> {
    /// Validate the configuration and build a client over `reqwest`.
    ///
    /// Configuration is checked before the HTTP client is created.
    pub fn connect(config: &ScpConfig) -> ClientResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(TransportOptions::from(config)).map_err(|e| {
            ClientError::Transport {
                url: config.scp_ip.clone(),
                message: e.to_string(),
            }
        })?;
        Self::from_config(config, transport)
    }
}

impl<T: Transport> OpenApiClient<T> {
    /// Create a client from already validated parts.
    pub fn new(
        transport: T,
        credentials: impl Into<Arc<Credentials>>,
        endpoint: Endpoint,
        scope: SigningScope,
    ) -> Self {
        Self {
            transport,
            credentials: credentials.into(),
            endpoint,
            scope,
        }
    }

    /// Validate the configuration and build a client over `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if any required field is missing; the
    /// transport is never invoked in that case.
    pub fn from_config(config: &ScpConfig, transport: T) -> ClientResult<Self> {
        let credentials = config.credentials()?;
        let endpoint = config.endpoint()?;
        Ok(Self::new(
            transport,
            credentials,
            endpoint,
            config.signing_scope(),
        ))
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Signed `GET` with an empty body.
    pub async fn get(&self, path: &str) -> ClientResult<ApiResponse> {
        self.send(Method::Get, path, Bytes::new()).await
    }

    /// Signed `POST` with `payload` serialized as JSON.
    pub async fn post<P: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &P,
    ) -> ClientResult<ApiResponse> {
        let body = serde_json::to_vec(payload).map_err(ClientError::Encode)?;
        self.send(Method::Post, path, Bytes::from(body)).await
    }

    /// Signed `POST` with a pre-serialized JSON body.
    pub async fn post_bytes(&self, path: &str, body: impl Into<Bytes>) -> ClientResult<ApiResponse> {
        self.send(Method::Post, path, body.into()).await
    }

    /// Sign and send, stamped with the current time.
    pub async fn send(&self, method: Method, path: &str, body: Bytes) -> ClientResult<ApiResponse> {
        self.send_at(method, path, body, Utc::now()).await
    }

    /// Sign and send with an explicit timestamp.
    ///
    /// `body` is both hashed into the signature and transmitted, so the two
    /// can never diverge.
    pub async fn send_at(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
        timestamp: DateTime<Utc>,
    ) -> ClientResult<ApiResponse> {
        let ctx = SigningContext::new(method, self.endpoint.as_str(), path, &body, &self.scope)
            .with_timestamp(timestamp);
        let signed = sign_request(&self.credentials, &ctx)?;
        let headers = signed.to_header_map()?;

        let url = self.endpoint.url(path);
        debug!(%method, %url, amz_date = %signed.amz_date, "dispatching signed request");

        let request = TransportRequest {
            method: method.into(),
            url: url.clone(),
            headers,
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, path, error = %e, "open-api request failed");
                return Err(ClientError::Transport {
                    url,
                    message: e.to_string(),
                });
            }
        };

        info!(%method, path, status = response.status.as_u16(), "open-api response");
        classify(response)
    }
}

/// Turn a raw response into a decoded body or a typed failure.
fn classify(response: TransportResponse) -> ClientResult<ApiResponse> {
    let TransportResponse { status, body } = response;

    if !status.is_success() {
        warn!(status = status.as_u16(), body = %body, "open-api returned an error status");
        return Err(ClientError::Server { status, body });
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(ApiResponse::new(status, value)),
        Err(source) => {
            warn!(status = status.as_u16(), error = %source, "open-api response is not JSON");
            Err(ClientError::Decode {
                status,
                body,
                source,
            })
        }
    }
}
