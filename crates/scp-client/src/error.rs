//! Dispatcher outcome classification.
//!
//! Every failure of a signed call is returned as a [`ClientError`]; nothing is
//! retried internally and there is no partial success.

use scp_auth::SignError;
use scp_core::ConfigError;

/// Errors returned by [`crate::OpenApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or malformed credentials, endpoint, or signing input. Raised
    /// before any network attempt.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The request payload could not be serialized to JSON.
    #[error("cannot serialize request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connection refused, TLS failure, timeout, or any other transport failure.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Target URL.
        url: String,
        /// Transport diagnostic.
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Server {
        /// Response status.
        status: http::StatusCode,
        /// Raw response text.
        body: String,
    },

    /// The server answered 2xx but the body is not JSON.
    #[error("response ({status}) is not valid JSON: {source}")]
    Decode {
        /// Response status.
        status: http::StatusCode,
        /// Raw response text.
        body: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
}

impl From<SignError> for ClientError {
    fn from(err: SignError) -> Self {
        Self::Config(ConfigError::Signing(err))
    }
}

impl ClientError {
    /// The HTTP status, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Server { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response text, when the server answered.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Server { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether this error was raised before any network attempt.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Encode(_))
    }
}

/// Convenience result type for dispatcher operations.
pub type ClientResult<T> = Result<T, ClientError>;
