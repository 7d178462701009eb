//! Error types for request signing and signature verification.
//!
//! Signing itself performs no I/O, so every [`SignError`] describes a malformed
//! input. Callers treat these as configuration errors and abort before any
//! network attempt.

/// Errors that can occur while signing or verifying an open-api request.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The access key is empty.
    #[error("access key must not be empty")]
    EmptyAccessKey,

    /// The secret key is empty.
    #[error("secret key must not be empty")]
    EmptySecretKey,

    /// The target host is empty.
    #[error("host must not be empty")]
    EmptyHost,

    /// The request path does not start with `/` or carries a query or fragment.
    #[error("invalid request path: {0:?} (must start with '/' and carry no query or fragment)")]
    InvalidPath(String),

    /// A `GET` request carries a body.
    #[error("GET requests must have an empty body")]
    BodyOnGet,

    /// The request body is not valid UTF-8.
    #[error("request body is not valid UTF-8")]
    NonUtf8Body,

    /// A computed header value cannot be carried in an HTTP header.
    #[error("invalid value for header {0}")]
    InvalidHeaderValue(&'static str),

    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header could not be parsed.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The signing algorithm is not `AWS4-HMAC-SHA256`.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A header listed in `SignedHeaders` is missing from the request.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The `Credential` component is not `AKID/date/region/service/aws4_request`.
    #[error("Invalid credential format")]
    InvalidCredential,

    /// The access key was not found by the credential provider.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// `X-Amz-Content-Sha256` does not match the hash of the transmitted body.
    #[error("Payload hash does not match request body")]
    PayloadHashMismatch,

    /// The recomputed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}

/// Convenience result type for signing operations.
pub type SignResult<T> = Result<T, SignError>;
