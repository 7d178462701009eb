//! Error types for configuration loading.

use std::path::PathBuf;

/// Configuration errors. All of them are fatal: they are reported to the
/// operator and abort before any network call.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A non-comment line is not of the form `key = value`.
    #[error("malformed configuration line {line_no}: {line:?}")]
    Malformed {
        /// 1-based line number.
        line_no: usize,
        /// The offending line, trimmed.
        line: String,
    },

    /// A value could not be parsed into the field's type.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value.
        value: String,
    },

    /// One or more required fields are missing or empty.
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The endpoint is not a bare `host[:port]`.
    #[error("invalid endpoint {0:?} (expected host[:port] without scheme or path)")]
    InvalidEndpoint(String),

    /// The signer rejected its inputs (empty keys, bad path, non-UTF-8 body).
    #[error("invalid signing input: {0}")]
    Signing(#[from] scp_auth::SignError),
}

/// Convenience result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
