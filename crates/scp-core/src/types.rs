//! Shared type definitions.

use std::fmt;

use crate::error::{ConfigError, ConfigResult};

const DEFAULT_HTTPS_PORT: &str = ":443";

/// The open-api endpoint as `host[:port]`.
///
/// This is the exact string signed into the `host` header. It is kept
/// verbatim apart from surrounding whitespace and an explicit `:443`, which
/// HTTP clients drop from the wire `Host` header for `https` URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Endpoint(String);

impl Endpoint {
    /// Validate and wrap an endpoint.
    ///
    /// # Errors
    /// Returns an error if the value is empty or carries a scheme, path,
    /// query, or whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use scp_core::Endpoint;
    ///
    /// let ep = Endpoint::new("10.0.0.1:4430").unwrap();
    /// assert_eq!(ep.base_url(), "https://10.0.0.1:4430");
    /// assert_eq!(Endpoint::new("10.0.0.1:443").unwrap().as_str(), "10.0.0.1");
    /// assert!(Endpoint::new("https://10.0.0.1").is_err());
    /// ```
    pub fn new(host: impl Into<String>) -> ConfigResult<Self> {
        let host = host.into().trim().to_owned();
        if host.is_empty()
            || host.contains("://")
            || host.contains(['/', '?', '#'])
            || host.contains(char::is_whitespace)
        {
            return Err(ConfigError::InvalidEndpoint(host));
        }
        match host.strip_suffix(DEFAULT_HTTPS_PORT) {
            Some("") => Err(ConfigError::InvalidEndpoint(host)),
            Some(bare) => Ok(Self(bare.to_owned())),
            None => Ok(Self(host)),
        }
    }

    /// The endpoint as signed into the `host` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `https://host[:port]`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}", self.0)
    }

    /// Full URL for a request path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("https://{}{path}", self.0)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
