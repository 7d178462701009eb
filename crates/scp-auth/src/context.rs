//! Per-request signing inputs.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::{SignError, SignResult};

/// Default signing region of the open-api deployment.
pub const DEFAULT_REGION: &str = "cn-south-1";

/// Default signing service name of the open-api deployment.
pub const DEFAULT_SERVICE: &str = "open-api";

/// Default `Content-Type` sent and signed with every request.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// HTTP methods used by the open-api.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`, always with an empty body.
    Get,
    /// `POST`, with a JSON body.
    Post,
}

impl Method {
    /// The method name as it appears in the canonical request.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
        }
    }
}

/// Deployment constants bound into every signature.
///
/// These are not general AWS region or service names; they identify one
/// open-api deployment and are overridable from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningScope {
    /// Region component of the credential scope.
    pub region: String,
    /// Service component of the credential scope.
    pub service: String,
    /// `Content-Type` header value.
    pub content_type: String,
}

impl SigningScope {
    /// Create a scope from explicit values.
    pub fn new(
        region: impl Into<String>,
        service: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
            content_type: content_type.into(),
        }
    }
}

impl Default for SigningScope {
    fn default() -> Self {
        Self::new(DEFAULT_REGION, DEFAULT_SERVICE, DEFAULT_CONTENT_TYPE)
    }
}

/// Everything that goes into one request signature besides the credentials.
///
/// The timestamp is captured once, truncated to whole seconds, and is the
/// single source for both the date stamp and the `X-Amz-Date` value.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use scp_auth::{Method, SigningContext, SigningScope};
///
/// let scope = SigningScope::default();
/// let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let ctx = SigningContext::new(Method::Get, "scp.example.internal", "/janus/20180725/azs", b"", &scope)
///     .with_timestamp(ts);
///
/// assert_eq!(ctx.amz_date(), "20240101T000000Z");
/// assert_eq!(ctx.date_stamp(), "20240101");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SigningContext<'a> {
    method: Method,
    host: &'a str,
    path: &'a str,
    body: &'a [u8],
    timestamp: DateTime<Utc>,
    scope: &'a SigningScope,
}

impl<'a> SigningContext<'a> {
    /// Create a context stamped with the current time.
    #[must_use]
    pub fn new(
        method: Method,
        host: &'a str,
        path: &'a str,
        body: &'a [u8],
        scope: &'a SigningScope,
    ) -> Self {
        Self {
            method,
            host,
            path,
            body,
            timestamp: Utc::now().trunc_subsecs(0),
            scope,
        }
    }

    /// Replace the captured timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp.trunc_subsecs(0);
        self
    }

    /// Check the inputs that the signer cannot recover from.
    pub fn validate(&self) -> SignResult<()> {
        if self.host.is_empty() {
            return Err(SignError::EmptyHost);
        }
        if !self.path.starts_with('/') || self.path.contains(['?', '#']) {
            return Err(SignError::InvalidPath(self.path.to_owned()));
        }
        if self.method == Method::Get && !self.body.is_empty() {
            return Err(SignError::BodyOnGet);
        }
        if std::str::from_utf8(self.body).is_err() {
            return Err(SignError::NonUtf8Body);
        }
        Ok(())
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// The `host[:port]` the request is addressed to.
    #[must_use]
    pub fn host(&self) -> &'a str {
        self.host
    }

    /// The request path.
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// The exact body bytes that will be transmitted.
    #[must_use]
    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    /// The captured timestamp.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The deployment scope.
    #[must_use]
    pub fn scope(&self) -> &'a SigningScope {
        self.scope
    }

    /// `YYYYMMDD` of the captured timestamp.
    #[must_use]
    pub fn date_stamp(&self) -> String {
        self.timestamp.format("%Y%m%d").to_string()
    }

    /// `YYYYMMDDThhmmssZ` of the captured timestamp.
    #[must_use]
    pub fn amz_date(&self) -> String {
        self.timestamp.format("%Y%m%dT%H%M%SZ").to_string()
    }
}
