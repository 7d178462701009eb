//! Access credentials and secret lookup.
//!
//! [`Credentials`] is the signing side: one immutable access/secret key pair,
//! shared read-only across concurrent requests. [`CredentialProvider`] is the
//! verifying side, resolving a secret from the access key named in an
//! `Authorization` header.

use std::collections::HashMap;
use std::fmt;

use crate::error::{SignError, SignResult};

/// An open-api access key pair.
///
/// Both halves are guaranteed non-empty. The `Debug` output masks the access
/// key and never includes the secret.
///
/// # Examples
///
/// ```
/// use scp_auth::Credentials;
///
/// let creds = Credentials::new("AKIDEXAMPLE", "s3cr3t-value").unwrap();
/// assert_eq!(creds.access_key(), "AKIDEXAMPLE");
/// assert!(!format!("{creds:?}").contains("s3cr3t-value"));
/// assert!(Credentials::new("AKIDEXAMPLE", "").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create a credential pair, rejecting empty keys.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> SignResult<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();

        if access_key.is_empty() {
            return Err(SignError::EmptyAccessKey);
        }
        if secret_key.is_empty() {
            return Err(SignError::EmptySecretKey);
        }

        Ok(Self {
            access_key,
            secret_key,
        })
    }

    /// The access key ID placed in the credential scope.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The raw secret key bytes used to seed the signing-key derivation.
    #[must_use]
    pub fn secret_key(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    /// The access key with everything but its first four characters masked.
    #[must_use]
    pub fn masked_access_key(&self) -> String {
        mask_access_key(&self.access_key)
    }
}

/// Mask everything but the first four characters of an access key.
///
/// ```
/// use scp_auth::credentials::mask_access_key;
///
/// assert_eq!(mask_access_key("AKIDEXAMPLE"), "AKID*******");
/// ```
#[must_use]
pub fn mask_access_key(access_key: &str) -> String {
    let visible: String = access_key.chars().take(4).collect();
    let hidden = access_key.chars().count().saturating_sub(4);
    format!("{visible}{}", "*".repeat(hidden))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.masked_access_key())
            .field("secret_key", &"...")
            .finish()
    }
}

/// Trait for looking up secret keys by access key ID.
///
/// Used by [`crate::verify::verify_signed_request`] to recompute signatures the
/// way the open-api server does.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret key for the given access key ID.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::AccessKeyNotFound`] if the access key is not recognized.
    fn get_secret_key(&self, access_key: &str) -> SignResult<String>;
}

/// An in-memory credential provider backed by a `HashMap`.
#[derive(Clone, Default)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a provider from an iterable of (access_key, secret_key) pairs.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
        }
    }
}

impl From<&Credentials> for StaticCredentialProvider {
    fn from(creds: &Credentials) -> Self {
        Self::new([(creds.access_key.clone(), creds.secret_key.clone())])
    }
}

impl fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialProvider")
            .field("access_keys", &self.credentials.len())
            .finish()
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret_key(&self, access_key: &str) -> SignResult<String> {
        self.credentials
            .get(access_key)
            .cloned()
            .ok_or_else(|| SignError::AccessKeyNotFound(access_key.to_owned()))
    }
}
