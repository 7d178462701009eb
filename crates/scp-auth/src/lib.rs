//! AWS4-HMAC-SHA256 request signing for the SCP open-api.
//!
//! The open-api of the cloud-management platform authenticates every call with
//! a SigV4-style signature scoped to a deployment-specific region and service
//! (`cn-south-1` / `open-api` by default). This crate is the pure signing layer:
//! given [`Credentials`] and a [`SigningContext`] it produces the
//! [`SignedHeaders`] to attach to the request. It performs no I/O and holds no
//! state, so any number of requests can be signed concurrently with shared
//! credentials.
//!
//! # Usage
//!
//! ```rust
//! use scp_auth::{Credentials, Method, SigningContext, SigningScope, sign_request};
//!
//! let creds = Credentials::new("AKIDEXAMPLE", "secret").unwrap();
//! let scope = SigningScope::default();
//! let ctx = SigningContext::new(Method::Get, "10.0.0.1", "/janus/20180725/azs", b"", &scope);
//!
//! let headers = sign_request(&creds, &ctx).unwrap();
//! assert_eq!(headers.content_sha256.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`context`] - Per-request signing inputs and deployment scope
//! - [`credentials`] - Access key pair and secret lookup
//! - [`error`] - Signing error types
//! - [`sigv4`] - Key derivation and signature computation
//! - [`verify`] - Server-side recomputation of a received signature

pub mod canonical;
pub mod context;
pub mod credentials;
pub mod error;
pub mod sigv4;
pub mod verify;

pub use context::{Method, SigningContext, SigningScope};
pub use credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
pub use error::{SignError, SignResult};
pub use sigv4::{SignedHeaders, hash_payload, sign_request};
pub use verify::{VerifiedRequest, verify_signed_request};
