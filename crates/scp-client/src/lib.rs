//! Signed request dispatcher for the SCP open-api.
//!
//! [`OpenApiClient`] signs each request with [`scp_auth`], sends it through a
//! [`Transport`], and classifies the result: a decoded [`ApiResponse`] on 2xx
//! JSON, or a [`ClientError`] carrying the status and raw body otherwise.
//!
//! # Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use scp_client::{OpenApiClient, Resource};
//! use scp_core::ScpConfig;
//!
//! let config = ScpConfig::load("terraform.tfvars")?.with_env_overrides()?;
//! let client = OpenApiClient::connect(&config)?;
//!
//! let tags = client.get(&Resource::StorageTags.path()).await?;
//! for tag in tags.items() {
//!     println!("{}", tag["name"]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - The dispatcher
//! - [`error`] - Outcome classification
//! - [`model`] - Request payloads and response records
//! - [`resources`] - Resource catalogue and path construction
//! - [`response`] - Decoded response envelope
//! - [`transport`] - Transport seam and the `reqwest` implementation

pub mod client;
pub mod error;
pub mod model;
pub mod resources;
pub mod response;
pub mod transport;

pub use client::OpenApiClient;
pub use error::{ClientError, ClientResult};
pub use resources::{API_PREFIX, Resource};
pub use response::ApiResponse;
pub use transport::{ReqwestTransport, Transport, TransportError, TransportOptions};
