//! Configuration and shared types for the SCP open-api client.
//!
//! This crate is the configuration collaborator of the signing stack: it reads
//! the `terraform.tfvars` file shared with the platform's Terraform provider,
//! applies environment overrides, and hands out validated [`scp_auth::Credentials`],
//! the [`Endpoint`] and the [`scp_auth::SigningScope`].

mod config;
mod error;
mod types;

pub use config::{DEFAULT_CONFIG_FILE, ScpConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::Endpoint;
