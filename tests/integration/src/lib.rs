//! Integration tests against a live SCP open-api.
//!
//! These tests need a reachable endpoint and valid credentials, read from
//! `SCP_*` environment variables or the file named by `SCP_CONFIG`
//! (default `terraform.tfvars`). They are marked `#[ignore]` so they don't run
//! during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! SCP_IP=10.0.0.1 SCP_ACCESS_KEY=... SCP_SECRET_KEY=... \
//!     cargo test -p scp-integration -- --ignored
//! ```

use std::path::PathBuf;
use std::sync::Once;

use scp_client::OpenApiClient;
use scp_core::{DEFAULT_CONFIG_FILE, ScpConfig};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Configuration for the live endpoint.
///
/// # Panics
///
/// Panics if the configuration file is malformed or an override is invalid.
#[must_use]
pub fn live_config() -> ScpConfig {
    let path = std::env::var("SCP_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
    let config = if path.exists() {
        ScpConfig::load(&path).expect("config file should parse")
    } else {
        ScpConfig::default()
    };
    config
        .with_env_overrides()
        .expect("environment overrides should be valid")
}

/// A client for the live endpoint.
///
/// # Panics
///
/// Panics if the configuration is incomplete.
#[must_use]
pub fn live_client() -> OpenApiClient {
    init_tracing();
    OpenApiClient::connect(&live_config()).expect("live configuration should be complete")
}

#[cfg(test)]
mod test_auth;
#[cfg(test)]
mod test_inventory;
