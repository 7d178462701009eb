//! SCP open-api command-line client.
//!
//! Signs every request with the HMAC-SHA256 scheme the open-api expects and
//! either prints the result or, with `serve`, exposes host metrics over HTTP.
//!
//! # Usage
//!
//! ```text
//! scp-cli --config terraform.tfvars inventory
//! scp-cli get hosts
//! scp-cli storage-tags
//! scp-cli create-server --name vm-1 --az-id ... --payload-out vm_payload.json
//! scp-cli serve --listen 0.0.0.0:5000
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SCP_CONFIG` | `terraform.tfvars` | Configuration file |
//! | `SCP_ACCESS_KEY` / `SCP_SECRET_KEY` | *(from file)* | Credentials |
//! | `SCP_IP` | *(from file)* | open-api host |
//! | `SCP_INSECURE_SKIP_TLS_VERIFY` | `false` | Accept self-signed certificates |
//! | `METRICS_LISTEN` | `0.0.0.0:5000` | `serve` bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;
mod commands;
mod metrics;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use scp_client::OpenApiClient;
use scp_core::ScpConfig;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `log_level` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Read the config file if present, then apply environment overrides.
///
/// Returns whether the file was found so the caller can log it once tracing is up.
fn load_config(path: &Path) -> Result<(ScpConfig, bool)> {
    let found = path.exists();
    let config = if found {
        ScpConfig::load(path)?
    } else {
        ScpConfig::default()
    };
    let config = config
        .with_env_overrides()
        .context("invalid environment override")?;
    Ok((config, found))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, found) = load_config(&cli.config)?;
    init_tracing(&config.log_level)?;

    if found {
        debug!(path = %cli.config.display(), ?config, "loaded configuration");
    } else {
        warn!(path = %cli.config.display(), "configuration file not found, using environment only");
    }

    let client = OpenApiClient::connect(&config).context("invalid configuration")?;

    match cli.command {
        Command::Inventory { paths } => commands::inventory(&client, &paths).await,
        Command::Get { path } => commands::get(&client, &path).await,
        Command::StorageTags => commands::storage_tags(&client).await,
        Command::CreateServer(args) => {
            let request = args.to_request();
            commands::create_server(&client, &request, args.payload_out.as_deref()).await
        }
        Command::Serve { listen } => {
            let listen = listen.unwrap_or_else(|| config.metrics_listen.clone());
            commands::serve(client, &listen).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_fall_back_to_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let (config, found) = load_config(&dir.path().join("missing.tfvars")).unwrap();
        assert!(!found);
        assert_eq!(config.region, "cn-south-1");
    }

    #[test]
    fn test_should_load_existing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terraform.tfvars");
        std::fs::write(&path, "scp_ip = \"10.0.0.1\"\nregion = \"cn-north-1\"\n").unwrap();

        let (config, found) = load_config(&path).unwrap();
        assert!(found);
        assert_eq!(config.region, "cn-north-1");
    }
}
