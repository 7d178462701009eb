//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scp_client::model::{CreateServerRequest, DiskSpec, NetworkSpec};
use scp_core::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "scp-cli", version, about = "Signed client for the SCP open-api")]
pub struct Cli {
    /// tfvars-style configuration file; `SCP_*` environment variables override it.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE, env = "SCP_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch inventory collections concurrently.
    Inventory {
        /// Resource names (`azs`) or paths (`/janus/20180725/azs`). Defaults to
        /// every inventory collection.
        paths: Vec<String>,
    },
    /// Signed GET of a single path, pretty-printed.
    Get {
        /// Resource name or absolute path.
        path: String,
    },
    /// List storage tags.
    StorageTags,
    /// Create a virtual machine.
    CreateServer(CreateServerArgs),
    /// Serve host metrics over HTTP.
    Serve {
        /// Bind address; overrides `metrics_listen` from the configuration.
        #[arg(long)]
        listen: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct CreateServerArgs {
    /// Server name.
    #[arg(long)]
    pub name: String,
    /// Availability zone to place the server in.
    #[arg(long)]
    pub az_id: String,
    /// Boot image.
    #[arg(long)]
    pub image_id: String,
    /// Storage tag for the system disk.
    #[arg(long)]
    pub storage_tag_id: String,
    /// VPC of the primary interface.
    #[arg(long)]
    pub vpc_id: String,
    /// Subnet of the primary interface.
    #[arg(long)]
    pub subnet_id: String,
    /// Pre-allocated virtual interface.
    #[arg(long)]
    pub vif_id: Option<String>,
    /// Cores per socket.
    #[arg(long, default_value_t = 2)]
    pub cores: u32,
    /// CPU sockets.
    #[arg(long, default_value_t = 1)]
    pub sockets: u32,
    /// Memory in MiB.
    #[arg(long, default_value_t = 4096)]
    pub memory_mb: u64,
    /// System disk size in MiB.
    #[arg(long, default_value_t = 81_920)]
    pub disk_size_mb: u64,
    /// Number of identical servers to create.
    #[arg(long, default_value_t = 1)]
    pub count: u32,
    /// Leave the server powered off after creation.
    #[arg(long)]
    pub no_power_on: bool,
    /// Also write the request body to this file before submitting.
    #[arg(long)]
    pub payload_out: Option<PathBuf>,
}

impl CreateServerArgs {
    pub fn to_request(&self) -> CreateServerRequest {
        let mut nic = NetworkSpec::builder()
            .vpc_id(self.vpc_id.as_str())
            .subnet_id(self.subnet_id.as_str())
            .build();
        nic.vif_id.clone_from(&self.vif_id);

        CreateServerRequest::builder()
            .az_id(self.az_id.as_str())
            .image_id(self.image_id.as_str())
            .storage_tag_id(self.storage_tag_id.as_str())
            .name(self.name.as_str())
            .cores(self.cores)
            .sockets(self.sockets)
            .memory_mb(self.memory_mb)
            .count(self.count)
            .disks(vec![DiskSpec::builder().size_mb(self.disk_size_mb).build()])
            .networks(vec![nic])
            .power_on(u8::from(!self.no_power_on))
            .build()
    }
}
