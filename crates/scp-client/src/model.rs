//! Request payloads and response records.
//!
//! Resource identifiers (zone, image, VPC, subnet, interface, storage tag) are
//! deployment data and always come from the caller.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Body of `POST /janus/20180725/servers`.
///
/// # Examples
///
/// ```
/// use scp_client::model::{CreateServerRequest, NetworkSpec};
///
/// let req = CreateServerRequest::builder()
///     .az_id("az-1")
///     .image_id("image-1")
///     .storage_tag_id("tag-1")
///     .name("build-agent")
///     .networks(vec![NetworkSpec::builder().vpc_id("vpc-1").subnet_id("subnet-1").build()])
///     .build();
///
/// assert_eq!(req.cores, 2);
/// assert_eq!(req.location.id, "cluster");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct CreateServerRequest {
    /// Availability zone.
    #[builder(setter(into))]
    pub az_id: String,
    /// Placement.
    #[builder(default)]
    pub location: Location,
    /// Storage tag the disks are placed on.
    #[builder(setter(into))]
    pub storage_tag_id: String,
    /// Source image.
    #[builder(setter(into))]
    pub image_id: String,
    /// vCPU cores per socket.
    #[builder(default = 2)]
    pub cores: u32,
    /// CPU sockets.
    #[builder(default = 1)]
    pub sockets: u32,
    /// Memory in MiB.
    #[builder(default = 4096)]
    pub memory_mb: u64,
    /// Number of identical servers to create.
    #[builder(default = 1)]
    pub count: u32,
    /// Server name.
    #[builder(setter(into))]
    pub name: String,
    /// Disks.
    #[builder(default = vec![DiskSpec::default()])]
    pub disks: Vec<DiskSpec>,
    /// Network interfaces.
    #[builder(default)]
    pub networks: Vec<NetworkSpec>,
    /// `1` to power the server on after creation.
    #[builder(default = 1)]
    pub power_on: u8,
}

/// Server placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Placement target, `cluster` for cluster-wide scheduling.
    pub id: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            id: "cluster".to_owned(),
        }
    }
}

/// One disk of a new server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct DiskSpec {
    /// Disk type; `derive_disk` clones the image's system disk.
    #[serde(rename = "type")]
    #[builder(default = String::from("derive_disk"), setter(into))]
    pub disk_type: String,
    /// Size in MiB.
    #[builder(default = 81_920)]
    pub size_mb: u64,
}

impl Default for DiskSpec {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// One network interface of a new server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct NetworkSpec {
    /// VPC.
    #[builder(setter(into))]
    pub vpc_id: String,
    /// Subnet within the VPC.
    #[builder(setter(into))]
    pub subnet_id: String,
    /// Pre-allocated virtual interface, if the platform requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub vif_id: Option<String>,
    /// `1` to connect the interface at boot.
    #[builder(default = 1)]
    pub connect: u8,
    /// NIC model.
    #[builder(default = String::from("virtio"), setter(into))]
    pub model: String,
}

/// An entry of `GET /janus/20180725/storage-tags`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageTag {
    /// Tag ID.
    pub id: String,
    /// Display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_serialize_server_request_with_defaults() {
        let req = CreateServerRequest::builder()
            .az_id("az-1")
            .image_id("image-1")
            .storage_tag_id("tag-1")
            .name("win10")
            .networks(vec![
                NetworkSpec::builder()
                    .vpc_id("vpc-1")
                    .subnet_id("subnet-1")
                    .vif_id("vif-1")
                    .build(),
            ])
            .build();

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "az_id": "az-1",
                "location": {"id": "cluster"},
                "storage_tag_id": "tag-1",
                "image_id": "image-1",
                "cores": 2,
                "sockets": 1,
                "memory_mb": 4096,
                "count": 1,
                "name": "win10",
                "disks": [{"type": "derive_disk", "size_mb": 81920}],
                "networks": [{
                    "vpc_id": "vpc-1",
                    "subnet_id": "subnet-1",
                    "vif_id": "vif-1",
                    "connect": 1,
                    "model": "virtio"
                }],
                "power_on": 1
            })
        );
    }

    #[test]
    fn test_should_omit_absent_vif() {
        let nic = NetworkSpec::builder().vpc_id("v").subnet_id("s").build();
        let value = serde_json::to_value(&nic).unwrap();
        assert!(value.get("vif_id").is_none());
    }

    #[test]
    fn test_should_tolerate_sparse_storage_tags() {
        let tag: StorageTag = serde_json::from_value(json!({"id": "t1", "extra": 1})).unwrap();
        assert_eq!(tag.id, "t1");
        assert_eq!(tag.name, "");
    }
}
