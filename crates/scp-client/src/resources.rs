//! Open-api resource catalogue.

use std::fmt;
use std::str::FromStr;

/// Version prefix of every open-api path.
pub const API_PREFIX: &str = "/janus/20180725";

/// Collections exposed by the open-api.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Availability zones.
    Azs,
    /// VM images.
    Images,
    /// Virtual private clouds.
    Vpcs,
    /// Storage tags (storage policies).
    StorageTags,
    /// Subnets.
    Subnets,
    /// Virtual interfaces.
    Vifs,
    /// Physical hosts.
    Hosts,
    /// Virtual machines.
    Servers,
}

impl Resource {
    /// Read-only inventory collections, in the order they are usually listed.
    pub const INVENTORY: [Self; 6] = [
        Self::Azs,
        Self::Images,
        Self::Vpcs,
        Self::StorageTags,
        Self::Subnets,
        Self::Vifs,
    ];

    /// The collection name as it appears in the path.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Azs => "azs",
            Self::Images => "images",
            Self::Vpcs => "vpcs",
            Self::StorageTags => "storage-tags",
            Self::Subnets => "subnets",
            Self::Vifs => "vifs",
            Self::Hosts => "hosts",
            Self::Servers => "servers",
        }
    }

    /// The full request path.
    ///
    /// # Examples
    ///
    /// ```
    /// use scp_client::Resource;
    ///
    /// assert_eq!(Resource::StorageTags.path(), "/janus/20180725/storage-tags");
    /// ```
    #[must_use]
    pub fn path(self) -> String {
        format!("{API_PREFIX}/{}", self.name())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name matches no [`Resource`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(API_PREFIX).unwrap_or(s).trim_matches('/');
        [Self::Hosts, Self::Servers]
            .into_iter()
            .chain(Self::INVENTORY)
            .find(|r| r.name() == name)
            .ok_or_else(|| UnknownResource(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_inventory_paths() {
        let paths: Vec<String> = Resource::INVENTORY.iter().map(|r| r.path()).collect();
        assert_eq!(
            paths,
            vec![
                "/janus/20180725/azs",
                "/janus/20180725/images",
                "/janus/20180725/vpcs",
                "/janus/20180725/storage-tags",
                "/janus/20180725/subnets",
                "/janus/20180725/vifs",
            ]
        );
    }

    #[test]
    fn test_should_parse_name_or_path() {
        assert_eq!("hosts".parse::<Resource>().unwrap(), Resource::Hosts);
        assert_eq!(
            "/janus/20180725/storage-tags".parse::<Resource>().unwrap(),
            Resource::StorageTags
        );
        assert!("volumes".parse::<Resource>().is_err());
    }
}
