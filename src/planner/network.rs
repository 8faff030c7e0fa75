// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Partition Planner
//!
//! Splits the parent network range into `/24` zones: one public and one
//! isolated zone per failure domain. Zones are carved in index order from
//! the bottom of the range, public zones first.

use serde::Serialize;
use std::fmt;

use crate::domain::{Ipv4Cidr, NetworkError};
use crate::errors::{TopologyError, TopologyResult};

/// Independent failure domains every plan spans
pub const REDUNDANCY_FACTOR: usize = 2;

/// Prefix length of every zone
pub const ZONE_PREFIX: u8 = 24;

/// Whether a zone is reachable from the internet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneTag {
    Public,
    Isolated,
}

impl ZoneTag {
    fn logical_prefix(&self) -> &'static str {
        match self {
            Self::Public => "PublicZone",
            Self::Isolated => "IsolatedZone",
        }
    }
}

impl fmt::Display for ZoneTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Isolated => write!(f, "isolated"),
        }
    }
}

/// One independently placed sub-range of the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub logical_id: String,
    pub tag: ZoneTag,
    /// Index of the failure domain, `0..REDUNDANCY_FACTOR`
    pub failure_domain: usize,
    /// Provider availability zone, e.g. `ca-central-1a`
    pub availability_zone: String,
    pub cidr: Ipv4Cidr,
}

/// Partition of one network range into tagged zones
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkPlan {
    range: Ipv4Cidr,
    region: String,
    zones: Vec<Zone>,
}

impl NetworkPlan {
    pub fn range(&self) -> Ipv4Cidr {
        self.range
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// All zones in allocation order
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zones_tagged(&self, tag: ZoneTag) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(move |zone| zone.tag == tag)
    }

    pub fn public_zones(&self) -> Vec<&Zone> {
        self.zones_tagged(ZoneTag::Public).collect()
    }

    pub fn isolated_zones(&self) -> Vec<&Zone> {
        self.zones_tagged(ZoneTag::Isolated).collect()
    }
}

fn availability_zone(region: &str, failure_domain: usize) -> String {
    // failure domains map onto zone letters a, b, ...
    let letter = (b'a' + failure_domain as u8) as char;
    format!("{}{}", region, letter)
}

fn invalid_range(range: &str, err: NetworkError) -> TopologyError {
    TopologyError::InvalidRange {
        range: range.to_string(),
        reason: err.to_string(),
    }
}

/// Plan the zones for a network range
///
/// Fails with [`TopologyError::InvalidRange`] when the range is malformed,
/// not IPv4, or too small to hold four disjoint `/24` blocks. No partial
/// plan is ever returned.
pub fn plan_network(range: &str, region: &str) -> TopologyResult<NetworkPlan> {
    let parent = Ipv4Cidr::new(range).map_err(|err| invalid_range(range, err))?;

    let needed = (REDUNDANCY_FACTOR * 2) as u64;
    if parent.subnet_count(ZONE_PREFIX) < needed {
        return Err(TopologyError::InvalidRange {
            range: range.to_string(),
            reason: format!(
                "/{} cannot hold {} disjoint /{} zones",
                parent.prefix_length(),
                needed,
                ZONE_PREFIX
            ),
        });
    }

    let mut zones = Vec::with_capacity(needed as usize);
    let mut index: u32 = 0;
    for tag in [ZoneTag::Public, ZoneTag::Isolated] {
        for failure_domain in 0..REDUNDANCY_FACTOR {
            let cidr = parent
                .subnet(ZONE_PREFIX, index)
                .map_err(|err| invalid_range(range, err))?;
            tracing::trace!(zone = %cidr, tag = %tag, failure_domain, "carved zone");
            zones.push(Zone {
                logical_id: format!("{}{}", tag.logical_prefix(), failure_domain + 1),
                tag,
                failure_domain,
                availability_zone: availability_zone(region, failure_domain),
                cidr,
            });
            index += 1;
        }
    }

    tracing::debug!(range = %parent, zones = zones.len(), "planned network partitions");

    Ok(NetworkPlan {
        range: parent,
        region: region.to_string(),
        zones,
    })
}
