// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Kind Taxonomy
//!
//! The closed set of resource kinds a topology graph can contain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource descriptor in a topology graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Parent network owning the address range
    Network,
    /// Public or isolated sub-range
    Zone,
    /// Traffic-allow policy group
    SecurityBoundary,
    /// Standalone compute instance
    ComputeInstance,
    /// Managed database instance
    Database,
    /// Autoscaling compute pool
    ScalingPool,
    /// Internet-facing load balancer
    LoadBalancer,
}

/// Coarse grouping used for summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Networking,
    Security,
    Compute,
    Storage,
}

impl ResourceKind {
    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Zone => "zone",
            Self::SecurityBoundary => "security_boundary",
            Self::ComputeInstance => "compute_instance",
            Self::Database => "database",
            Self::ScalingPool => "scaling_pool",
            Self::LoadBalancer => "load_balancer",
        }
    }

    /// Category this kind belongs to
    pub fn category(&self) -> ResourceCategory {
        match self {
            Self::Network | Self::Zone | Self::LoadBalancer => ResourceCategory::Networking,
            Self::SecurityBoundary => ResourceCategory::Security,
            Self::ComputeInstance | Self::ScalingPool => ResourceCategory::Compute,
            Self::Database => ResourceCategory::Storage,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_match_serde() {
        for kind in [
            ResourceKind::Network,
            ResourceKind::Zone,
            ResourceKind::SecurityBoundary,
            ResourceKind::ComputeInstance,
            ResourceKind::Database,
            ResourceKind::ScalingPool,
            ResourceKind::LoadBalancer,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(ResourceKind::Zone.category(), ResourceCategory::Networking);
        assert_eq!(ResourceKind::ScalingPool.category(), ResourceCategory::Compute);
        assert_eq!(ResourceKind::Database.category(), ResourceCategory::Storage);
    }
}
