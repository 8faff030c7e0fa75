// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Graph
//!
//! An ordered sequence of resource descriptors. Every descriptor's
//! dependencies are derived from the logical ids its spec references, and
//! the builder only accepts a descriptor once all of those are present.
//!
//! ```text
//! Network ─> Zones ─> Boundaries ─> Compute ─> Database ─> ScalingPool ─> LoadBalancer
//! ```

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{CapacityBounds, CredentialRef, Ipv4Cidr, MachineImage, ResourceKind, SizeClass};
use crate::errors::{TopologyError, TopologyResult};
use crate::planner::engine::EngineDescriptor;
use crate::planner::network::Zone;
use crate::planner::security::{SecurityBoundary, TrafficSource};

/// Fixed logical ids
pub mod logical_ids {
    pub const NETWORK: &str = "Network";
    pub const COMPUTE_INSTANCE: &str = "ComputeInstance";
    pub const DATABASE: &str = "Database";
    pub const SCALING_POOL: &str = "ScalingPool";

    /// The load balancer id carries the environment name
    pub fn load_balancer(environment: &str) -> String {
        format!("LoadBalancer-{}", environment)
    }
}

/// What a resource is, with the logical ids it points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSpec {
    Network {
        cidr: Ipv4Cidr,
        failure_domains: usize,
    },
    Zone {
        network: String,
        zone: Zone,
    },
    SecurityBoundary {
        network: String,
        boundary: SecurityBoundary,
    },
    ComputeInstance {
        size_class: SizeClass,
        machine_image: MachineImage,
        zone: String,
        boundary: String,
    },
    Database {
        engine: EngineDescriptor,
        size_class: SizeClass,
        storage_gb: u32,
        zones: Vec<String>,
        boundary: String,
        /// Referenced by id; the secret itself never enters the graph
        credential: CredentialRef,
        multi_zone: bool,
    },
    ScalingPool {
        size_class: SizeClass,
        machine_image: MachineImage,
        zones: Vec<String>,
        boundary: String,
        capacity: CapacityBounds,
    },
    LoadBalancer {
        internet_facing: bool,
        zones: Vec<String>,
        boundary: String,
    },
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Network { .. } => ResourceKind::Network,
            Self::Zone { .. } => ResourceKind::Zone,
            Self::SecurityBoundary { .. } => ResourceKind::SecurityBoundary,
            Self::ComputeInstance { .. } => ResourceKind::ComputeInstance,
            Self::Database { .. } => ResourceKind::Database,
            Self::ScalingPool { .. } => ResourceKind::ScalingPool,
            Self::LoadBalancer { .. } => ResourceKind::LoadBalancer,
        }
    }

    /// Logical ids of the resources this spec refers to, in reference order
    pub fn references(&self) -> Vec<String> {
        let mut refs = Vec::new();
        match self {
            Self::Network { .. } => {}
            Self::Zone { network, .. } => refs.push(network.clone()),
            Self::SecurityBoundary { network, boundary } => {
                refs.push(network.clone());
                for rule in &boundary.inbound {
                    if let TrafficSource::Boundary(role) = rule.source {
                        let id = role.logical_id().to_string();
                        if !refs.contains(&id) {
                            refs.push(id);
                        }
                    }
                }
            }
            Self::ComputeInstance { zone, boundary, .. } => {
                refs.push(zone.clone());
                refs.push(boundary.clone());
            }
            Self::Database { zones, boundary, .. }
            | Self::ScalingPool { zones, boundary, .. }
            | Self::LoadBalancer { zones, boundary, .. } => {
                refs.extend(zones.iter().cloned());
                refs.push(boundary.clone());
            }
        }
        refs
    }
}

/// One resource in a topology graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub logical_id: String,
    pub depends_on: Vec<String>,
    pub spec: ResourceSpec,
}

impl ResourceDescriptor {
    /// Descriptor whose dependencies are exactly what `spec` references
    pub fn new(logical_id: impl Into<String>, spec: ResourceSpec) -> Self {
        Self {
            logical_id: logical_id.into(),
            depends_on: spec.references(),
            spec,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

/// Ordered, dependency-respecting list of resources for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyGraph {
    environment: String,
    resources: Vec<ResourceDescriptor>,
}

impl TopologyGraph {
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Resources in emission order
    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, logical_id: &str) -> Option<&ResourceDescriptor> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }

    pub fn position(&self, logical_id: &str) -> Option<usize> {
        self.resources.iter().position(|r| r.logical_id == logical_id)
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.iter().filter(move |r| r.kind() == kind)
    }

    /// Re-check that every dependency precedes its dependent
    pub fn verify_order(&self) -> TopologyResult<()> {
        for (index, resource) in self.resources.iter().enumerate() {
            for dependency in &resource.depends_on {
                match self.position(dependency) {
                    Some(at) if at < index => {}
                    _ => {
                        return Err(TopologyError::DependencyOrderViolation {
                            resource: resource.logical_id.clone(),
                            missing: dependency.clone(),
                        })
                    }
                }
            }
        }
        Ok(())
    }
}

/// Append-only builder enforcing emission order
#[derive(Debug)]
pub struct TopologyBuilder {
    environment: String,
    resources: Vec<ResourceDescriptor>,
    emitted: HashMap<String, usize>,
}

impl TopologyBuilder {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            resources: Vec::new(),
            emitted: HashMap::new(),
        }
    }

    pub fn is_emitted(&self, logical_id: &str) -> bool {
        self.emitted.contains_key(logical_id)
    }

    /// Append a resource
    ///
    /// # Errors
    /// - [`TopologyError::DuplicateLogicalId`] if the id was already emitted
    /// - [`TopologyError::DependencyOrderViolation`] if a dependency was not
    pub fn push(&mut self, resource: ResourceDescriptor) -> TopologyResult<&mut Self> {
        if self.is_emitted(&resource.logical_id) {
            return Err(TopologyError::DuplicateLogicalId(resource.logical_id));
        }

        if let Some(missing) = resource
            .depends_on
            .iter()
            .find(|dependency| !self.is_emitted(dependency))
        {
            return Err(TopologyError::DependencyOrderViolation {
                resource: resource.logical_id.clone(),
                missing: missing.clone(),
            });
        }

        self.emitted
            .insert(resource.logical_id.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(self)
    }

    pub fn build(self) -> TopologyGraph {
        TopologyGraph {
            environment: self.environment,
            resources: self.resources,
        }
    }
}
