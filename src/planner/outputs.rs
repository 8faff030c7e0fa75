// Copyright (c) 2025 - Cowboy AI, Inc.
//! Output Publisher
//!
//! Extracts the identifiers callers address after deployment and maps them
//! onto fixed symbolic names. Values come from an [`IdentifierSource`]:
//! deferred tokens while planning, concrete values once an actuator has
//! reported back.
//!
//! Export names are always derived from the stack and the graph's
//! environment, so two environments can never publish the same export.

use serde::Serialize;
use std::fmt;

use crate::domain::{invariants, ResourceKind};
use crate::errors::{TopologyError, TopologyResult};
use crate::topology::TopologyGraph;

/// Attribute of a provisioned resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceAttribute {
    /// Provider-assigned identifier
    Id,
    /// Provider-assigned name
    Name,
    /// Connection endpoint address
    Endpoint,
    /// Public DNS name
    DnsName,
}

impl ResourceAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name",
            Self::Endpoint => "Endpoint",
            Self::DnsName => "DnsName",
        }
    }
}

impl fmt::Display for ResourceAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Looks up concrete attribute values for emitted resources
pub trait IdentifierSource {
    fn resolve(&self, logical_id: &str, attribute: ResourceAttribute) -> Option<String>;
}

/// Source that answers with `${LogicalId.Attribute}` placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredIdentifiers;

impl IdentifierSource for DeferredIdentifiers {
    fn resolve(&self, logical_id: &str, attribute: ResourceAttribute) -> Option<String> {
        Some(format!("${{{}.{}}}", logical_id, attribute))
    }
}

/// A published output definition
struct OutputSpec {
    name: &'static str,
    kind: ResourceKind,
    attribute: ResourceAttribute,
    description: &'static str,
}

const OUTPUTS: &[OutputSpec] = &[
    OutputSpec {
        name: "NetworkId",
        kind: ResourceKind::Network,
        attribute: ResourceAttribute::Id,
        description: "Identifier of the network",
    },
    OutputSpec {
        name: "ComputeInstanceId",
        kind: ResourceKind::ComputeInstance,
        attribute: ResourceAttribute::Id,
        description: "Identifier of the standalone compute instance",
    },
    OutputSpec {
        name: "DatabaseEndpoint",
        kind: ResourceKind::Database,
        attribute: ResourceAttribute::Endpoint,
        description: "Database connection endpoint address",
    },
    OutputSpec {
        name: "ScalingPoolName",
        kind: ResourceKind::ScalingPool,
        attribute: ResourceAttribute::Name,
        description: "Name of the autoscaling pool",
    },
    OutputSpec {
        name: "LoadBalancerDnsName",
        kind: ResourceKind::LoadBalancer,
        attribute: ResourceAttribute::DnsName,
        description: "Public DNS name of the load balancer",
    },
];

/// Derives cross-stack export names for one stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNaming {
    stack: String,
}

impl ExportNaming {
    pub fn new(stack: impl Into<String>) -> TopologyResult<Self> {
        let stack = stack.into();
        invariants::validate_scope_name("stack name", &stack)?;
        Ok(Self { stack })
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// `{stack}-{environment}-{output}`
    pub fn export_name(&self, environment: &str, output: &str) -> String {
        format!("{}-{}-{}", self.stack, environment, output)
    }
}

/// One published output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    pub name: String,
    pub value: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
}

/// Published mapping from symbolic name to value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct OutputMap {
    entries: Vec<OutputEntry>,
}

impl OutputMap {
    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&OutputEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|entry| entry.value.as_str())
    }

    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.export_name.as_deref())
    }
}

/// Publish the outputs of an assembled graph
///
/// # Errors
/// - [`TopologyError::DependencyOrderViolation`] if the graph lacks a
///   resource an output is read from
/// - [`TopologyError::UnresolvedOutput`] if the source has no value
/// - [`TopologyError::DuplicateExport`] if names collide
pub fn publish(
    graph: &TopologyGraph,
    source: &dyn IdentifierSource,
    exports: Option<&ExportNaming>,
) -> TopologyResult<OutputMap> {
    let mut entries = Vec::with_capacity(OUTPUTS.len());

    for output in OUTPUTS {
        let resource = graph.of_kind(output.kind).next().ok_or_else(|| {
            TopologyError::DependencyOrderViolation {
                resource: output.name.to_string(),
                missing: output.kind.to_string(),
            }
        })?;

        let value = source
            .resolve(&resource.logical_id, output.attribute)
            .ok_or_else(|| TopologyError::UnresolvedOutput {
                output: output.name.to_string(),
                resource: resource.logical_id.clone(),
            })?;

        entries.push(OutputEntry {
            name: output.name.to_string(),
            value,
            description: output.description.to_string(),
            export_name: exports.map(|naming| naming.export_name(graph.environment(), output.name)),
        });
    }

    invariants::validate_unique(entries.iter().map(|entry| entry.name.as_str()))?;
    invariants::validate_unique(
        entries
            .iter()
            .filter_map(|entry| entry.export_name.as_deref()),
    )?;

    Ok(OutputMap { entries })
}
