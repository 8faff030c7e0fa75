// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Interface
//!
//! The topology graph is handed, resource by resource in emitted order, to
//! an external actuator that turns descriptors into real resources and
//! reports concrete identifiers back. Those identifiers then feed the
//! output publisher through [`ProvisionedIdentifiers`].
//!
//! ```text
//! TopologyGraph ──(in order)──> ProvisioningActuator ──> ProvisionReceipt
//!                                                            │
//!                                   ProvisionedIdentifiers <─┘
//!                                            │
//!                                            ▼
//!                                     outputs::publish
//! ```
//!
//! Retrying transient allocation failures is the actuator's business.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ResourceKind;
use crate::planner::{IdentifierSource, ResourceAttribute};
use crate::topology::{ResourceDescriptor, TopologyGraph};

/// Errors reported by an actuator
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The actuator refused or failed to create a resource
    #[error("Provisioning of '{logical_id}' failed: {reason}")]
    Rejected { logical_id: String, reason: String },

    /// A receipt did not belong to the resource that was submitted
    #[error("Receipt for '{received}' returned while provisioning '{expected}'")]
    ReceiptMismatch { expected: String, received: String },

    /// The actuator itself is not reachable
    #[error("Actuator unavailable: {0}")]
    Unavailable(String),
}

/// Concrete identity reported for one provisioned resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReceipt {
    pub logical_id: String,
    pub physical_id: String,
    /// Attribute name → value, keyed by [`ResourceAttribute::as_str`]
    pub attributes: BTreeMap<String, String>,
}

impl ProvisionReceipt {
    pub fn new(logical_id: impl Into<String>, physical_id: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            physical_id: physical_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: ResourceAttribute, value: impl Into<String>) -> Self {
        self.attributes
            .insert(attribute.as_str().to_string(), value.into());
        self
    }
}

/// Turns resource descriptors into real resources
#[async_trait]
pub trait ProvisioningActuator: Send + Sync {
    /// Create one resource; every dependency has already been provisioned
    async fn provision(
        &mut self,
        resource: &ResourceDescriptor,
    ) -> Result<ProvisionReceipt, ProvisionError>;
}

/// Identifiers collected from actuator receipts
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionedIdentifiers {
    receipts: HashMap<String, ProvisionReceipt>,
}

impl ProvisionedIdentifiers {
    pub fn insert(&mut self, receipt: ProvisionReceipt) {
        self.receipts.insert(receipt.logical_id.clone(), receipt);
    }

    pub fn receipt(&self, logical_id: &str) -> Option<&ProvisionReceipt> {
        self.receipts.get(logical_id)
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

impl IdentifierSource for ProvisionedIdentifiers {
    fn resolve(&self, logical_id: &str, attribute: ResourceAttribute) -> Option<String> {
        let receipt = self.receipts.get(logical_id)?;
        match receipt.attributes.get(attribute.as_str()) {
            Some(value) => Some(value.clone()),
            None if attribute == ResourceAttribute::Id => Some(receipt.physical_id.clone()),
            None => None,
        }
    }
}

/// Hand every resource to the actuator in emitted order
///
/// Stops at the first failure; resources already provisioned stay as they
/// are.
pub async fn provision_topology<A>(
    actuator: &mut A,
    graph: &TopologyGraph,
) -> Result<ProvisionedIdentifiers, ProvisionError>
where
    A: ProvisioningActuator + ?Sized,
{
    info!(
        "Provisioning {} resources for environment {}",
        graph.len(),
        graph.environment()
    );

    let mut identifiers = ProvisionedIdentifiers::default();
    for resource in graph.resources() {
        let receipt = actuator.provision(resource).await?;
        if receipt.logical_id != resource.logical_id {
            return Err(ProvisionError::ReceiptMismatch {
                expected: resource.logical_id.clone(),
                received: receipt.logical_id,
            });
        }
        debug!("Provisioned {} as {}", resource.logical_id, receipt.physical_id);
        identifiers.insert(receipt);
    }

    Ok(identifiers)
}

/// Actuator that allocates nothing and reports deterministic identifiers
///
/// Physical ids are UUIDv5 digests of stack, environment and logical id, so
/// repeated dry runs of the same topology agree.
#[derive(Debug, Clone)]
pub struct DryRunActuator {
    namespace: Uuid,
    environment: String,
    region: String,
    submitted: Vec<String>,
}

impl DryRunActuator {
    pub fn new(stack: &str, environment: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            namespace: Uuid::new_v5(&Uuid::NAMESPACE_OID, stack.as_bytes()),
            environment: environment.into(),
            region: region.into(),
            submitted: Vec::new(),
        }
    }

    /// Logical ids in the order they were submitted
    pub fn submitted(&self) -> &[String] {
        &self.submitted
    }

    fn digest(&self, logical_id: &str) -> String {
        let name = format!("{}/{}", self.environment, logical_id);
        let id = Uuid::new_v5(&self.namespace, name.as_bytes());
        id.simple().to_string()[..12].to_string()
    }

    fn id_prefix(kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Network => "net",
            ResourceKind::Zone => "zone",
            ResourceKind::SecurityBoundary => "sg",
            ResourceKind::ComputeInstance => "i",
            ResourceKind::Database => "db",
            ResourceKind::ScalingPool => "pool",
            ResourceKind::LoadBalancer => "lb",
        }
    }
}

#[async_trait]
impl ProvisioningActuator for DryRunActuator {
    async fn provision(
        &mut self,
        resource: &ResourceDescriptor,
    ) -> Result<ProvisionReceipt, ProvisionError> {
        if let Some(missing) = resource
            .depends_on
            .iter()
            .find(|dependency| !self.submitted.contains(dependency))
        {
            return Err(ProvisionError::Rejected {
                logical_id: resource.logical_id.clone(),
                reason: format!("dependency '{}' not provisioned", missing),
            });
        }

        let kind = resource.kind();
        let digest = self.digest(&resource.logical_id);
        let physical_id = format!("{}-{}", Self::id_prefix(kind), digest);
        let slug = resource.logical_id.to_ascii_lowercase();

        let receipt = ProvisionReceipt::new(resource.logical_id.clone(), physical_id.clone())
            .with_attribute(ResourceAttribute::Id, physical_id.clone());
        let receipt = match kind {
            ResourceKind::Database => receipt.with_attribute(
                ResourceAttribute::Endpoint,
                format!("{}-{}.{}.db.internal", slug, digest, self.region),
            ),
            ResourceKind::ScalingPool => receipt.with_attribute(
                ResourceAttribute::Name,
                format!("{}-{}-{}", self.environment, slug, digest),
            ),
            ResourceKind::LoadBalancer => receipt.with_attribute(
                ResourceAttribute::DnsName,
                format!("{}-{}.{}.lb.internal", slug, digest, self.region),
            ),
            _ => receipt,
        };

        self.submitted.push(resource.logical_id.clone());
        Ok(receipt)
    }
}
