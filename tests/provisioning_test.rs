// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Tests
//!
//! Drives resolved topologies through provisioning actuators and checks
//! that outputs resolve to concrete identifiers afterwards.

mod fixtures;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use stack_topology::planner::{IdentifierSource, ResourceAttribute};
use stack_topology::provision::ProvisionReceipt;
use stack_topology::{
    provision_topology, resolve, DeploymentSummary, DryRunActuator, ProvisionError,
    ProvisioningActuator, ResourceDescriptor, TopologyError,
};

/// Actuator that fails on one logical id
struct FailingActuator {
    fail_on: String,
    seen: Vec<String>,
}

#[async_trait]
impl ProvisioningActuator for FailingActuator {
    async fn provision(
        &mut self,
        resource: &ResourceDescriptor,
    ) -> Result<ProvisionReceipt, ProvisionError> {
        self.seen.push(resource.logical_id.clone());
        if resource.logical_id == self.fail_on {
            return Err(ProvisionError::Unavailable("capacity exhausted".to_string()));
        }
        Ok(ProvisionReceipt::new(
            resource.logical_id.clone(),
            format!("phys-{}", resource.logical_id),
        ))
    }
}

/// Actuator that answers with the wrong logical id
struct ConfusedActuator;

#[async_trait]
impl ProvisioningActuator for ConfusedActuator {
    async fn provision(
        &mut self,
        _resource: &ResourceDescriptor,
    ) -> Result<ProvisionReceipt, ProvisionError> {
        Ok(ProvisionReceipt::new("Somebody", "phys-0"))
    }
}

#[tokio::test]
async fn test_dry_run_submits_in_emitted_order() {
    let resolution = resolve(&fixtures::context(), "dev", &fixtures::dev_record()).unwrap();
    let mut actuator = DryRunActuator::new(fixtures::STACK, "dev", fixtures::REGION);

    let identifiers = provision_topology(&mut actuator, &resolution.graph)
        .await
        .unwrap();

    let emitted: Vec<String> = resolution
        .graph
        .resources()
        .iter()
        .map(|r| r.logical_id.clone())
        .collect();
    assert_eq!(actuator.submitted(), emitted.as_slice());
    assert_eq!(identifiers.len(), resolution.graph.len());
}

#[tokio::test]
async fn test_republish_replaces_placeholders() {
    let resolution = resolve(&fixtures::context(), "dev", &fixtures::dev_record()).unwrap();
    assert!(resolution
        .outputs
        .entries()
        .iter()
        .all(|entry| entry.value.starts_with("${")));

    let mut actuator = DryRunActuator::new(fixtures::STACK, "dev", fixtures::REGION);
    let identifiers = provision_topology(&mut actuator, &resolution.graph)
        .await
        .unwrap();
    let outputs = resolution.republish(&identifiers).unwrap();

    assert_eq!(outputs.len(), 5);
    assert!(outputs.value("NetworkId").unwrap().starts_with("net-"));
    assert!(outputs.value("ComputeInstanceId").unwrap().starts_with("i-"));
    assert!(outputs
        .value("DatabaseEndpoint")
        .unwrap()
        .ends_with(".ca-central-1.db.internal"));
    assert!(outputs
        .value("LoadBalancerDnsName")
        .unwrap()
        .ends_with(".ca-central-1.lb.internal"));
    assert!(outputs.value("ScalingPoolName").unwrap().starts_with("dev-"));

    // export names do not change when values become concrete
    let before: Vec<&str> = resolution.outputs.export_names().collect();
    let after: Vec<&str> = outputs.export_names().collect();
    assert_eq!(before, after);

    let summary = DeploymentSummary::new(&fixtures::context(), &resolution, outputs, true);
    assert!(summary.provisioned);
    assert_eq!(summary.data_port, Some(5432));
}

#[tokio::test]
async fn test_failure_stops_provisioning() {
    let resolution = resolve(&fixtures::context(), "dev", &fixtures::dev_record()).unwrap();
    let mut actuator = FailingActuator {
        fail_on: "Database".to_string(),
        seen: Vec::new(),
    };

    let err = provision_topology(&mut actuator, &resolution.graph)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Unavailable(_)));
    assert_eq!(actuator.seen.last().map(String::as_str), Some("Database"));
    assert!(!actuator.seen.iter().any(|id| id == "ScalingPool"));
}

#[tokio::test]
async fn test_receipt_for_wrong_resource_rejected() {
    let resolution = resolve(&fixtures::context(), "dev", &fixtures::dev_record()).unwrap();
    let err = provision_topology(&mut ConfusedActuator, &resolution.graph)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisionError::ReceiptMismatch { .. }));
}

#[tokio::test]
async fn test_missing_attribute_is_unresolved_output() {
    let resolution = resolve(&fixtures::context(), "dev", &fixtures::dev_record()).unwrap();
    // receipts carry only physical ids, so the endpoint cannot be resolved
    let mut actuator = FailingActuator {
        fail_on: String::new(),
        seen: Vec::new(),
    };
    let identifiers = provision_topology(&mut actuator, &resolution.graph)
        .await
        .unwrap();

    assert_eq!(
        identifiers
            .receipt("Network")
            .map(|r| r.physical_id.as_str()),
        Some("phys-Network")
    );
    assert_eq!(
        identifiers.resolve("Network", ResourceAttribute::Id),
        Some("phys-Network".to_string())
    );
    assert_eq!(
        resolution.republish(&identifiers).unwrap_err(),
        TopologyError::UnresolvedOutput {
            output: "DatabaseEndpoint".to_string(),
            resource: "Database".to_string(),
        }
    );
}
