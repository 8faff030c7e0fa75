// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Assembler
//!
//! Composes the network plan, boundary set and engine descriptor into a
//! [`TopologyGraph`]. Emission order is fixed:
//!
//! 1. network, then zones
//! 2. boundaries (edge, compute, data)
//! 3. compute instance in the first public zone
//! 4. database across both isolated zones, after the port/engine check
//! 5. scaling pool across the public zones, bounds taken verbatim
//! 6. load balancer across the public zones, on the edge boundary

use tracing::debug;

use super::engine::EngineDescriptor;
use super::network::{NetworkPlan, Zone, REDUNDANCY_FACTOR};
use super::security::{BoundaryRole, BoundarySet};
use crate::domain::ConfigurationRecord;
use crate::errors::{TopologyError, TopologyResult};
use crate::topology::{logical_ids, ResourceDescriptor, ResourceSpec, TopologyBuilder, TopologyGraph};

/// Check the data boundary admits exactly the selected engine's port
pub fn validate_port_engine(
    boundaries: &BoundarySet,
    engine: &EngineDescriptor,
) -> TopologyResult<()> {
    let expected = engine.port();
    let mismatch = |found| TopologyError::PortEngineMismatch {
        engine: engine.engine,
        expected,
        found,
    };

    // an empty data boundary admits nothing, which no engine can work with
    if boundaries.data.inbound.is_empty() {
        return Err(mismatch(0));
    }
    match boundaries.data.inbound.iter().find(|rule| rule.port != expected) {
        Some(rule) => Err(mismatch(rule.port)),
        None => Ok(()),
    }
}

fn zone_ids<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> Vec<String> {
    zones.into_iter().map(|zone| zone.logical_id.clone()).collect()
}

/// Assemble the ordered topology for one environment
pub fn assemble(
    environment: &str,
    record: &ConfigurationRecord,
    plan: &NetworkPlan,
    boundaries: &BoundarySet,
    engine: &EngineDescriptor,
) -> TopologyResult<TopologyGraph> {
    let mut builder = TopologyBuilder::new(environment);

    builder.push(ResourceDescriptor::new(
        logical_ids::NETWORK,
        ResourceSpec::Network {
            cidr: plan.range(),
            failure_domains: REDUNDANCY_FACTOR,
        },
    ))?;

    for zone in plan.zones() {
        builder.push(ResourceDescriptor::new(
            zone.logical_id.clone(),
            ResourceSpec::Zone {
                network: logical_ids::NETWORK.to_string(),
                zone: zone.clone(),
            },
        ))?;
    }

    for boundary in boundaries.iter() {
        builder.push(ResourceDescriptor::new(
            boundary.logical_id(),
            ResourceSpec::SecurityBoundary {
                network: logical_ids::NETWORK.to_string(),
                boundary: boundary.clone(),
            },
        ))?;
    }

    let public = plan.public_zones();
    let isolated = plan.isolated_zones();
    let compute_boundary = BoundaryRole::Compute.logical_id().to_string();

    let primary_zone = public.first().ok_or_else(|| TopologyError::DependencyOrderViolation {
        resource: logical_ids::COMPUTE_INSTANCE.to_string(),
        missing: "public zone".to_string(),
    })?;

    builder.push(ResourceDescriptor::new(
        logical_ids::COMPUTE_INSTANCE,
        ResourceSpec::ComputeInstance {
            size_class: record.compute_size_class.clone(),
            machine_image: record.machine_image.clone(),
            zone: primary_zone.logical_id.clone(),
            boundary: compute_boundary.clone(),
        },
    ))?;

    validate_port_engine(boundaries, engine)?;

    builder.push(ResourceDescriptor::new(
        logical_ids::DATABASE,
        ResourceSpec::Database {
            engine: *engine,
            size_class: record.database_size_class.clone(),
            storage_gb: record.database_storage_gb,
            zones: zone_ids(isolated),
            boundary: BoundaryRole::Data.logical_id().to_string(),
            credential: record.credential.clone(),
            multi_zone: true,
        },
    ))?;

    builder.push(ResourceDescriptor::new(
        logical_ids::SCALING_POOL,
        ResourceSpec::ScalingPool {
            size_class: record.compute_size_class.clone(),
            machine_image: record.machine_image.clone(),
            zones: zone_ids(public.iter().copied()),
            boundary: compute_boundary,
            capacity: record.capacity,
        },
    ))?;

    builder.push(ResourceDescriptor::new(
        logical_ids::load_balancer(environment),
        ResourceSpec::LoadBalancer {
            internet_facing: true,
            zones: zone_ids(public.iter().copied()),
            boundary: BoundaryRole::Edge.logical_id().to_string(),
        },
    ))?;

    let graph = builder.build();
    graph.verify_order()?;

    debug!(
        "Assembled {} resources for environment {}",
        graph.len(),
        environment
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CapacityBounds, CredentialRef, MachineImage, ResourceKind, SizeClass};
    use crate::planner::network::plan_network;
    use crate::planner::security::build_boundaries;
    use pretty_assertions::assert_eq;

    fn record(engine: &str) -> ConfigurationRecord {
        ConfigurationRecord {
            network_range: "10.0.0.0/16".to_string(),
            compute_size_class: SizeClass::new("t3.micro"),
            database_engine: engine.to_string(),
            database_storage_gb: 20,
            database_size_class: SizeClass::new("db.t3.micro"),
            credential: CredentialRef::new("admin", "dev/db-admin"),
            capacity: CapacityBounds::new(1, 2, 4),
            machine_image: MachineImage::default(),
        }
    }

    fn assembled(engine: &EngineDescriptor) -> TopologyGraph {
        let plan = plan_network("10.0.0.0/16", "ca-central-1").unwrap();
        let mut boundaries = build_boundaries(&plan, None);
        boundaries.reconcile(engine);
        assemble("dev", &record(engine.engine.as_str()), &plan, &boundaries, engine).unwrap()
    }

    #[test]
    fn test_emission_order() {
        let graph = assembled(&EngineDescriptor::POSTGRES);
        let ids: Vec<&str> = graph
            .resources()
            .iter()
            .map(|r| r.logical_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "Network",
                "PublicZone1",
                "PublicZone2",
                "IsolatedZone1",
                "IsolatedZone2",
                "EdgeBoundary",
                "ComputeBoundary",
                "DataBoundary",
                "ComputeInstance",
                "Database",
                "ScalingPool",
                "LoadBalancer-dev",
            ]
        );
    }

    #[test]
    fn test_database_spans_isolated_zones() {
        let graph = assembled(&EngineDescriptor::MYSQL);
        let database = graph.get(logical_ids::DATABASE).unwrap();
        match &database.spec {
            ResourceSpec::Database {
                zones,
                boundary,
                multi_zone,
                credential,
                engine,
                ..
            } => {
                assert_eq!(zones, &vec!["IsolatedZone1".to_string(), "IsolatedZone2".to_string()]);
                assert_eq!(boundary, "DataBoundary");
                assert!(*multi_zone);
                assert_eq!(credential.secret_id, "dev/db-admin");
                assert_eq!(*engine, EngineDescriptor::MYSQL);
            }
            other => panic!("unexpected spec {:?}", other),
        }
    }

    #[test]
    fn test_scaling_pool_mirrors_compute() {
        let graph = assembled(&EngineDescriptor::POSTGRES);
        let compute = graph.get(logical_ids::COMPUTE_INSTANCE).unwrap();
        let pool = graph.get(logical_ids::SCALING_POOL).unwrap();

        let (compute_size, compute_boundary) = match &compute.spec {
            ResourceSpec::ComputeInstance { size_class, boundary, .. } => (size_class, boundary),
            other => panic!("unexpected spec {:?}", other),
        };
        match &pool.spec {
            ResourceSpec::ScalingPool {
                size_class,
                boundary,
                capacity,
                zones,
                ..
            } => {
                assert_eq!(size_class, compute_size);
                assert_eq!(boundary, compute_boundary);
                assert_eq!(*capacity, CapacityBounds::new(1, 2, 4));
                assert_eq!(zones.len(), 2);
            }
            other => panic!("unexpected spec {:?}", other),
        }
    }

    #[test]
    fn test_unreconciled_postgres_fails() {
        let plan = plan_network("10.0.0.0/16", "ca-central-1").unwrap();
        let boundaries = build_boundaries(&plan, None);
        let err = assemble(
            "dev",
            &record("postgres"),
            &plan,
            &boundaries,
            &EngineDescriptor::POSTGRES,
        )
        .unwrap_err();
        assert_eq!(
            err,
            TopologyError::PortEngineMismatch {
                engine: crate::planner::engine::DatabaseEngine::Postgres,
                expected: 5432,
                found: 3306,
            }
        );
    }

    #[test]
    fn test_every_kind_present_once_except_zones_and_boundaries() {
        let graph = assembled(&EngineDescriptor::POSTGRES);
        assert_eq!(graph.of_kind(ResourceKind::Zone).count(), 4);
        assert_eq!(graph.of_kind(ResourceKind::SecurityBoundary).count(), 3);
        for kind in [
            ResourceKind::Network,
            ResourceKind::ComputeInstance,
            ResourceKind::Database,
            ResourceKind::ScalingPool,
            ResourceKind::LoadBalancer,
        ] {
            assert_eq!(graph.of_kind(kind).count(), 1, "{}", kind);
        }
    }
}
