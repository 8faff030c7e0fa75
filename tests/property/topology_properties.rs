// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Properties
//!
//! For any range wide enough to host four /24 zones, resolution must carve
//! disjoint zones inside the range and emit a dependency-ordered graph.

use proptest::prelude::*;
use stack_topology::planner::{plan_network, ZONE_PREFIX};
use stack_topology::topology::logical_ids;
use stack_topology::{
    resolve, CapacityBounds, ConfigurationRecord, CredentialRef, Ipv4Cidr, MachineImage,
    ResourceSpec, SizeClass, StackContext, TopologyError,
};
use std::collections::HashSet;
use std::net::Ipv4Addr;

// ============================================================================
// Strategies
// ============================================================================

fn range_with_prefix(prefixes: std::ops::RangeInclusive<u8>) -> impl Strategy<Value = String> {
    (any::<u32>(), prefixes).prop_map(|(address, prefix)| {
        let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
        format!("{}/{}", Ipv4Addr::from(address & mask), prefix)
    })
}

/// Ranges that fit two public and two isolated /24 zones
fn wide_range() -> impl Strategy<Value = String> {
    range_with_prefix(8..=22)
}

/// Ranges too narrow for four /24 zones
fn narrow_range() -> impl Strategy<Value = String> {
    range_with_prefix(23..=32)
}

fn capacity() -> impl Strategy<Value = CapacityBounds> {
    (0u32..50, 0u32..50, 0u32..50).prop_map(|(a, b, c)| {
        let mut bounds = [a, b, c];
        bounds.sort_unstable();
        CapacityBounds::new(bounds[0], bounds[1], bounds[2].max(1))
    })
}

fn engine() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("postgres"), Just("mysql"), Just("PostgreSQL"), Just("MySQL")]
}

fn environment_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}(-[a-z0-9]{1,4})?"
}

fn record(range: String, engine: &str, capacity: CapacityBounds) -> ConfigurationRecord {
    ConfigurationRecord {
        network_range: range,
        compute_size_class: SizeClass::new("t3.micro"),
        database_engine: engine.to_string(),
        database_storage_gb: 20,
        database_size_class: SizeClass::new("db.t3.micro"),
        credential: CredentialRef::new("admin", "dev/db-admin"),
        capacity,
        machine_image: MachineImage::default(),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: every wide range yields four disjoint /24 zones inside it
    #[test]
    fn prop_zones_are_disjoint_and_contained(range in wide_range()) {
        let plan = plan_network(&range, "ca-central-1").unwrap();
        let parent = Ipv4Cidr::new(&range).unwrap();
        let zones = plan.zones();

        prop_assert_eq!(zones.len(), 4);
        for (i, zone) in zones.iter().enumerate() {
            prop_assert_eq!(zone.cidr.prefix_length(), ZONE_PREFIX);
            prop_assert!(parent.contains(&zone.cidr));
            for other in &zones[i + 1..] {
                prop_assert!(!zone.cidr.overlaps(&other.cidr));
            }
        }
    }

    /// Property: ranges narrower than /22 are rejected as invalid
    #[test]
    fn prop_narrow_ranges_rejected(range in narrow_range()) {
        let err = plan_network(&range, "ca-central-1").unwrap_err();
        let is_invalid_range = matches!(err, TopologyError::InvalidRange { .. });
        prop_assert!(is_invalid_range);
    }

    /// Property: scaling pool capacity equals the configured bounds
    #[test]
    fn prop_capacity_preserved(bounds in capacity(), engine in engine()) {
        let resolution = resolve(
            &StackContext::default(),
            "dev",
            &record("10.0.0.0/16".to_string(), engine, bounds),
        )
        .unwrap();

        let pool = resolution.graph.get(logical_ids::SCALING_POOL).unwrap();
        match &pool.spec {
            ResourceSpec::ScalingPool { capacity, .. } => prop_assert_eq!(*capacity, bounds),
            other => prop_assert!(false, "unexpected spec {:?}", other),
        }
    }

    /// Property: every dependency is emitted before its dependent
    #[test]
    fn prop_dependencies_precede_dependents(range in wide_range(), engine in engine()) {
        let resolution = resolve(
            &StackContext::default(),
            "dev",
            &record(range, engine, CapacityBounds::new(1, 2, 4)),
        )
        .unwrap();
        let graph = &resolution.graph;

        for (index, resource) in graph.resources().iter().enumerate() {
            for dependency in &resource.depends_on {
                let at = graph.position(dependency);
                prop_assert!(matches!(at, Some(at) if at < index));
            }
        }
        prop_assert!(graph.verify_order().is_ok());
    }

    /// Property: distinct environments never share an export name
    #[test]
    fn prop_export_names_never_collide(
        first in environment_name(),
        second in environment_name(),
    ) {
        prop_assume!(first != second);
        let context = StackContext::default();
        let record = record("10.0.0.0/16".to_string(), "mysql", CapacityBounds::new(1, 1, 2));

        let a = resolve(&context, &first, &record).unwrap();
        let b = resolve(&context, &second, &record).unwrap();

        let names: HashSet<&str> = a.outputs.export_names().collect();
        prop_assert_eq!(names.len(), a.outputs.len());
        for name in b.outputs.export_names() {
            prop_assert!(!names.contains(name));
        }
    }
}
