// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration-to-topology resolution for environment-scoped stacks
//!
//! Turns a per-environment [`ConfigurationRecord`] into an ordered
//! [`TopologyGraph`]: a network split into public and isolated zones, three
//! security boundaries, a compute instance, a multi-zone database, a
//! scaling pool and a load balancer, plus the published outputs that tie
//! them to downstream consumers.
//!
//! ```rust
//! use stack_topology::{resolve, CapacityBounds, ConfigurationRecord, CredentialRef,
//!     MachineImage, SizeClass, StackContext};
//!
//! let record = ConfigurationRecord {
//!     network_range: "10.0.0.0/16".into(),
//!     compute_size_class: SizeClass::new("t3.micro"),
//!     database_engine: "postgres".into(),
//!     database_storage_gb: 20,
//!     database_size_class: SizeClass::new("db.t3.micro"),
//!     credential: CredentialRef::new("admin", "dev/db-admin"),
//!     capacity: CapacityBounds::new(1, 2, 4),
//!     machine_image: MachineImage::default(),
//! };
//!
//! let resolution = resolve(&StackContext::default(), "dev", &record).unwrap();
//! assert_eq!(resolution.boundaries.data_port(), Some(5432));
//! assert_eq!(resolution.plan.zones().len(), 4);
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod planner;
pub mod provision;
pub mod resolver;
pub mod summary;
pub mod topology;

// Re-export commonly used types
pub use config::{ConfigDocument, ConfigError};
pub use domain::{CapacityBounds, ConfigurationRecord, CredentialRef, Ipv4Cidr, MachineImage, SizeClass};
pub use errors::{EnvironmentError, ResolutionError, TopologyError, TopologyResult};
pub use planner::{DatabaseEngine, EngineDescriptor, OutputMap};
pub use provision::{provision_topology, DryRunActuator, ProvisionError, ProvisioningActuator};
pub use resolver::{
    resolve, resolve_all, resolve_document, BatchOutcome, FailurePolicy, Resolution, StackContext,
};
pub use summary::DeploymentSummary;
pub use topology::{ResourceDescriptor, ResourceSpec, TopologyGraph};
