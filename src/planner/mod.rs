// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resolution Stages
//!
//! Each stage consumes only the previous stage's output:
//!
//! ```text
//! ConfigurationRecord
//!        │
//!        ▼
//! network::plan_network ──> security::build_boundaries ──> engine::select_engine
//!                                                              │
//!                                                   BoundarySet::reconcile
//!                                                              │
//!                                                              ▼
//!                          outputs::publish <── assembler::assemble
//! ```

pub mod assembler;
pub mod engine;
pub mod network;
pub mod outputs;
pub mod security;

pub use assembler::{assemble, validate_port_engine};
pub use engine::{select_engine, DatabaseEngine, EngineDescriptor};
pub use network::{plan_network, NetworkPlan, Zone, ZoneTag, REDUNDANCY_FACTOR, ZONE_PREFIX};
pub use outputs::{
    publish, DeferredIdentifiers, ExportNaming, IdentifierSource, OutputEntry, OutputMap,
    ResourceAttribute,
};
pub use security::{
    build_boundaries, AllowRule, BoundaryRole, BoundarySet, EgressRule, Protocol,
    SecurityBoundary, TrafficSource,
};
