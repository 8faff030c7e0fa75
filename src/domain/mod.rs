// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Value objects and input records for topology resolution, each validated
//! on construction or through the pure functions in [`invariants`].
//!
//! # Value Objects with Invariants
//!
//! - [`Ipv4Cidr`] - IPv4 network block with subnet carving
//! - [`SizeClass`] - Instance size class token (`family.size`)
//! - [`CapacityBounds`] - Scaling pool bounds (`min <= desired <= max`)
//! - [`CredentialRef`] - Opaque database credential handle
//! - [`ResourceKind`] - Resource taxonomy
//!
//! # Input Record
//!
//! - [`ConfigurationRecord`] - One environment's flat configuration

pub mod config;
pub mod invariants;
pub mod network;
pub mod resource_type;

pub use config::{CapacityBounds, ConfigurationRecord, CredentialRef, MachineImage, SizeClass};
pub use network::{Ipv4Cidr, NetworkError};
pub use resource_type::{ResourceCategory, ResourceKind};
