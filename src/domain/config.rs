// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Record
//!
//! The flat, per-environment input to a resolution pass. A record is plain
//! data; [`ConfigurationRecord::validate`] enforces the field constraints
//! before any planning happens.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::invariants;
use crate::errors::TopologyResult;

/// Instance size class such as `t3.micro` or `db.t3.micro`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeClass(String);

impl SizeClass {
    pub fn new(class: impl Into<String>) -> Self {
        Self(class.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Machine image the compute instance and scaling pool boot from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineImage(String);

impl MachineImage {
    /// Latest Amazon Linux 2, resolved by the provisioning engine
    pub const DEFAULT: &'static str = "amazon-linux-2:latest";

    pub fn new(image: impl Into<String>) -> Self {
        Self(image.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MachineImage {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for MachineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to database admin credentials
///
/// Holds only the admin username and the identifier of the secret that the
/// credential store resolves at deployment time. No secret bytes live here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialRef {
    pub username: String,
    pub secret_id: String,
}

impl CredentialRef {
    pub fn new(username: impl Into<String>, secret_id: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret_id: secret_id.into(),
        }
    }
}

/// Scaling pool capacity bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapacityBounds {
    pub min: u32,
    pub desired: u32,
    pub max: u32,
}

impl CapacityBounds {
    pub fn new(min: u32, desired: u32, max: u32) -> Self {
        Self { min, desired, max }
    }
}

impl fmt::Display for CapacityBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min={} desired={} max={}",
            self.min, self.desired, self.max
        )
    }
}

/// Validated input for one environment's resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    /// Parent network range in CIDR notation
    pub network_range: String,

    /// Size class for the compute instance and scaling pool
    pub compute_size_class: SizeClass,

    /// Database engine token, resolved by the engine selector
    pub database_engine: String,

    /// Allocated database storage
    pub database_storage_gb: u32,

    /// Size class for the database instance
    pub database_size_class: SizeClass,

    /// Admin credential handle
    pub credential: CredentialRef,

    /// Scaling pool bounds
    pub capacity: CapacityBounds,

    #[serde(default)]
    pub machine_image: MachineImage,
}

impl ConfigurationRecord {
    /// Check every field constraint
    ///
    /// Capacity ordering is checked first so that a bad scaling range is
    /// reported even when other fields are also off.
    pub fn validate(&self) -> TopologyResult<()> {
        invariants::validate_capacity_bounds(&self.capacity)?;
        invariants::validate_storage(self.database_storage_gb)?;
        invariants::validate_size_class("compute size class", &self.compute_size_class)?;
        invariants::validate_size_class("database size class", &self.database_size_class)?;
        invariants::validate_credential(&self.credential)?;
        Ok(())
    }
}
