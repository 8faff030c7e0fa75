// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for stack-topology
//!
//! Deterministic configuration records and documents shared by the
//! integration tests.

#![allow(dead_code)]

use stack_topology::{
    CapacityBounds, ConfigurationRecord, CredentialRef, MachineImage, SizeClass, StackContext,
};

pub const STACK: &str = "genai";
pub const REGION: &str = "ca-central-1";

/// Configuration document with one entry per engine
pub const CONFIG_DOCUMENT: &str = r#"{
    "dev": {
        "vpcCidr": "10.0.0.0/16",
        "instanceType": "t3.micro",
        "dbEngine": "postgres",
        "dbStorage": 20,
        "dbInstanceType": "db.t3.micro",
        "dbAdminUsername": "admin",
        "minCapacity": 1,
        "desiredCapacity": 2,
        "maxCapacity": 4
    },
    "staging": {
        "vpcCidr": "10.10.0.0/20",
        "instanceType": "t3.small",
        "dbEngine": "mysql",
        "dbStorage": 50,
        "dbInstanceType": "db.t3.small",
        "dbAdminUsername": "admin",
        "dbCredentialSecret": "staging/rds-admin",
        "minCapacity": 1,
        "desiredCapacity": 1,
        "maxCapacity": 3
    },
    "broken": {
        "vpcCidr": "10.20.0.0/16",
        "instanceType": "t3.micro",
        "dbEngine": "oracle",
        "dbStorage": 20,
        "dbInstanceType": "db.t3.micro",
        "dbAdminUsername": "admin",
        "minCapacity": 1,
        "desiredCapacity": 1,
        "maxCapacity": 1
    }
}"#;

pub fn context() -> StackContext {
    StackContext::new(STACK, REGION)
}

/// Record with the given range, engine and capacity; other fields fixed
pub fn record(range: &str, engine: &str, (min, desired, max): (u32, u32, u32)) -> ConfigurationRecord {
    ConfigurationRecord {
        network_range: range.to_string(),
        compute_size_class: SizeClass::new("t3.micro"),
        database_engine: engine.to_string(),
        database_storage_gb: 20,
        database_size_class: SizeClass::new("db.t3.micro"),
        credential: CredentialRef::new("admin", "dev/db-admin"),
        capacity: CapacityBounds::new(min, desired, max),
        machine_image: MachineImage::default(),
    }
}

/// The reference dev record: `10.0.0.0/16`, postgres, (1, 2, 4)
pub fn dev_record() -> ConfigurationRecord {
    record("10.0.0.0/16", "postgres", (1, 2, 4))
}
