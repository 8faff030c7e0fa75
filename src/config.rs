// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Loader
//!
//! Reads an environment-keyed JSON document and turns one entry into a
//! [`ConfigurationRecord`]:
//!
//! ```json
//! {
//!   "dev": {
//!     "vpcCidr": "10.0.0.0/16",
//!     "instanceType": "t3.micro",
//!     "dbEngine": "postgres",
//!     "dbStorage": 20,
//!     "dbInstanceType": "db.t3.micro",
//!     "dbAdminUsername": "admin",
//!     "dbCredentialSecret": "dev/db-admin",
//!     "minCapacity": 1,
//!     "desiredCapacity": 2,
//!     "maxCapacity": 4
//!   }
//! }
//! ```
//!
//! Secrets are referenced by id. A plaintext `dbAdminPassword` is refused.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::{CapacityBounds, ConfigurationRecord, CredentialRef, MachineImage, SizeClass};

/// Variable naming the environment to deploy
pub const ENVIRONMENT_VAR: &str = "DEPLOY_ENV";

/// Environment used when [`ENVIRONMENT_VAR`] is unset
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration for environment \"{0}\" is missing")]
    UnknownEnvironment(String),

    #[error("Environment \"{environment}\" is missing required field {field}")]
    MissingField {
        environment: String,
        field: &'static str,
    },

    #[error("Environment \"{environment}\" field {field} is out of range: {value}")]
    OutOfRange {
        environment: String,
        field: &'static str,
        value: i64,
    },

    #[error("Environment \"{0}\" embeds a plaintext database password; reference a secret via dbCredentialSecret")]
    PlaintextCredential(String),
}

/// One environment's entry as written in the document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentEntry {
    vpc_cidr: Option<String>,
    instance_type: Option<String>,
    db_engine: Option<String>,
    db_storage: Option<i64>,
    db_instance_type: Option<String>,
    db_admin_username: Option<String>,
    db_credential_secret: Option<String>,
    db_admin_password: Option<serde_json::Value>,
    desired_capacity: Option<i64>,
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
    machine_image: Option<String>,
}

/// Environment-keyed configuration document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    environments: BTreeMap<String, EnvironmentEntry>,
}

fn required<T>(environment: &str, field: &'static str, value: Option<T>) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingField {
        environment: environment.to_string(),
        field,
    })
}

fn non_negative(environment: &str, field: &'static str, value: Option<i64>) -> Result<u32, ConfigError> {
    let value = required(environment, field, value)?;
    u32::try_from(value).map_err(|_| ConfigError::OutOfRange {
        environment: environment.to_string(),
        field,
        value,
    })
}

impl ConfigDocument {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration document from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// Environment names in sorted order
    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// Build the configuration record for one environment
    ///
    /// Only presence and numeric range are checked here; field constraints
    /// such as capacity ordering belong to resolution.
    pub fn record(&self, environment: &str) -> Result<ConfigurationRecord, ConfigError> {
        let entry = self
            .environments
            .get(environment)
            .ok_or_else(|| ConfigError::UnknownEnvironment(environment.to_string()))?;

        if entry.db_admin_password.is_some() {
            return Err(ConfigError::PlaintextCredential(environment.to_string()));
        }

        let username = required(environment, "dbAdminUsername", entry.db_admin_username.clone())?;
        let secret_id = entry
            .db_credential_secret
            .clone()
            .unwrap_or_else(|| format!("{}/db-admin", environment));

        Ok(ConfigurationRecord {
            network_range: required(environment, "vpcCidr", entry.vpc_cidr.clone())?,
            compute_size_class: SizeClass::new(required(
                environment,
                "instanceType",
                entry.instance_type.clone(),
            )?),
            database_engine: required(environment, "dbEngine", entry.db_engine.clone())?,
            database_storage_gb: non_negative(environment, "dbStorage", entry.db_storage)?,
            database_size_class: SizeClass::new(required(
                environment,
                "dbInstanceType",
                entry.db_instance_type.clone(),
            )?),
            credential: CredentialRef::new(username, secret_id),
            capacity: CapacityBounds::new(
                non_negative(environment, "minCapacity", entry.min_capacity)?,
                non_negative(environment, "desiredCapacity", entry.desired_capacity)?,
                non_negative(environment, "maxCapacity", entry.max_capacity)?,
            ),
            machine_image: entry
                .machine_image
                .clone()
                .map(MachineImage::new)
                .unwrap_or_default(),
        })
    }
}

/// Environment named by `DEPLOY_ENV`, falling back to `dev`
pub fn selected_environment() -> String {
    std::env::var(ENVIRONMENT_VAR)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}
