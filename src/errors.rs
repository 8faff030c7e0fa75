// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology resolution

use thiserror::Error;

use crate::config::ConfigError;
use crate::planner::engine::DatabaseEngine;

/// Errors that can occur while resolving a configuration into a topology
///
/// Every variant is detected synchronously during a resolution pass and
/// aborts that pass. None of them are transient.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Network range is malformed or too small for the zone layout
    #[error("Invalid network range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    /// Database engine token is not one of the supported engines
    #[error("Unsupported database engine: {0}")]
    UnsupportedEngine(String),

    /// Data boundary port disagrees with the selected engine
    #[error("Data boundary allows port {found} but engine {engine} listens on {expected}")]
    PortEngineMismatch {
        engine: DatabaseEngine,
        expected: u16,
        found: u16,
    },

    /// A resource referenced something that has not been emitted yet
    #[error("Resource '{resource}' depends on '{missing}' which was not emitted before it")]
    DependencyOrderViolation { resource: String, missing: String },

    /// Configuration record violates a field constraint
    #[error("Configuration constraint violated: {0}")]
    ConfigurationConstraint(String),

    /// Two resources share a logical id
    #[error("Duplicate logical id: {0}")]
    DuplicateLogicalId(String),

    /// Two outputs share a name or export name
    #[error("Duplicate output or export name: {0}")]
    DuplicateExport(String),

    /// No value is known for an output's source resource
    #[error("Output '{output}' has no value for resource '{resource}'")]
    UnresolvedOutput { output: String, resource: String },
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

/// A failed resolution pass, tagged with the environment it belonged to
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Environment '{environment}': {kind}")]
pub struct ResolutionError {
    pub environment: String,
    #[source]
    pub kind: TopologyError,
}

impl ResolutionError {
    pub fn new(environment: impl Into<String>, kind: TopologyError) -> Self {
        Self {
            environment: environment.into(),
            kind,
        }
    }
}

/// Why one environment of a batch produced no topology
///
/// Either its entry could not be turned into a record, or its resolution
/// pass failed. Neither affects the other environments of the batch.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// The configuration entry is missing, incomplete or out of range
    #[error("{source}")]
    Config {
        environment: String,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl EnvironmentError {
    pub fn config(environment: impl Into<String>, source: ConfigError) -> Self {
        Self::Config {
            environment: environment.into(),
            source,
        }
    }

    /// Name of the environment that failed
    pub fn environment(&self) -> &str {
        match self {
            Self::Config { environment, .. } => environment,
            Self::Resolution(err) => &err.environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_names_environment() {
        let err = ResolutionError::new(
            "staging",
            TopologyError::UnsupportedEngine("oracle".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Environment 'staging': Unsupported database engine: oracle"
        );
    }

    #[test]
    fn test_port_mismatch_message() {
        let err = TopologyError::PortEngineMismatch {
            engine: DatabaseEngine::Postgres,
            expected: 5432,
            found: 3306,
        };
        assert!(err.to_string().contains("3306"));
        assert!(err.to_string().contains("postgres"));
    }

    #[test]
    fn test_environment_error_names_environment() {
        let config = EnvironmentError::config(
            "qa",
            ConfigError::MissingField {
                environment: "qa".to_string(),
                field: "dbAdminUsername",
            },
        );
        assert_eq!(config.environment(), "qa");
        assert!(config.to_string().contains("dbAdminUsername"));

        let resolution: EnvironmentError = ResolutionError::new(
            "prod",
            TopologyError::UnsupportedEngine("oracle".to_string()),
        )
        .into();
        assert_eq!(resolution.environment(), "prod");
    }
}
