// Copyright (c) 2025 - Cowboy AI, Inc.
//! Engine Selector
//!
//! Maps a database engine token onto a fixed, versioned engine descriptor.
//! The engine family set is closed: adding an engine means adding a variant
//! here and a descriptor constant alongside it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{TopologyError, TopologyResult};

/// Supported database engine families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseEngine {
    Postgres,
    Mysql,
}

impl DatabaseEngine {
    /// Port the engine listens on
    pub fn native_port(&self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::Mysql => 3306,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatabaseEngine {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            _ => Err(TopologyError::UnsupportedEngine(s.to_string())),
        }
    }
}

/// Resolved, versioned identity of a database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EngineDescriptor {
    pub engine: DatabaseEngine,
    pub version: &'static str,
}

impl EngineDescriptor {
    pub const POSTGRES: EngineDescriptor = EngineDescriptor {
        engine: DatabaseEngine::Postgres,
        version: "12.22",
    };

    pub const MYSQL: EngineDescriptor = EngineDescriptor {
        engine: DatabaseEngine::Mysql,
        version: "8.0.23",
    };

    /// Descriptor for an engine family
    pub fn for_engine(engine: DatabaseEngine) -> Self {
        match engine {
            DatabaseEngine::Postgres => Self::POSTGRES,
            DatabaseEngine::Mysql => Self::MYSQL,
        }
    }

    /// Port the data boundary must open for this engine
    pub fn port(&self) -> u16 {
        self.engine.native_port()
    }
}

impl fmt::Display for EngineDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.engine, self.version)
    }
}

/// Select the engine descriptor for a configuration token
pub fn select_engine(token: &str) -> TopologyResult<EngineDescriptor> {
    let engine: DatabaseEngine = token.parse()?;
    Ok(EngineDescriptor::for_engine(engine))
}
