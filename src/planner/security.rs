// Copyright (c) 2025 - Cowboy AI, Inc.
//! Security Boundary Graph Builder
//!
//! Derives the three traffic-scoped boundaries and the directed allow-rules
//! between them:
//!
//! ```text
//! anywhere ──80,443──> edge ──80,443──> compute ──db port──> data
//! ```
//!
//! Edge and compute may send anywhere. Data has no outbound rules at all.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::engine::{DatabaseEngine, EngineDescriptor};
use super::network::NetworkPlan;
use crate::domain::Ipv4Cidr;

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;

/// Data port used when no engine has been selected yet
pub const DEFAULT_DATA_PORT: u16 = 3306;

/// Identity of a security boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRole {
    /// Faces the open network, attached to the load balancer
    Edge,
    /// Attached to the compute instance and scaling pool
    Compute,
    /// Attached to the database
    Data,
}

impl BoundaryRole {
    pub fn logical_id(&self) -> &'static str {
        match self {
            Self::Edge => "EdgeBoundary",
            Self::Compute => "ComputeBoundary",
            Self::Data => "DataBoundary",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Edge => "Allow HTTP and HTTPS traffic from the internet to the load balancer",
            Self::Compute => "Allow traffic only from the edge boundary on ports 80/443",
            Self::Data => "Allow traffic only from compute on the database port",
        }
    }
}

impl fmt::Display for BoundaryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge => write!(f, "edge"),
            Self::Compute => write!(f, "compute"),
            Self::Data => write!(f, "data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Tcp,
}

/// Where allowed inbound traffic may originate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "role")]
pub enum TrafficSource {
    /// Any IPv4 address
    AnyIpv4,
    /// Members of another boundary
    Boundary(BoundaryRole),
}

/// Inbound allow-rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowRule {
    pub source: TrafficSource,
    pub protocol: Protocol,
    pub port: u16,
    pub justification: String,
}

impl AllowRule {
    fn tcp(source: TrafficSource, port: u16, justification: impl Into<String>) -> Self {
        Self {
            source,
            protocol: Protocol::Tcp,
            port,
            justification: justification.into(),
        }
    }
}

/// Outbound allow-rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EgressRule {
    /// Any protocol, any destination
    AllTraffic,
}

/// Named set of traffic-allow rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityBoundary {
    pub role: BoundaryRole,
    pub description: String,
    pub inbound: Vec<AllowRule>,
    pub outbound: Vec<EgressRule>,
}

impl SecurityBoundary {
    pub fn logical_id(&self) -> &'static str {
        self.role.logical_id()
    }

    /// Other boundaries this one admits traffic from
    pub fn source_boundaries(&self) -> Vec<BoundaryRole> {
        let mut roles = Vec::new();
        for rule in &self.inbound {
            if let TrafficSource::Boundary(role) = rule.source {
                if !roles.contains(&role) {
                    roles.push(role);
                }
            }
        }
        roles
    }

    pub fn inbound_ports(&self) -> Vec<u16> {
        self.inbound.iter().map(|rule| rule.port).collect()
    }
}

/// The three boundaries of one topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundarySet {
    /// Range the boundaries are scoped to
    pub network: Ipv4Cidr,
    pub edge: SecurityBoundary,
    pub compute: SecurityBoundary,
    pub data: SecurityBoundary,
}

impl BoundarySet {
    /// Boundaries in emission order: edge, compute, data
    pub fn iter(&self) -> impl Iterator<Item = &SecurityBoundary> {
        [&self.edge, &self.compute, &self.data].into_iter()
    }

    pub fn get(&self, role: BoundaryRole) -> &SecurityBoundary {
        match role {
            BoundaryRole::Edge => &self.edge,
            BoundaryRole::Compute => &self.compute,
            BoundaryRole::Data => &self.data,
        }
    }

    /// Port the data boundary currently admits from compute
    pub fn data_port(&self) -> Option<u16> {
        self.data.inbound.first().map(|rule| rule.port)
    }

    /// Override the data port with the selected engine's native port
    ///
    /// Returns `true` when the port changed.
    pub fn reconcile(&mut self, engine: &EngineDescriptor) -> bool {
        let port = engine.port();
        if self.data_port() == Some(port) {
            return false;
        }

        info!(
            "Reconciling data boundary port {:?} -> {} for {}",
            self.data_port(),
            port,
            engine
        );
        self.data.inbound = vec![data_rule(engine.engine, port)];
        true
    }
}

fn data_rule(engine: DatabaseEngine, port: u16) -> AllowRule {
    let label = match engine {
        DatabaseEngine::Mysql => "Allow MySQL traffic from compute",
        DatabaseEngine::Postgres => "Allow PostgreSQL traffic from compute",
    };
    AllowRule::tcp(TrafficSource::Boundary(BoundaryRole::Compute), port, label)
}

fn boundary(role: BoundaryRole, inbound: Vec<AllowRule>, outbound: Vec<EgressRule>) -> SecurityBoundary {
    SecurityBoundary {
        role,
        description: role.description().to_string(),
        inbound,
        outbound,
    }
}

/// Build the boundary set for a network plan
///
/// With no engine the data boundary opens the MySQL port; the caller must
/// [`BoundarySet::reconcile`] once the engine is known. The assembler
/// rejects a set whose data port disagrees with the selected engine.
pub fn build_boundaries(plan: &NetworkPlan, engine: Option<&EngineDescriptor>) -> BoundarySet {
    let edge = boundary(
        BoundaryRole::Edge,
        vec![
            AllowRule::tcp(TrafficSource::AnyIpv4, HTTP_PORT, "Allow HTTP traffic"),
            AllowRule::tcp(TrafficSource::AnyIpv4, HTTPS_PORT, "Allow HTTPS traffic"),
        ],
        vec![EgressRule::AllTraffic],
    );

    let from_edge = TrafficSource::Boundary(BoundaryRole::Edge);
    let compute = boundary(
        BoundaryRole::Compute,
        vec![
            AllowRule::tcp(from_edge, HTTP_PORT, "Allow HTTP traffic from edge"),
            AllowRule::tcp(from_edge, HTTPS_PORT, "Allow HTTPS traffic from edge"),
        ],
        vec![EgressRule::AllTraffic],
    );

    let data_inbound = match engine {
        Some(descriptor) => data_rule(descriptor.engine, descriptor.port()),
        None => data_rule(DatabaseEngine::Mysql, DEFAULT_DATA_PORT),
    };
    let data = boundary(BoundaryRole::Data, vec![data_inbound], Vec::new());

    debug!(
        "Built security boundaries for {} (data port {})",
        plan.range(),
        data.inbound[0].port
    );

    BoundarySet {
        network: plan.range(),
        edge,
        compute,
        data,
    }
}
