// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Summary
//!
//! Serializable account of one resolution pass, handed to whatever
//! publishes deployment results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ResourceCategory, ResourceKind};
use crate::planner::OutputMap;
use crate::resolver::{Resolution, StackContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
    pub logical_id: String,
    pub kind: ResourceKind,
    pub category: ResourceCategory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentSummary {
    pub stack: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub environment: String,
    pub pass_id: Uuid,
    pub network_range: String,
    pub engine: String,
    pub data_port: Option<u16>,
    pub resources: Vec<ResourceSummary>,
    pub outputs: OutputMap,
    /// Whether output values are concrete or still deferred
    pub provisioned: bool,
    pub generated_at: DateTime<Utc>,
}

impl DeploymentSummary {
    /// Summarize a resolution with the given outputs
    pub fn new(
        context: &StackContext,
        resolution: &Resolution,
        outputs: OutputMap,
        provisioned: bool,
    ) -> Self {
        let resources = resolution
            .graph
            .resources()
            .iter()
            .map(|resource| ResourceSummary {
                logical_id: resource.logical_id.clone(),
                kind: resource.kind(),
                category: resource.kind().category(),
                depends_on: resource.depends_on.clone(),
            })
            .collect();

        Self {
            stack: context.stack_name.clone(),
            region: resolution.plan.region().to_string(),
            account: context.account.clone(),
            environment: resolution.environment.clone(),
            pass_id: resolution.pass_id,
            network_range: resolution.plan.range().to_string(),
            engine: resolution.engine.to_string(),
            data_port: resolution.boundaries.data_port(),
            resources,
            outputs,
            provisioned,
            generated_at: Utc::now(),
        }
    }

    /// Summary carrying the resolution's deferred outputs
    pub fn planned(context: &StackContext, resolution: &Resolution) -> Self {
        Self::new(context, resolution, resolution.outputs.clone(), false)
    }
}
