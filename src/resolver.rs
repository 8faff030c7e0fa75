// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resolution Pipeline
//!
//! Runs every stage for one environment and tags any failure with the
//! environment's name. A pass either yields a complete [`Resolution`] or an
//! error; nothing partial escapes.
//!
//! Passes share no state, so callers may run them for several
//! environments in parallel. [`resolve_all`] runs them in sequence under a
//! [`FailurePolicy`].

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ConfigDocument;
use crate::domain::{invariants, ConfigurationRecord};
use crate::errors::{EnvironmentError, ResolutionError, TopologyResult};
use crate::planner::{
    assemble, build_boundaries, plan_network, publish, select_engine, BoundarySet,
    DeferredIdentifiers, EngineDescriptor, ExportNaming, IdentifierSource, NetworkPlan,
    OutputMap,
};
use crate::topology::TopologyGraph;

/// Where a stack is deployed and how its exports are named
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackContext {
    pub stack_name: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Attach export names to published outputs
    pub export_outputs: bool,
}

impl StackContext {
    pub const DEFAULT_STACK: &'static str = "genai";
    pub const DEFAULT_REGION: &'static str = "ca-central-1";

    pub fn new(stack_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            region: region.into(),
            account: None,
            export_outputs: true,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn without_exports(mut self) -> Self {
        self.export_outputs = false;
        self
    }

    fn export_naming(&self) -> TopologyResult<Option<ExportNaming>> {
        if self.export_outputs {
            ExportNaming::new(self.stack_name.clone()).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl Default for StackContext {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STACK, Self::DEFAULT_REGION)
    }
}

/// Product of one successful resolution pass
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub pass_id: Uuid,
    pub environment: String,
    pub plan: NetworkPlan,
    pub boundaries: BoundarySet,
    pub engine: EngineDescriptor,
    pub graph: TopologyGraph,
    /// Outputs with deferred placeholder values
    pub outputs: OutputMap,
    #[serde(skip)]
    exports: Option<ExportNaming>,
}

impl Resolution {
    /// Publish the outputs again from a concrete identifier source
    pub fn republish(&self, source: &dyn IdentifierSource) -> TopologyResult<OutputMap> {
        publish(&self.graph, source, self.exports.as_ref())
    }
}

fn run_stages(
    context: &StackContext,
    environment: &str,
    record: &ConfigurationRecord,
) -> TopologyResult<Resolution> {
    invariants::validate_scope_name("environment", environment)?;
    record.validate()?;

    let plan = plan_network(&record.network_range, &context.region)?;
    let mut boundaries = build_boundaries(&plan, None);
    let engine = select_engine(&record.database_engine)?;
    boundaries.reconcile(&engine);

    let graph = assemble(environment, record, &plan, &boundaries, &engine)?;
    let exports = context.export_naming()?;
    let outputs = publish(&graph, &DeferredIdentifiers, exports.as_ref())?;

    Ok(Resolution {
        pass_id: Uuid::now_v7(),
        environment: environment.to_string(),
        plan,
        boundaries,
        engine,
        graph,
        outputs,
        exports,
    })
}

/// Resolve one environment's configuration into a topology
pub fn resolve(
    context: &StackContext,
    environment: &str,
    record: &ConfigurationRecord,
) -> Result<Resolution, ResolutionError> {
    match run_stages(context, environment, record) {
        Ok(resolution) => {
            info!(
                "Resolved environment {} ({} resources, engine {}, pass {})",
                environment,
                resolution.graph.len(),
                resolution.engine,
                resolution.pass_id
            );
            Ok(resolution)
        }
        Err(kind) => {
            warn!("Resolution failed for environment {}: {}", environment, kind);
            Err(ResolutionError::new(environment, kind))
        }
    }
}

/// What to do with the remaining environments after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing environment
    FailFast,
    /// Resolve every environment and report all failures
    #[default]
    CollectAll,
}

/// Outcome of resolving several environments
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub resolved: Vec<Resolution>,
    pub failed: Vec<EnvironmentError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Record one environment's result; `true` when the batch must stop
    fn record(&mut self, result: Result<Resolution, EnvironmentError>, policy: FailurePolicy) -> bool {
        match result {
            Ok(resolution) => {
                self.resolved.push(resolution);
                false
            }
            Err(err) => {
                self.failed.push(err);
                policy == FailurePolicy::FailFast
            }
        }
    }
}

/// Resolve several environments in order
pub fn resolve_all<'a, I>(context: &StackContext, environments: I, policy: FailurePolicy) -> BatchOutcome
where
    I: IntoIterator<Item = (&'a str, &'a ConfigurationRecord)>,
{
    let mut outcome = BatchOutcome::default();
    for (environment, record) in environments {
        let result = resolve(context, environment, record).map_err(EnvironmentError::from);
        if outcome.record(result, policy) {
            break;
        }
    }
    outcome
}

/// Load and resolve the named environments of a configuration document
///
/// An entry that cannot be turned into a record counts as that
/// environment's failure, under the same policy as a failed pass.
pub fn resolve_document<'a, I>(
    context: &StackContext,
    document: &ConfigDocument,
    environments: I,
    policy: FailurePolicy,
) -> BatchOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let mut outcome = BatchOutcome::default();
    for environment in environments {
        let result = match document.record(environment) {
            Ok(record) => resolve(context, environment, &record).map_err(EnvironmentError::from),
            Err(source) => {
                warn!("Configuration for environment {} rejected: {}", environment, source);
                Err(EnvironmentError::config(environment, source))
            }
        };
        if outcome.record(result, policy) {
            break;
        }
    }
    outcome
}
