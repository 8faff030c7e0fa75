// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Planner
//!
//! Resolves environment configurations into topology summaries and prints
//! them to stdout as JSON.
//!
//! Run with: cargo run --bin topology-plan
//!
//! Environment:
//! - `TOPOLOGY_CONFIG` - configuration document (default: config.json)
//! - `DEPLOY_ENV` - environment to resolve (default: dev)
//! - `TOPOLOGY_ALL` - resolve every environment in the document in parallel
//! - `TOPOLOGY_FAIL_FAST` - stop reporting after the first failed environment
//! - `TOPOLOGY_DRY_RUN` - hand each topology to the dry-run actuator
//! - `TOPOLOGY_STACK`, `TOPOLOGY_REGION`, `TOPOLOGY_ACCOUNT` - stack context

use anyhow::{bail, Context, Result};
use stack_topology::{
    config::selected_environment, observability::init_tracing, provision_topology, resolve,
    ConfigDocument, ConfigurationRecord, DeploymentSummary, DryRunActuator, EnvironmentError,
    FailurePolicy, ResolutionError, StackContext,
};
use std::path::PathBuf;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Configuration for the planner
#[derive(Debug, Clone)]
struct PlannerConfig {
    config_path: PathBuf,
    environment: String,
    all_environments: bool,
    policy: FailurePolicy,
    dry_run: bool,
    context: StackContext,
}

fn flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl PlannerConfig {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let config_path = std::env::var("TOPOLOGY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"));

        let stack = std::env::var("TOPOLOGY_STACK")
            .unwrap_or_else(|_| StackContext::DEFAULT_STACK.to_string());
        let region = std::env::var("TOPOLOGY_REGION")
            .unwrap_or_else(|_| StackContext::DEFAULT_REGION.to_string());
        let mut context = StackContext::new(stack, region);
        if let Ok(account) = std::env::var("TOPOLOGY_ACCOUNT") {
            context = context.with_account(account);
        }

        let policy = if flag("TOPOLOGY_FAIL_FAST") {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::CollectAll
        };

        Self {
            config_path,
            environment: selected_environment(),
            all_environments: flag("TOPOLOGY_ALL"),
            policy,
            dry_run: flag("TOPOLOGY_DRY_RUN"),
            context,
        }
    }
}

type EnvironmentReport = std::result::Result<DeploymentSummary, EnvironmentError>;

/// Resolve one environment and, optionally, dry-run provision it
async fn plan_environment(
    context: StackContext,
    environment: String,
    record: ConfigurationRecord,
    dry_run: bool,
) -> Result<EnvironmentReport> {
    let pass_context = context.clone();
    let pass_environment = environment.clone();
    let resolution = tokio::task::spawn_blocking(move || {
        resolve(&pass_context, &pass_environment, &record)
    })
    .await
    .context("Resolution task panicked")?;

    let resolution = match resolution {
        Ok(resolution) => resolution,
        Err(err) => return Ok(Err(err.into())),
    };

    if !dry_run {
        return Ok(Ok(DeploymentSummary::planned(&context, &resolution)));
    }

    let mut actuator = DryRunActuator::new(&context.stack_name, &environment, &context.region);
    let identifiers = provision_topology(&mut actuator, &resolution.graph)
        .await
        .with_context(|| format!("Dry-run provisioning failed for {}", environment))?;
    let outputs = resolution
        .republish(&identifiers)
        .map_err(|kind| EnvironmentError::from(ResolutionError::new(environment.as_str(), kind)));

    Ok(outputs.map(|outputs| DeploymentSummary::new(&context, &resolution, outputs, true)))
}

/// Plan every named environment, one task per environment
///
/// Reports come back in the order the environments were named. An entry
/// that cannot be read becomes that environment's failed report.
async fn plan_environments(
    config: &PlannerConfig,
    document: &ConfigDocument,
    environments: &[String],
) -> Result<Vec<EnvironmentReport>> {
    let mut reports: Vec<Option<EnvironmentReport>> =
        std::iter::repeat_with(|| None).take(environments.len()).collect();

    let mut tasks = JoinSet::new();
    for (index, environment) in environments.iter().enumerate() {
        let record = match document.record(environment) {
            Ok(record) => record,
            Err(source) => {
                reports[index] = Some(Err(EnvironmentError::config(environment.as_str(), source)));
                continue;
            }
        };
        let context = config.context.clone();
        let environment = environment.clone();
        let dry_run = config.dry_run;
        tasks.spawn(async move {
            (index, plan_environment(context, environment, record, dry_run).await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, report) = joined.context("Planner task failed")?;
        reports[index] = Some(report?);
    }

    Ok(reports.into_iter().flatten().collect())
}

/// Split reports into summaries and failures under the failure policy
fn collect_reports(
    reports: Vec<EnvironmentReport>,
    policy: FailurePolicy,
) -> (Vec<DeploymentSummary>, Vec<EnvironmentError>) {
    let mut summaries = Vec::new();
    let mut failures = Vec::new();
    for report in reports {
        match report {
            Ok(summary) => summaries.push(summary),
            Err(err) => {
                error!("❌ {}", err);
                failures.push(err);
                if policy == FailurePolicy::FailFast {
                    break;
                }
            }
        }
    }
    (summaries, failures)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(tracing::Level::INFO);

    let config = PlannerConfig::from_env();
    info!("📋 Configuration document: {}", config.config_path.display());

    let document = ConfigDocument::from_path(&config.config_path)
        .with_context(|| format!("Failed to load {}", config.config_path.display()))?;

    let environments: Vec<String> = if config.all_environments {
        document.environment_names().map(str::to_string).collect()
    } else {
        vec![config.environment.clone()]
    };
    info!("🔧 Resolving environments: {}", environments.join(", "));

    let reports = plan_environments(&config, &document, &environments).await?;
    let (summaries, failures) = collect_reports(reports, config.policy);

    println!(
        "{}",
        serde_json::to_string_pretty(&summaries).context("Failed to serialize summaries")?
    );

    if !failures.is_empty() {
        bail!("{} environment(s) failed", failures.len());
    }

    info!("✅ Resolved {} environment(s)", summaries.len());
    Ok(())
}
