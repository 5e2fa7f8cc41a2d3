//! CLI entrypoint for screening-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use commands::{Cli, Command};
use screening_application::{
    AnalyticsOptions, AnalyticsService, HookContextFactory, HookOrchestrator,
    ReviewWorkflowUseCase,
};
use screening_domain::{AssignmentRequest, AssignmentStatus, ConfigIssue, ReviewerRole};
use screening_infrastructure::{
    CompositeHookOrchestrator, ConfigLoader, FileConfig, InMemoryReviewStore,
    JsonlHookOrchestrator, RecordingHookOrchestrator, TracingHookOrchestrator,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&cli, &config)?;

    info!("Starting screening-quorum");

    match cli.command {
        Some(Command::Demo { disagree }) => run_demo(&config, disagree).await,
        Some(Command::CheckConfig) => check_config(&config),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Initialize tracing from the verbosity flag, falling back to `logging.level`.
///
/// With `logging.log_dir` set, output goes to a daily rolling file instead
/// of stderr.
fn init_logging(cli: &Cli, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new(config.logging.parse_level().0),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &config.logging.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "screening-quorum.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Tracing + recording hooks, plus the JSONL audit trail when configured
fn build_hooks(
    config: &FileConfig,
    recording: Arc<RecordingHookOrchestrator>,
) -> Arc<dyn HookOrchestrator> {
    let mut composite = CompositeHookOrchestrator::new(vec![
        Arc::new(TracingHookOrchestrator::new()),
        recording,
    ]);

    if let Some(path) = &config.logging.audit_log {
        match JsonlHookOrchestrator::new(path) {
            Some(audit) => {
                info!("Writing audit log to {}", audit.path().display());
                composite = composite.with(Arc::new(audit));
            }
            None => warn!("Audit log disabled: could not open {}", path.display()),
        }
    }

    Arc::new(composite)
}

/// One generated reviewer per required seat, named `<role>-<n>`
fn generate_reviewers(requirement: impl Iterator<Item = (ReviewerRole, usize)>) -> Vec<AssignmentRequest> {
    requirement
        .flat_map(|(role, count)| {
            (1..=count).map(move |n| AssignmentRequest::new(format!("{}-{}", role.as_str(), n), role))
        })
        .collect()
}

async fn run_demo(config: &FileConfig, disagree: bool) -> Result<()> {
    let issues = config.validate();
    if issues.iter().any(ConfigIssue::is_error) {
        print_issues(&issues);
        bail!("Configuration has errors; run `screening-quorum check-config` for details");
    }

    let project = config.project_or_sample().to_project(Utc::now())?;
    let project_id = project.id().clone();
    let definition = project
        .definitions()
        .first()
        .ok_or_else(|| anyhow!("Project '{}' defines no stages", project_id))?
        .clone();

    // === Dependency Injection ===
    let store = Arc::new(InMemoryReviewStore::new());
    store.insert_project(project).await;

    let recording = Arc::new(RecordingHookOrchestrator::new());
    let hooks = build_hooks(config, recording.clone());

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; cancelling workflow");
                token.cancel();
            }
        });
    }

    let workflow = ReviewWorkflowUseCase::new(
        store.clone(),
        hooks,
        HookContextFactory::new(config.workflow.actor.clone()),
    )
    .with_config(config.workflow.to_workflow_config())
    .with_cancellation(cancellation);

    let requests = generate_reviewers(definition.requirement().iter());
    let stage = workflow
        .create_stage(&project_id, definition.id(), &requests)
        .await?;

    println!(
        "Project {} / stage {} ({}, {})",
        project_id,
        stage.id(),
        definition.name(),
        definition.consensus().description()
    );

    let last = stage.assignments().len().saturating_sub(1);
    for (index, assignment) in stage.assignments().iter().enumerate() {
        let status = if disagree && index == last {
            AssignmentStatus::Excluded
        } else {
            AssignmentStatus::Included
        };

        let output = workflow
            .submit_decision(assignment.id(), status, None)
            .await?;
        println!("  {} -> {}", assignment.reviewer_id(), status);

        if let Some(transition) = output.transition {
            println!("  stage {}: {}", output.stage.id(), transition);
        }
        if let Some(follow_up) = output.escalation_stage {
            println!(
                "  escalated to {} ({}) with {} reviewer(s)",
                follow_up.id(),
                follow_up.definition().name(),
                follow_up.assignments().len()
            );
        }
    }

    let history = workflow.load_history(&project_id).await?;
    let snapshot = AnalyticsService::new().create_snapshot(
        &history.project,
        &history.stages,
        &AnalyticsOptions::default(),
    );

    println!();
    println!("{} notification(s) published", recording.contexts().await.len());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    if issues.is_empty() {
        println!("Configuration OK");
        return Ok(());
    }

    print_issues(&issues);
    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        bail!("{} configuration error(s)", errors);
    }
    Ok(())
}

fn print_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        let label = if issue.is_error() { "error" } else { "warning" };
        println!("{}: {}", label, issue.message);
    }
}
