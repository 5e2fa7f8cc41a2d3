//! Review workflow use case
//!
//! Orchestrates stage creation and decision submission against the
//! [`ReviewStore`], drives conflict-state transitions and publishes a
//! notification through the [`HookOrchestrator`] after every persisted
//! mutation.
//!
//! Every call reads, computes, then writes. Validation failures are raised
//! before anything is written; store and hook failures propagate unchanged
//! and are never retried here.
//!
//! # Module Structure
//!
//! - `create_stage`: quota validation and stage creation
//! - `submit_decision`: decision recording and quorum detection
//! - `escalation`: follow-up stage creation for escalated disagreement

mod create_stage;
mod escalation;
mod submit_decision;

#[cfg(test)]
mod test_support;

pub use escalation::{reuse_reviewers, select_escalation_target};
pub use submit_decision::SubmitDecisionOutput;

use crate::config::WorkflowConfig;
use crate::ports::hook_orchestrator::{HookContext, HookContextFactory, HookError, HookOrchestrator};
use crate::ports::review_store::{ReviewStore, StoreError};
use crate::use_cases::shared::check_cancelled;
use screening_domain::{
    AssignmentStatus, DomainError, ProjectId, ReviewProject, ReviewStage,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Errors that can occur during workflow operations
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid decision '{0}': expected included or excluded")]
    InvalidDecision(AssignmentStatus),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl WorkflowError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        WorkflowError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WorkflowError::Cancelled)
    }

    /// Check if this error was raised by input validation (nothing was written)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WorkflowError::ConfigurationMismatch(_)
                | WorkflowError::NotFound { .. }
                | WorkflowError::InvalidDecision(_)
        )
    }
}

/// A project together with its stages, each hydrated with its current
/// assignments
#[derive(Debug, Clone)]
pub struct ProjectHistory {
    pub project: ReviewProject,
    pub stages: Vec<ReviewStage>,
}

/// Use case driving the multi-reviewer screening workflow
pub struct ReviewWorkflowUseCase {
    store: Arc<dyn ReviewStore>,
    hooks: Arc<dyn HookOrchestrator>,
    contexts: HookContextFactory,
    config: WorkflowConfig,
    cancellation_token: Option<CancellationToken>,
}

impl ReviewWorkflowUseCase {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        hooks: Arc<dyn HookOrchestrator>,
        contexts: HookContextFactory,
    ) -> Self {
        Self {
            store,
            hooks,
            contexts,
            config: WorkflowConfig::default(),
            cancellation_token: None,
        }
    }

    /// Override the workflow behavior configuration
    pub fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a cancellation token checked before every store and hook call
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Load a project with all of its stages and their current assignments
    pub async fn load_history(&self, project_id: &ProjectId) -> Result<ProjectHistory, WorkflowError> {
        let project = self.load_project(project_id).await?;

        check_cancelled(&self.cancellation_token)?;
        let stored = self.store.get_stages_by_project(project_id).await?;

        let mut stages = Vec::with_capacity(stored.len());
        for stage in stored {
            check_cancelled(&self.cancellation_token)?;
            let assignments = self.store.get_assignments_by_stage(stage.id()).await?;
            stages.push(stage.with_assignments(assignments)?);
        }

        debug!(
            "Loaded {} stage(s) for project {}",
            stages.len(),
            project_id
        );
        Ok(ProjectHistory { project, stages })
    }

    async fn load_project(&self, project_id: &ProjectId) -> Result<ReviewProject, WorkflowError> {
        check_cancelled(&self.cancellation_token)?;
        self.store
            .get_project(project_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("project", project_id))
    }

    /// Hand a notification to the hook orchestrator, scoped to a project
    async fn publish(&self, scope_id: &ProjectId, context: HookContext) -> Result<(), WorkflowError> {
        check_cancelled(&self.cancellation_token)?;
        debug!("Publishing {} for project {}", context.kind(), scope_id);
        self.hooks.process(scope_id, &context).await?;
        Ok(())
    }
}
