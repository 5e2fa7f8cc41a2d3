//! Hook orchestrator that logs notifications through `tracing`.

use async_trait::async_trait;
use screening_application::{HookContext, HookError, HookOrchestrator};
use screening_domain::{ProjectId, WorkflowNotification};
use tracing::{debug, info};

/// Logs every workflow notification.
///
/// Stage transitions are logged at `info`, assignment and decision updates
/// at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHookOrchestrator;

impl TracingHookOrchestrator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HookOrchestrator for TracingHookOrchestrator {
    async fn process(&self, scope_id: &ProjectId, context: &HookContext) -> Result<(), HookError> {
        match &context.notification {
            WorkflowNotification::AssignmentUpdated {
                stage_id,
                assignment,
            } => debug!(
                "[{}] {} assignment {} ({} {}) is {}",
                scope_id,
                stage_id,
                assignment.id(),
                assignment.role(),
                assignment.reviewer_id(),
                assignment.status()
            ),
            WorkflowNotification::DecisionRecorded { stage_id, decision } => debug!(
                "[{}] {} {} recorded {} (by {})",
                scope_id,
                stage_id,
                decision.reviewer_id,
                decision.decision.as_status(),
                context.actor
            ),
            WorkflowNotification::StageTransition {
                stage_id,
                previous,
                current,
            } => info!(
                "[{}] stage {} moved {} -> {} (by {})",
                scope_id, stage_id, previous, current, context.actor
            ),
        }
        Ok(())
    }
}
