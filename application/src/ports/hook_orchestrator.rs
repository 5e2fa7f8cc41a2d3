//! Hook orchestration port
//!
//! Every persisted workflow mutation is followed by a notification that is
//! handed to a [`HookOrchestrator`]. The orchestrator is awaited in line: a
//! failing hook fails the workflow call that triggered it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use screening_domain::{
    ProjectId, ReviewerDecision, ScreeningAssignment, StageId, StageTransition,
    WorkflowNotification,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while processing hooks
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Hook rejected notification: {0}")]
    Rejected(String),

    #[error("Hook dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A notification together with who caused it and when
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookContext {
    /// User acting on the workflow
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
    pub notification: WorkflowNotification,
}

impl HookContext {
    /// Stable name of the wrapped notification
    pub fn kind(&self) -> &'static str {
        self.notification.kind()
    }
}

/// Builds hook contexts for the acting user
///
/// The actor is fixed when the factory is constructed; there is no ambient
/// "current user".
#[derive(Debug, Clone)]
pub struct HookContextFactory {
    actor: String,
}

impl HookContextFactory {
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn assignment_updated(
        &self,
        assignment: &ScreeningAssignment,
        now: DateTime<Utc>,
    ) -> HookContext {
        self.wrap(WorkflowNotification::assignment_updated(assignment), now)
    }

    pub fn decision_recorded(
        &self,
        stage_id: &StageId,
        decision: &ReviewerDecision,
        now: DateTime<Utc>,
    ) -> HookContext {
        self.wrap(WorkflowNotification::decision_recorded(stage_id, decision), now)
    }

    pub fn stage_transition(
        &self,
        stage_id: &StageId,
        transition: StageTransition,
        now: DateTime<Utc>,
    ) -> HookContext {
        self.wrap(WorkflowNotification::stage_transition(stage_id, transition), now)
    }

    fn wrap(&self, notification: WorkflowNotification, occurred_at: DateTime<Utc>) -> HookContext {
        HookContext {
            actor: self.actor.clone(),
            occurred_at,
            notification,
        }
    }
}

/// Dispatches workflow notifications to hooks
///
/// Implementations live in the infrastructure layer and may log, persist,
/// or forward notifications. `scope_id` is the project the notification
/// belongs to.
#[async_trait]
pub trait HookOrchestrator: Send + Sync {
    async fn process(&self, scope_id: &ProjectId, context: &HookContext) -> Result<(), HookError>;
}

/// No-op orchestrator for when no hooks are configured
pub struct NoHooks;

#[async_trait]
impl HookOrchestrator for NoHooks {
    async fn process(&self, _scope_id: &ProjectId, _context: &HookContext) -> Result<(), HookError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screening_domain::ConflictState;

    #[test]
    fn test_factory_stamps_actor() {
        let factory = HookContextFactory::new("coordinator");
        let now = Utc::now();
        let context = factory.stage_transition(
            &StageId::new("s1"),
            StageTransition {
                previous: ConflictState::None,
                current: ConflictState::Resolved,
            },
            now,
        );

        assert_eq!(context.actor, "coordinator");
        assert_eq!(context.occurred_at, now);
        assert_eq!(context.kind(), "stage_transition");
    }
}
