//! Decision recording and quorum detection.

use super::{ReviewWorkflowUseCase, WorkflowError};
use crate::use_cases::shared::check_cancelled;
use chrono::Utc;
use screening_domain::{
    AssignmentId, AssignmentStatus, ConflictState, ReviewStage, ReviewerDecision,
    ScreeningAssignment, ScreeningDecision, StageTransition,
};
use tracing::{debug, info};

/// Result of a successful decision submission
#[derive(Debug, Clone)]
pub struct SubmitDecisionOutput {
    /// The assignment with the decision applied
    pub assignment: ScreeningAssignment,
    /// The stage after quorum evaluation, hydrated with its assignments
    pub stage: ReviewStage,
    /// Set when this decision moved the stage out of `ConflictState::None`
    pub transition: Option<StageTransition>,
    /// Follow-up stage opened for an escalated disagreement
    pub escalation_stage: Option<ReviewStage>,
}

impl ReviewWorkflowUseCase {
    /// Record a reviewer's verdict and re-evaluate the stage's quorum.
    ///
    /// Only [`AssignmentStatus::Included`] and [`AssignmentStatus::Excluded`]
    /// are accepted; anything else fails with
    /// [`WorkflowError::InvalidDecision`] before the store is touched.
    ///
    /// Once every required reviewer has a verdict the stage resolves
    /// (unanimous), escalates (split, policy escalates) or records a
    /// conflict. A stage that already left `ConflictState::None` is never
    /// re-evaluated.
    pub async fn submit_decision(
        &self,
        assignment_id: &AssignmentId,
        decision: AssignmentStatus,
        notes: Option<String>,
    ) -> Result<SubmitDecisionOutput, WorkflowError> {
        let verdict = ScreeningDecision::try_from(decision).map_err(WorkflowError::InvalidDecision)?;

        check_cancelled(&self.cancellation_token)?;
        let assignment = self
            .store
            .get_assignment(assignment_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("assignment", assignment_id))?;

        check_cancelled(&self.cancellation_token)?;
        let _lease = self.store.lock_stage(assignment.stage_id()).await?;

        check_cancelled(&self.cancellation_token)?;
        let stage = self
            .store
            .get_stage(assignment.stage_id())
            .await?
            .ok_or_else(|| WorkflowError::not_found("stage", assignment.stage_id()))?;

        let now = Utc::now();
        let recorded = ReviewerDecision::new(
            assignment.id().clone(),
            assignment.reviewer_id().clone(),
            verdict,
            now,
        )
        .with_notes(notes);
        let updated = assignment.with_decision(recorded.clone());

        check_cancelled(&self.cancellation_token)?;
        self.store.save_assignment(stage.project_id(), &updated).await?;
        debug!(
            "Recorded {} from {} on stage {}",
            verdict.as_status(),
            updated.reviewer_id(),
            stage.id()
        );

        let context = self.contexts.assignment_updated(&updated, now);
        self.publish(stage.project_id(), context).await?;
        let context = self.contexts.decision_recorded(stage.id(), &recorded, now);
        self.publish(stage.project_id(), context).await?;

        check_cancelled(&self.cancellation_token)?;
        let assignments = self.store.get_assignments_by_stage(stage.id()).await?;
        let hydrated = stage.with_assignments(assignments)?;

        let Some((transitioned, transition)) = hydrated.apply_quorum(now) else {
            debug!(
                "Stage {} unchanged ({}, {})",
                hydrated.id(),
                hydrated.conflict_state(),
                hydrated.tally().vote_summary()
            );
            return Ok(SubmitDecisionOutput {
                assignment: updated,
                stage: hydrated,
                transition: None,
                escalation_stage: None,
            });
        };

        check_cancelled(&self.cancellation_token)?;
        self.store.save_stage(&transitioned).await?;
        info!(
            "Stage {} {} [{}]",
            transitioned.id(),
            transition,
            transitioned.tally().vote_summary()
        );

        let context = self
            .contexts
            .stage_transition(transitioned.id(), transition, Utc::now());
        self.publish(transitioned.project_id(), context).await?;

        let escalation_stage = if transition.current == ConflictState::Escalated {
            if self.config.auto_escalate {
                self.escalate(&transitioned).await?
            } else {
                debug!("Auto-escalation disabled, leaving {} escalated", transitioned.id());
                None
            }
        } else {
            None
        };

        Ok(SubmitDecisionOutput {
            assignment: updated,
            stage: transitioned,
            transition: Some(transition),
            escalation_stage,
        })
    }
}
