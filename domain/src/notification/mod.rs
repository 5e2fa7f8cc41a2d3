//! Workflow notifications
//!
//! The workflow publishes exactly three kinds of notification after each
//! persisted mutation. They form a closed set: hook orchestrators match on
//! the variant instead of downcasting an open payload type.

use crate::core::ids::StageId;
use crate::quorum::ConflictState;
use crate::screening::{ReviewerDecision, ScreeningAssignment};
use crate::stage::StageTransition;
use serde::{Deserialize, Serialize};

/// Notification emitted by the review workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowNotification {
    /// An assignment was created or changed
    AssignmentUpdated {
        stage_id: StageId,
        assignment: ScreeningAssignment,
    },
    /// A reviewer decision was recorded
    DecisionRecorded {
        stage_id: StageId,
        decision: ReviewerDecision,
    },
    /// A stage's conflict state changed
    StageTransition {
        stage_id: StageId,
        previous: ConflictState,
        current: ConflictState,
    },
}

impl WorkflowNotification {
    pub fn assignment_updated(assignment: &ScreeningAssignment) -> Self {
        WorkflowNotification::AssignmentUpdated {
            stage_id: assignment.stage_id().clone(),
            assignment: assignment.clone(),
        }
    }

    pub fn decision_recorded(stage_id: &StageId, decision: &ReviewerDecision) -> Self {
        WorkflowNotification::DecisionRecorded {
            stage_id: stage_id.clone(),
            decision: decision.clone(),
        }
    }

    pub fn stage_transition(stage_id: &StageId, transition: StageTransition) -> Self {
        WorkflowNotification::StageTransition {
            stage_id: stage_id.clone(),
            previous: transition.previous,
            current: transition.current,
        }
    }

    /// Stable snake_case name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowNotification::AssignmentUpdated { .. } => "assignment_updated",
            WorkflowNotification::DecisionRecorded { .. } => "decision_recorded",
            WorkflowNotification::StageTransition { .. } => "stage_transition",
        }
    }

    pub fn stage_id(&self) -> &StageId {
        match self {
            WorkflowNotification::AssignmentUpdated { stage_id, .. }
            | WorkflowNotification::DecisionRecorded { stage_id, .. }
            | WorkflowNotification::StageTransition { stage_id, .. } => stage_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_notification() {
        let notification = WorkflowNotification::stage_transition(
            &StageId::new("s1"),
            StageTransition {
                previous: ConflictState::None,
                current: ConflictState::Escalated,
            },
        );
        assert_eq!(notification.kind(), "stage_transition");
        assert_eq!(notification.stage_id().as_str(), "s1");

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["kind"], "stage_transition");
        assert_eq!(json["previous"], "none");
        assert_eq!(json["current"], "escalated");
    }
}
