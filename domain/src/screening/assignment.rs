//! Screening assignments
//!
//! One reviewer's task within a review stage. Assignments are immutable
//! values: recording a decision produces an updated copy.

use super::decision::ReviewerDecision;
use crate::catalog::ReviewerRole;
use crate::core::ids::{AssignmentId, ReviewerId, StageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a screening assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Included,
    Excluded,
    Escalated,
}

impl AssignmentStatus {
    /// Included or Excluded: the reviewer has reached a verdict
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Included | AssignmentStatus::Excluded)
    }

    /// Still occupying the reviewer
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AssignmentStatus::Pending | AssignmentStatus::InProgress | AssignmentStatus::Escalated
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Included => "included",
            AssignmentStatus::Excluded => "excluded",
            AssignmentStatus::Escalated => "escalated",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request to assign a reviewer in a given role when creating a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub reviewer_id: ReviewerId,
    pub role: ReviewerRole,
}

impl AssignmentRequest {
    pub fn new(reviewer_id: impl Into<ReviewerId>, role: ReviewerRole) -> Self {
        Self {
            reviewer_id: reviewer_id.into(),
            role,
        }
    }
}

/// One reviewer's task within a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningAssignment {
    id: AssignmentId,
    stage_id: StageId,
    reviewer_id: ReviewerId,
    role: ReviewerRole,
    status: AssignmentStatus,
    assigned_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    decision: Option<ReviewerDecision>,
}

impl ScreeningAssignment {
    /// Create a fresh pending assignment with a generated id
    pub fn pending(
        stage_id: StageId,
        request: &AssignmentRequest,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AssignmentId::generate(),
            stage_id,
            reviewer_id: request.reviewer_id.clone(),
            role: request.role,
            status: AssignmentStatus::Pending,
            assigned_at,
            completed_at: None,
            decision: None,
        }
    }

    /// Produce the updated assignment after a decision was recorded
    pub fn with_decision(&self, decision: ReviewerDecision) -> Self {
        Self {
            status: decision.decision.as_status(),
            completed_at: Some(decision.decided_at),
            decision: Some(decision),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &AssignmentId {
        &self.id
    }

    pub fn stage_id(&self) -> &StageId {
        &self.stage_id
    }

    pub fn reviewer_id(&self) -> &ReviewerId {
        &self.reviewer_id
    }

    pub fn role(&self) -> ReviewerRole {
        self.role
    }

    pub fn status(&self) -> AssignmentStatus {
        self.status
    }

    pub fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn decision(&self) -> Option<&ReviewerDecision> {
        self.decision.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Hours between assignment and completion, if completed
    pub fn decision_latency_hours(&self) -> Option<f64> {
        self.completed_at
            .map(|done| (done - self.assigned_at).num_seconds() as f64 / 3600.0)
    }
}
