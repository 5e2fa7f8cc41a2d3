//! Reviewer decisions
//!
//! The verdict a reviewer records for one screening assignment.

use super::assignment::AssignmentStatus;
use crate::core::ids::{AssignmentId, ReviewerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusion/exclusion verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningDecision {
    Included,
    Excluded,
}

impl ScreeningDecision {
    /// Assignment status reached once this decision is recorded
    pub fn as_status(&self) -> AssignmentStatus {
        match self {
            ScreeningDecision::Included => AssignmentStatus::Included,
            ScreeningDecision::Excluded => AssignmentStatus::Excluded,
        }
    }

    pub fn is_included(&self) -> bool {
        matches!(self, ScreeningDecision::Included)
    }
}

impl TryFrom<AssignmentStatus> for ScreeningDecision {
    type Error = AssignmentStatus;

    /// Only `Included` and `Excluded` are decisions; any other status is
    /// handed back unchanged as the error.
    fn try_from(status: AssignmentStatus) -> Result<Self, Self::Error> {
        match status {
            AssignmentStatus::Included => Ok(ScreeningDecision::Included),
            AssignmentStatus::Excluded => Ok(ScreeningDecision::Excluded),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for ScreeningDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreeningDecision::Included => write!(f, "included"),
            ScreeningDecision::Excluded => write!(f, "excluded"),
        }
    }
}

/// A decision recorded against an assignment (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerDecision {
    pub assignment_id: AssignmentId,
    pub reviewer_id: ReviewerId,
    pub decision: ScreeningDecision,
    pub decided_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl ReviewerDecision {
    pub fn new(
        assignment_id: AssignmentId,
        reviewer_id: ReviewerId,
        decision: ScreeningDecision,
        decided_at: DateTime<Utc>,
    ) -> Self {
        Self {
            assignment_id,
            reviewer_id,
            decision,
            decided_at,
            notes: None,
        }
    }

    /// Attach reviewer notes; blank notes are dropped
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_status() {
        assert_eq!(
            ScreeningDecision::try_from(AssignmentStatus::Included),
            Ok(ScreeningDecision::Included)
        );
        assert_eq!(
            ScreeningDecision::try_from(AssignmentStatus::Excluded),
            Ok(ScreeningDecision::Excluded)
        );
        for status in [
            AssignmentStatus::Pending,
            AssignmentStatus::InProgress,
            AssignmentStatus::Escalated,
        ] {
            assert_eq!(ScreeningDecision::try_from(status), Err(status));
        }
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let decision = ReviewerDecision::new(
            AssignmentId::new("a1"),
            ReviewerId::new("alice"),
            ScreeningDecision::Included,
            Utc::now(),
        )
        .with_notes(Some("   ".to_string()));
        assert!(decision.notes.is_none());

        let decision = decision.with_notes(Some("population mismatch".to_string()));
        assert_eq!(decision.notes.as_deref(), Some("population mismatch"));
    }
}
