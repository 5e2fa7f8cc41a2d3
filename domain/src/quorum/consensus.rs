//! Conflict state and consensus outcome of a review stage

use crate::core::ids::StageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate agreement status of a stage
///
/// ```text
/// None ──quorum──▶ Resolved | Conflict | Escalated
/// ```
///
/// All three outcomes are terminal: a stage is never re-evaluated once it
/// has left `None`. Conflicts and escalations continue in a new stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictState {
    /// Quorum not yet reached
    #[default]
    None,
    /// Reviewers disagreed; left open for manual resolution
    Conflict,
    /// Reviewers disagreed; a follow-up stage takes over
    Escalated,
    /// Reviewers agreed unanimously
    Resolved,
}

impl ConflictState {
    /// Whether the state has left `None`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConflictState::None)
    }

    /// Conflict or Escalated: disagreement that is not settled in this stage
    pub fn is_open_conflict(&self) -> bool {
        matches!(self, ConflictState::Conflict | ConflictState::Escalated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictState::None => "none",
            ConflictState::Conflict => "conflict",
            ConflictState::Escalated => "escalated",
            ConflictState::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ConflictState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recorded result of a stage that reached agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    pub stage_id: StageId,
    /// Whether the record was approved (included)
    pub approved: bool,
    pub resulting_state: ConflictState,
    pub resolved_at_utc: DateTime<Utc>,
}

impl ConsensusOutcome {
    pub fn new(
        stage_id: StageId,
        approved: bool,
        resulting_state: ConflictState,
        resolved_at_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            stage_id,
            approved,
            resulting_state,
            resolved_at_utc,
        }
    }
}
