//! Quorum evaluation for a review stage
//!
//! A stage's conflict state is evaluated only once the number of terminal
//! assignments reaches the reviewer requirement's total:
//!
//! | Terminal decisions         | Policy escalates | Result      |
//! |----------------------------|------------------|-------------|
//! | fewer than required        | any              | (pending)   |
//! | unanimous                  | any              | `Resolved`  |
//! | split                      | yes              | `Escalated` |
//! | split                      | no               | `Conflict`  |

use super::consensus::ConflictState;
use super::tally::DecisionTally;
use crate::catalog::ConsensusPolicy;
use crate::screening::{ScreeningAssignment, ScreeningDecision};

/// Result of evaluating a stage's assignments against its quorum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuorumEvaluation {
    /// Not enough terminal decisions yet
    Pending { terminal: usize, required: usize },
    /// Quorum reached
    Reached {
        state: ConflictState,
        tally: DecisionTally,
        /// Shared verdict when `state` is `Resolved`
        unanimous_decision: Option<ScreeningDecision>,
    },
}

impl QuorumEvaluation {
    /// The new conflict state, if quorum was reached
    pub fn state(&self) -> Option<ConflictState> {
        match self {
            QuorumEvaluation::Reached { state, .. } => Some(*state),
            QuorumEvaluation::Pending { .. } => None,
        }
    }
}

/// Evaluate the quorum rule over a stage's current assignments
///
/// # Example
///
/// ```
/// use screening_domain::catalog::ConsensusPolicy;
/// use screening_domain::quorum::{evaluate_quorum, QuorumEvaluation};
///
/// let result = evaluate_quorum(&[], 2, &ConsensusPolicy::Disabled);
/// assert_eq!(result, QuorumEvaluation::Pending { terminal: 0, required: 2 });
/// ```
pub fn evaluate_quorum(
    assignments: &[ScreeningAssignment],
    required: usize,
    policy: &ConsensusPolicy,
) -> QuorumEvaluation {
    let tally = DecisionTally::from_assignments(assignments);
    let terminal = tally.terminal();

    if terminal < required || terminal == 0 {
        return QuorumEvaluation::Pending { terminal, required };
    }

    let state = if tally.is_unanimous() {
        ConflictState::Resolved
    } else if policy.escalates_on_disagreement() {
        ConflictState::Escalated
    } else {
        ConflictState::Conflict
    };

    QuorumEvaluation::Reached {
        state,
        tally,
        unanimous_decision: tally.unanimous_decision(),
    }
}
