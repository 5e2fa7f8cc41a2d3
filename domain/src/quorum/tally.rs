//! Decision tally over a stage's assignments

use crate::screening::{AssignmentStatus, ScreeningAssignment, ScreeningDecision};
use serde::{Deserialize, Serialize};

/// Counts of terminal decisions among a set of assignments
///
/// # Example
///
/// ```
/// use screening_domain::quorum::DecisionTally;
///
/// let tally = DecisionTally::new(2, 0, 1);
/// assert_eq!(tally.terminal(), 2);
/// assert!(tally.is_unanimous());
/// assert_eq!(tally.vote_summary(), "[●●·]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionTally {
    pub included: usize,
    pub excluded: usize,
    /// Assignments without a verdict yet
    pub undecided: usize,
}

impl DecisionTally {
    pub fn new(included: usize, excluded: usize, undecided: usize) -> Self {
        Self {
            included,
            excluded,
            undecided,
        }
    }

    /// Tally the statuses of the given assignments
    pub fn from_assignments<'a>(
        assignments: impl IntoIterator<Item = &'a ScreeningAssignment>,
    ) -> Self {
        assignments
            .into_iter()
            .fold(Self::default(), |mut tally, assignment| {
                match assignment.status() {
                    AssignmentStatus::Included => tally.included += 1,
                    AssignmentStatus::Excluded => tally.excluded += 1,
                    _ => tally.undecided += 1,
                }
                tally
            })
    }

    /// Number of assignments with a verdict
    pub fn terminal(&self) -> usize {
        self.included + self.excluded
    }

    pub fn total(&self) -> usize {
        self.terminal() + self.undecided
    }

    /// All terminal assignments share the same verdict
    ///
    /// An empty tally is not unanimous.
    pub fn is_unanimous(&self) -> bool {
        self.terminal() > 0 && (self.included == 0 || self.excluded == 0)
    }

    /// The shared verdict when unanimous
    pub fn unanimous_decision(&self) -> Option<ScreeningDecision> {
        if !self.is_unanimous() {
            None
        } else if self.excluded == 0 {
            Some(ScreeningDecision::Included)
        } else {
            Some(ScreeningDecision::Excluded)
        }
    }

    /// No assignment is waiting for a verdict
    ///
    /// Vacuously true for an empty tally.
    pub fn all_terminal(&self) -> bool {
        self.undecided == 0
    }

    /// Visual summary: ● included, ○ excluded, · undecided
    pub fn vote_summary(&self) -> String {
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', self.included));
        summary.extend(std::iter::repeat_n('○', self.excluded));
        summary.extend(std::iter::repeat_n('·', self.undecided));
        summary.push(']');
        summary
    }
}
