//! Screening assignments and reviewer decisions
//!
//! - [`ScreeningAssignment`]: one reviewer's task within a stage
//! - [`AssignmentStatus`]: Pending → InProgress → Included/Excluded (or Escalated)
//! - [`ReviewerDecision`]: the verdict recorded for an assignment

pub mod assignment;
pub mod decision;

pub use assignment::{AssignmentRequest, AssignmentStatus, ScreeningAssignment};
pub use decision::{ReviewerDecision, ScreeningDecision};
