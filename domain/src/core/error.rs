//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised by the validating constructors of the review aggregates. A value
/// that was built successfully always satisfies its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Review project must declare at least one stage definition")]
    NoStageDefinitions,

    #[error("Duplicate stage definition id: {0}")]
    DuplicateDefinition(String),

    #[error("Reviewer requirement must request at least one reviewer per listed role")]
    EmptyRequirement,

    #[error("Invalid consensus policy: {0}")]
    InvalidConsensusPolicy(String),

    #[error("Assignments do not match the reviewer requirement: {0}")]
    RoleCountMismatch(String),

    #[error("Assignment {assignment} does not belong to stage {stage}")]
    ForeignAssignment { assignment: String, stage: String },
}

impl DomainError {
    /// Check if this error was caused by a reviewer quota mismatch
    pub fn is_quota_mismatch(&self) -> bool {
        matches!(self, DomainError::RoleCountMismatch(_))
    }
}
