//! Domain layer for screening-quorum
//!
//! This crate contains the core business logic, entities, and value objects
//! of the multi-reviewer screening workflow. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Stage catalog
//!
//! A [`ReviewProject`] owns an ordered list of [`StageDefinition`]s. Each
//! definition states how many reviewers of each role a stage needs and how
//! disagreement between them is handled ([`ConsensusPolicy`]).
//!
//! ## Review stages
//!
//! A [`ReviewStage`] instantiates a definition with concrete
//! [`ScreeningAssignment`]s. Reviewers record [`ReviewerDecision`]s; once a
//! quorum of verdicts exists the stage's [`ConflictState`] is decided:
//!
//! - **Resolved**: reviewers agreed unanimously
//! - **Escalated**: reviewers disagreed and the policy escalates
//! - **Conflict**: reviewers disagreed, left open for manual resolution

pub mod analytics;
pub mod catalog;
pub mod core;
pub mod notification;
pub mod quorum;
pub mod screening;
pub mod stage;

// Re-export commonly used types
pub use analytics::{
    AnalyticsSnapshot, ConflictRates, PrismaFlow, ReviewerLoad, StageProgress,
};
pub use catalog::{
    ConsensusPolicy, ReviewProject, ReviewerRequirement, ReviewerRole, StageDefinition, StageType,
};
pub use core::{
    error::DomainError,
    ids::{AssignmentId, ProjectId, ReviewerId, StageDefinitionId, StageId},
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use notification::WorkflowNotification;
pub use quorum::{ConflictState, ConsensusOutcome, DecisionTally, QuorumEvaluation, evaluate_quorum};
pub use screening::{
    AssignmentRequest, AssignmentStatus, ReviewerDecision, ScreeningAssignment, ScreeningDecision,
};
pub use stage::{ReviewStage, StageTransition};
