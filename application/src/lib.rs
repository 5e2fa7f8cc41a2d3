//! Application layer for screening-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::WorkflowConfig;
pub use ports::{
    hook_orchestrator::{HookContext, HookContextFactory, HookError, HookOrchestrator, NoHooks},
    review_store::{ReviewStore, StageLease, StoreError},
};
pub use use_cases::analytics::{
    AnalyticsOptions, AnalyticsService, AssignmentPredicate, StagePredicate, TimelineFilter,
};
pub use use_cases::review_workflow::{
    ProjectHistory, ReviewWorkflowUseCase, SubmitDecisionOutput, WorkflowError,
};
