//! Review store port
//!
//! Defines how the workflow reads and writes projects, stages and
//! assignments. The store owns the persistence representation; the
//! workflow only relies on linearizable per-entity reads and writes.

use async_trait::async_trait;
use screening_domain::{
    AssignmentId, ProjectId, ReviewProject, ReviewStage, ScreeningAssignment, StageId,
};
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read {entity} {id}: {message}")]
    ReadFailed {
        entity: &'static str,
        id: String,
        message: String,
    },

    #[error("Failed to write {entity} {id}: {message}")]
    WriteFailed {
        entity: &'static str,
        id: String,
        message: String,
    },

    #[error("Other error: {0}")]
    Other(String),
}

/// Exclusive per-stage lease held while a stage's quorum is evaluated
///
/// `None` means the store does not serialise access itself.
pub type StageLease = Option<OwnedMutexGuard<()>>;

/// Persistence for review projects, stages and assignments
///
/// Assignments are written only through [`save_assignment`](Self::save_assignment).
/// The assignment list embedded in a saved stage is not authoritative:
/// stages are returned hydrated with their current assignments.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Get a project, returning None if not found
    async fn get_project(&self, id: &ProjectId) -> Result<Option<ReviewProject>, StoreError>;

    /// Get a stage with its current assignments, returning None if not found
    async fn get_stage(&self, id: &StageId) -> Result<Option<ReviewStage>, StoreError>;

    /// Get all stages of a project with their current assignments, in
    /// creation order
    async fn get_stages_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ReviewStage>, StoreError>;

    /// Get an assignment, returning None if not found
    async fn get_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<ScreeningAssignment>, StoreError>;

    /// Get all assignments of a stage, in creation order
    async fn get_assignments_by_stage(
        &self,
        stage_id: &StageId,
    ) -> Result<Vec<ScreeningAssignment>, StoreError>;

    /// Store a stage (upsert semantics)
    async fn save_stage(&self, stage: &ReviewStage) -> Result<(), StoreError>;

    /// Store an assignment (upsert semantics)
    async fn save_assignment(
        &self,
        project_id: &ProjectId,
        assignment: &ScreeningAssignment,
    ) -> Result<(), StoreError>;

    /// Acquire exclusive access to a stage for the duration of a quorum
    /// evaluation.
    ///
    /// Concurrent decisions on the same stage race on the quorum computation
    /// unless the store serialises them here. The default implementation
    /// provides no serialisation.
    async fn lock_stage(&self, _stage_id: &StageId) -> Result<StageLease, StoreError> {
        Ok(None)
    }
}
