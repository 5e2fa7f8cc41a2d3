//! Stage creation with reviewer-quota validation.

use super::{ReviewWorkflowUseCase, WorkflowError};
use crate::use_cases::shared::check_cancelled;
use chrono::Utc;
use screening_domain::{
    AssignmentRequest, DomainError, ProjectId, ReviewStage, StageDefinitionId,
};
use tracing::{info, warn};

impl ReviewWorkflowUseCase {
    /// Create a stage of the given definition with one pending assignment
    /// per request.
    ///
    /// The requests must match the definition's reviewer requirement exactly:
    /// same total, same count per role, no extra roles. Otherwise the call
    /// fails with [`WorkflowError::ConfigurationMismatch`] before anything is
    /// written.
    pub async fn create_stage(
        &self,
        project_id: &ProjectId,
        definition_id: &StageDefinitionId,
        requests: &[AssignmentRequest],
    ) -> Result<ReviewStage, WorkflowError> {
        let project = self.load_project(project_id).await?;
        let definition = project
            .definition(definition_id)
            .ok_or_else(|| WorkflowError::not_found("stage definition", definition_id))?;

        let stage = ReviewStage::create(project.id().clone(), definition, requests, Utc::now())
            .map_err(|e| match e {
                DomainError::RoleCountMismatch(detail) => {
                    warn!(
                        "Rejected stage '{}' for project {}: {}",
                        definition_id, project_id, detail
                    );
                    WorkflowError::ConfigurationMismatch(detail)
                }
                other => other.into(),
            })?;

        self.persist_new_stage(&stage).await?;

        info!(
            "Created stage {} ({}) with {} assignment(s)",
            stage.id(),
            definition.name(),
            stage.assignments().len()
        );
        Ok(stage)
    }

    /// Persist a freshly created stage, then each of its assignments,
    /// notifying hooks after every assignment write.
    pub(super) async fn persist_new_stage(&self, stage: &ReviewStage) -> Result<(), WorkflowError> {
        check_cancelled(&self.cancellation_token)?;
        self.store.save_stage(stage).await?;

        for assignment in stage.assignments() {
            check_cancelled(&self.cancellation_token)?;
            self.store
                .save_assignment(stage.project_id(), assignment)
                .await?;

            let context = self.contexts.assignment_updated(assignment, Utc::now());
            self.publish(stage.project_id(), context).await?;
        }

        Ok(())
    }
}
