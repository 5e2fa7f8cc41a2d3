//! Follow-up stages for escalated disagreement.

use super::{ReviewWorkflowUseCase, WorkflowError};
use crate::use_cases::shared::check_cancelled;
use chrono::Utc;
use screening_domain::{
    AssignmentRequest, ReviewProject, ReviewStage, StageDefinition, StageDefinitionId, StageType,
};
use std::collections::HashSet;
use tracing::{debug, info};

/// Pick the definition an escalated stage continues in
///
/// The first ConsensusMeeting definition (project order) that has no stage
/// yet, otherwise the first such QualityAssurance definition.
pub fn select_escalation_target<'a>(
    project: &'a ReviewProject,
    used: &HashSet<&StageDefinitionId>,
) -> Option<&'a StageDefinition> {
    project
        .first_unused_of_type(StageType::ConsensusMeeting, used)
        .or_else(|| project.first_unused_of_type(StageType::QualityAssurance, used))
}

/// Staff `target` with the reviewers of `stage`, role by role
///
/// Each required role takes the first N reviewers holding that role in the
/// original stage. Returns `None` if any role cannot be filled.
pub fn reuse_reviewers(stage: &ReviewStage, target: &StageDefinition) -> Option<Vec<AssignmentRequest>> {
    let mut requests = Vec::with_capacity(target.requirement().total_required());

    for (role, count) in target.requirement().iter() {
        let reviewers: Vec<_> = stage.reviewers_in_role(role).take(count).collect();
        if reviewers.len() < count {
            debug!(
                "Stage {} has {} {} reviewer(s), '{}' needs {}",
                stage.id(),
                reviewers.len(),
                role,
                target.id(),
                count
            );
            return None;
        }
        requests.extend(
            reviewers
                .into_iter()
                .map(|a| AssignmentRequest::new(a.reviewer_id().clone(), role)),
        );
    }

    Some(requests)
}

impl ReviewWorkflowUseCase {
    /// Open a follow-up stage for an escalated stage, when one can be staffed
    ///
    /// Skipping is not an error: `Ok(None)` is returned when the project
    /// has no unused escalation definition or the original reviewers cannot
    /// cover its requirement.
    pub(super) async fn escalate(
        &self,
        stage: &ReviewStage,
    ) -> Result<Option<ReviewStage>, WorkflowError> {
        let project = self.load_project(stage.project_id()).await?;

        check_cancelled(&self.cancellation_token)?;
        let existing = self.store.get_stages_by_project(project.id()).await?;
        let used: HashSet<&StageDefinitionId> =
            existing.iter().map(|s| s.definition_id()).collect();

        let Some(target) = select_escalation_target(&project, &used) else {
            info!(
                "No escalation stage left for {} in project {}",
                stage.id(),
                project.id()
            );
            return Ok(None);
        };

        let Some(requests) = reuse_reviewers(stage, target) else {
            info!(
                "Skipping escalation of {} to '{}': reviewers do not cover its requirement",
                stage.id(),
                target.id()
            );
            return Ok(None);
        };

        let follow_up = ReviewStage::create(project.id().clone(), target, &requests, Utc::now())?;
        self.persist_new_stage(&follow_up).await?;

        info!(
            "Escalated stage {} to {} ({})",
            stage.id(),
            follow_up.id(),
            target.name()
        );
        Ok(Some(follow_up))
    }
}
