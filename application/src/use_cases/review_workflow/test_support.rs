//! Mock ports shared by the workflow tests.

use super::ReviewWorkflowUseCase;
use crate::ports::hook_orchestrator::{HookContext, HookContextFactory, HookError, HookOrchestrator};
use crate::ports::review_store::{ReviewStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use screening_domain::{
    AssignmentId, AssignmentRequest, ConsensusPolicy, ProjectId, ReviewProject, ReviewStage,
    ReviewerRequirement, ReviewerRole, ScreeningAssignment, StageDefinition, StageId, StageType,
};
use std::sync::{Arc, Mutex};

// === Mock implementations ===

#[derive(Default)]
pub(crate) struct MockStore {
    projects: Mutex<Vec<ReviewProject>>,
    stages: Mutex<Vec<ReviewStage>>,
    assignments: Mutex<Vec<(ProjectId, ScreeningAssignment)>>,
    failing: Mutex<Option<&'static str>>,
}

impl MockStore {
    /// Fail every call of the named port operation (e.g. `"save_stage"`)
    pub(crate) fn fail_on(&self, operation: &'static str) {
        *self.failing.lock().unwrap() = Some(operation);
    }

    fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        if *self.failing.lock().unwrap() == Some(operation) {
            return Err(StoreError::Unavailable(format!("{} refused", operation)));
        }
        Ok(())
    }

    pub(crate) fn insert_project(&self, project: ReviewProject) {
        self.projects.lock().unwrap().push(project);
    }

    pub(crate) fn stage_count(&self) -> usize {
        self.stages.lock().unwrap().len()
    }

    pub(crate) fn assignment_count(&self) -> usize {
        self.assignments.lock().unwrap().len()
    }

    /// A stored stage hydrated with its current assignments
    pub(crate) fn stage(&self, id: &StageId) -> Option<ReviewStage> {
        let stored = self
            .stages
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id() == id)
            .cloned()?;
        Some(stored.with_assignments(self.assignments_of(id)).unwrap())
    }

    pub(crate) fn assignments_of(&self, stage_id: &StageId) -> Vec<ScreeningAssignment> {
        self.assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, a)| a.stage_id() == stage_id)
            .map(|(_, a)| a.clone())
            .collect()
    }
}

#[async_trait]
impl ReviewStore for MockStore {
    async fn get_project(&self, id: &ProjectId) -> Result<Option<ReviewProject>, StoreError> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id() == id)
            .cloned())
    }

    async fn get_stage(&self, id: &StageId) -> Result<Option<ReviewStage>, StoreError> {
        Ok(self.stage(id))
    }

    async fn get_stages_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ReviewStage>, StoreError> {
        let ids: Vec<StageId> = self
            .stages
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.project_id() == project_id)
            .map(|s| s.id().clone())
            .collect();
        Ok(ids.iter().filter_map(|id| self.stage(id)).collect())
    }

    async fn get_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<ScreeningAssignment>, StoreError> {
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .find(|(_, a)| a.id() == id)
            .map(|(_, a)| a.clone()))
    }

    async fn get_assignments_by_stage(
        &self,
        stage_id: &StageId,
    ) -> Result<Vec<ScreeningAssignment>, StoreError> {
        self.check("get_assignments_by_stage")?;
        Ok(self.assignments_of(stage_id))
    }

    async fn save_stage(&self, stage: &ReviewStage) -> Result<(), StoreError> {
        self.check("save_stage")?;
        let mut stages = self.stages.lock().unwrap();
        match stages.iter_mut().find(|s| s.id() == stage.id()) {
            Some(existing) => *existing = stage.clone(),
            None => stages.push(stage.clone()),
        }
        Ok(())
    }

    async fn save_assignment(
        &self,
        project_id: &ProjectId,
        assignment: &ScreeningAssignment,
    ) -> Result<(), StoreError> {
        self.check("save_assignment")?;
        let mut assignments = self.assignments.lock().unwrap();
        match assignments.iter_mut().find(|(_, a)| a.id() == assignment.id()) {
            Some(existing) => *existing = (project_id.clone(), assignment.clone()),
            None => assignments.push((project_id.clone(), assignment.clone())),
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingHooks {
    contexts: Mutex<Vec<(ProjectId, HookContext)>>,
    fail_on: Mutex<Option<&'static str>>,
}

impl RecordingHooks {
    /// Fail every notification of the given kind
    pub(crate) fn fail_on(&self, kind: &'static str) {
        *self.fail_on.lock().unwrap() = Some(kind);
    }

    pub(crate) fn contexts(&self) -> Vec<(ProjectId, HookContext)> {
        self.contexts.lock().unwrap().clone()
    }

    pub(crate) fn kinds(&self) -> Vec<&'static str> {
        self.contexts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.kind())
            .collect()
    }
}

#[async_trait]
impl HookOrchestrator for RecordingHooks {
    async fn process(&self, scope_id: &ProjectId, context: &HookContext) -> Result<(), HookError> {
        if *self.fail_on.lock().unwrap() == Some(context.kind()) {
            return Err(HookError::DispatchFailed(format!("{} refused", context.kind())));
        }
        self.contexts
            .lock()
            .unwrap()
            .push((scope_id.clone(), context.clone()));
        Ok(())
    }
}

// === Fixture ===

pub(crate) fn requests(pairs: &[(&str, ReviewerRole)]) -> Vec<AssignmentRequest> {
    pairs
        .iter()
        .map(|(reviewer, role)| AssignmentRequest::new(*reviewer, *role))
        .collect()
}

fn definition(
    id: &str,
    stage_type: StageType,
    roles: &[(ReviewerRole, usize)],
    consensus: ConsensusPolicy,
) -> StageDefinition {
    StageDefinition::new(
        id,
        id.replace('-', " "),
        stage_type,
        ReviewerRequirement::new(roles.iter().copied()).unwrap(),
        consensus,
    )
    .unwrap()
}

/// Project "p1" with title (escalating), full-text (conflicting),
/// consensus meeting, and an arbitrated QA stage
pub(crate) fn sample_project() -> ReviewProject {
    let pair = [(ReviewerRole::Primary, 1), (ReviewerRole::Secondary, 1)];
    ReviewProject::new(
        "p1",
        "Statins review",
        Utc::now(),
        vec![
            definition(
                "title",
                StageType::TitleScreening,
                &pair,
                ConsensusPolicy::require_agreement(2, true),
            ),
            definition(
                "full-text",
                StageType::FullTextReview,
                &pair,
                ConsensusPolicy::require_agreement(2, false),
            ),
            definition(
                "meeting",
                StageType::ConsensusMeeting,
                &pair,
                ConsensusPolicy::require_agreement(2, false),
            ),
            definition(
                "qa",
                StageType::QualityAssurance,
                &[(ReviewerRole::Primary, 1), (ReviewerRole::Arbitrator, 1)],
                ConsensusPolicy::Disabled,
            ),
        ],
    )
    .unwrap()
}

/// Project "p1" whose meeting and QA stages can both be staffed by the
/// title stage's reviewers
pub(crate) fn reusable_qa_project() -> ReviewProject {
    let pair = [(ReviewerRole::Primary, 1), (ReviewerRole::Secondary, 1)];
    ReviewProject::new(
        "p1",
        "Statins review",
        Utc::now(),
        vec![
            definition(
                "title",
                StageType::TitleScreening,
                &pair,
                ConsensusPolicy::require_agreement(2, true),
            ),
            definition(
                "meeting",
                StageType::ConsensusMeeting,
                &pair,
                ConsensusPolicy::require_agreement(2, false),
            ),
            definition("qa", StageType::QualityAssurance, &pair, ConsensusPolicy::Disabled),
        ],
    )
    .unwrap()
}

pub(crate) struct Fixture {
    pub(crate) store: Arc<MockStore>,
    pub(crate) hooks: Arc<RecordingHooks>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::with_project(sample_project())
    }

    pub(crate) fn with_project(project: ReviewProject) -> Self {
        let store = Arc::new(MockStore::default());
        store.insert_project(project);
        Self {
            store,
            hooks: Arc::new(RecordingHooks::default()),
        }
    }

    pub(crate) fn project_id(&self) -> ProjectId {
        ProjectId::new("p1")
    }

    pub(crate) fn workflow(&self) -> ReviewWorkflowUseCase {
        let store: Arc<dyn ReviewStore> = self.store.clone();
        let hooks: Arc<dyn HookOrchestrator> = self.hooks.clone();
        ReviewWorkflowUseCase::new(store, hooks, HookContextFactory::new("coordinator"))
    }
}
