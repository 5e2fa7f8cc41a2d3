//! In-memory implementation of [`ReviewStore`].
//!
//! All data is held in memory and lost when the process exits. Reads and
//! writes are linearizable per entity; stage leases serialise quorum
//! evaluation per stage id.

use async_trait::async_trait;
use screening_application::{ReviewStore, StageLease, StoreError};
use screening_domain::{
    AssignmentId, ProjectId, ReviewProject, ReviewStage, ScreeningAssignment, StageId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Insertion-ordered table keyed by id
#[derive(Debug)]
struct Table<K, V> {
    rows: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + std::hash::Hash, V> Table<K, V> {
    fn upsert(&mut self, key: &K, value: V) {
        if self.rows.insert(key.clone(), value).is_none() {
            self.order.push(key.clone());
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().filter_map(|k| self.rows.get(k))
    }
}

type AssignmentTable = Table<AssignmentId, (ProjectId, ScreeningAssignment)>;

/// Replace a stored stage's assignment list with the current assignment rows
fn hydrate(stage: &ReviewStage, assignments: &AssignmentTable) -> Result<ReviewStage, StoreError> {
    let current = assignments
        .iter()
        .filter(|(_, a)| a.stage_id() == stage.id())
        .map(|(_, a)| a.clone())
        .collect();
    stage
        .with_assignments(current)
        .map_err(|e| StoreError::ReadFailed {
            entity: "stage",
            id: stage.id().to_string(),
            message: e.to_string(),
        })
}

/// In-memory review store.
///
/// Projects are registered with [`insert_project`](Self::insert_project);
/// stages and assignments arrive through the [`ReviewStore`] port and are
/// returned in the order they were first saved.
#[derive(Default)]
pub struct InMemoryReviewStore {
    projects: RwLock<HashMap<ProjectId, ReviewProject>>,
    stages: RwLock<Table<StageId, ReviewStage>>,
    assignments: RwLock<AssignmentTable>,
    stage_locks: Mutex<HashMap<StageId, Arc<Mutex<()>>>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a project
    pub async fn insert_project(&self, project: ReviewProject) {
        debug!("Registering project {} ({})", project.id(), project.name());
        let mut projects = self.projects.write().await;
        projects.insert(project.id().clone(), project);
    }

    /// Number of stored stages across all projects
    pub async fn stage_count(&self) -> usize {
        self.stages.read().await.order.len()
    }

    /// Number of stored assignments across all projects
    pub async fn assignment_count(&self) -> usize {
        self.assignments.read().await.order.len()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn get_project(&self, id: &ProjectId) -> Result<Option<ReviewProject>, StoreError> {
        let projects = self.projects.read().await;
        Ok(projects.get(id).cloned())
    }

    async fn get_stage(&self, id: &StageId) -> Result<Option<ReviewStage>, StoreError> {
        let stages = self.stages.read().await;
        let assignments = self.assignments.read().await;
        stages
            .get(id)
            .map(|stage| hydrate(stage, &assignments))
            .transpose()
    }

    async fn get_stages_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ReviewStage>, StoreError> {
        let stages = self.stages.read().await;
        let assignments = self.assignments.read().await;
        stages
            .iter()
            .filter(|s| s.project_id() == project_id)
            .map(|stage| hydrate(stage, &assignments))
            .collect()
    }

    async fn get_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<ScreeningAssignment>, StoreError> {
        let assignments = self.assignments.read().await;
        Ok(assignments.get(id).map(|(_, a)| a.clone()))
    }

    async fn get_assignments_by_stage(
        &self,
        stage_id: &StageId,
    ) -> Result<Vec<ScreeningAssignment>, StoreError> {
        let assignments = self.assignments.read().await;
        Ok(assignments
            .iter()
            .filter(|(_, a)| a.stage_id() == stage_id)
            .map(|(_, a)| a.clone())
            .collect())
    }

    async fn save_stage(&self, stage: &ReviewStage) -> Result<(), StoreError> {
        let mut stages = self.stages.write().await;
        stages.upsert(stage.id(), stage.clone());
        Ok(())
    }

    async fn save_assignment(
        &self,
        project_id: &ProjectId,
        assignment: &ScreeningAssignment,
    ) -> Result<(), StoreError> {
        let mut assignments = self.assignments.write().await;
        assignments.upsert(assignment.id(), (project_id.clone(), assignment.clone()));
        Ok(())
    }

    async fn lock_stage(&self, stage_id: &StageId) -> Result<StageLease, StoreError> {
        let lock = {
            let mut locks = self.stage_locks.lock().await;
            locks.entry(stage_id.clone()).or_default().clone()
        };
        Ok(Some(lock.lock_owned().await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use screening_domain::{
        AssignmentRequest, ConsensusPolicy, ReviewerRequirement, ReviewerRole, StageDefinition,
        StageType,
    };
    use std::time::Duration;

    fn project(id: &str) -> ReviewProject {
        ReviewProject::new(
            id,
            "Test project",
            Utc::now(),
            vec![
                StageDefinition::new(
                    "title",
                    "Title screening",
                    StageType::TitleScreening,
                    ReviewerRequirement::new([(ReviewerRole::Primary, 2)]).unwrap(),
                    ConsensusPolicy::Disabled,
                )
                .unwrap(),
            ],
        )
        .unwrap()
    }

    fn stage(project: &ReviewProject) -> ReviewStage {
        ReviewStage::create(
            project.id().clone(),
            &project.definitions()[0],
            &[
                AssignmentRequest::new("alice", ReviewerRole::Primary),
                AssignmentRequest::new("bob", ReviewerRole::Primary),
            ],
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_stages_are_scoped_by_project_in_save_order() {
        let store = InMemoryReviewStore::new();
        let p1 = project("p1");
        let p2 = project("p2");

        let first = stage(&p1);
        let other = stage(&p2);
        let second = stage(&p1);
        for s in [&first, &other, &second] {
            store.save_stage(s).await.unwrap();
        }
        // Re-saving keeps the original position
        store.save_stage(&first).await.unwrap();

        let ids: Vec<StageId> = store
            .get_stages_by_project(p1.id())
            .await
            .unwrap()
            .iter()
            .map(|s| s.id().clone())
            .collect();
        assert_eq!(ids, vec![first.id().clone(), second.id().clone()]);
        assert_eq!(store.stage_count().await, 3);
    }

    #[tokio::test]
    async fn test_assignment_upsert_replaces_value() {
        let store = InMemoryReviewStore::new();
        let p1 = project("p1");
        let s = stage(&p1);
        for a in s.assignments() {
            store.save_assignment(p1.id(), a).await.unwrap();
        }

        let original = &s.assignments()[0];
        let decided = original.with_decision(screening_domain::ReviewerDecision::new(
            original.id().clone(),
            original.reviewer_id().clone(),
            screening_domain::ScreeningDecision::Included,
            Utc::now(),
        ));
        store.save_assignment(p1.id(), &decided).await.unwrap();

        let loaded = store.get_assignments_by_stage(s.id()).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], decided);
        assert_eq!(store.assignment_count().await, 2);
        assert_eq!(
            store.get_assignment(original.id()).await.unwrap(),
            Some(decided)
        );
    }

    #[tokio::test]
    async fn test_stage_reads_reflect_saved_assignments() {
        let store = InMemoryReviewStore::new();
        let p1 = project("p1");
        let s = stage(&p1);
        store.save_stage(&s).await.unwrap();
        for a in s.assignments() {
            store.save_assignment(p1.id(), a).await.unwrap();
        }

        let original = &s.assignments()[1];
        let decided = original.with_decision(screening_domain::ReviewerDecision::new(
            original.id().clone(),
            original.reviewer_id().clone(),
            screening_domain::ScreeningDecision::Excluded,
            Utc::now(),
        ));
        store.save_assignment(p1.id(), &decided).await.unwrap();

        let loaded = store.get_stage(s.id()).await.unwrap().unwrap();
        assert_eq!(loaded.assignments()[1], decided);
        assert_eq!(loaded.tally().excluded, 1);

        let listed = store.get_stages_by_project(p1.id()).await.unwrap();
        assert_eq!(listed[0].assignments(), loaded.assignments());
    }

    #[tokio::test]
    async fn test_missing_entities_are_none() {
        let store = InMemoryReviewStore::new();
        assert!(store.get_project(&ProjectId::new("p")).await.unwrap().is_none());
        assert!(store.get_stage(&StageId::new("s")).await.unwrap().is_none());
        assert!(
            store
                .get_assignment(&AssignmentId::new("a"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_stage_lease_is_exclusive_per_stage() {
        let store = InMemoryReviewStore::new();
        let s1 = StageId::new("s1");
        let s2 = StageId::new("s2");

        let lease = store.lock_stage(&s1).await.unwrap();
        assert!(lease.is_some());

        // Another stage is not blocked
        let other = store.lock_stage(&s2).await.unwrap();
        assert!(other.is_some());

        let blocked = tokio::time::timeout(Duration::from_millis(50), store.lock_stage(&s1)).await;
        assert!(blocked.is_err());

        drop(lease);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), store.lock_stage(&s1)).await;
        assert!(matches!(reacquired, Ok(Ok(Some(_)))));
    }
}
