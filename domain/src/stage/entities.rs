//! Review stage aggregate
//!
//! A [`ReviewStage`] is a live instance of a [`StageDefinition`]: it holds
//! the concrete reviewer assignments and the stage's conflict state.

use crate::catalog::{ReviewerRole, StageDefinition};
use crate::core::error::DomainError;
use crate::core::ids::{ProjectId, StageDefinitionId, StageId};
use crate::quorum::{ConflictState, ConsensusOutcome, DecisionTally, QuorumEvaluation, evaluate_quorum};
use crate::screening::{AssignmentRequest, ScreeningAssignment, ScreeningDecision};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A change of a stage's conflict state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub previous: ConflictState,
    pub current: ConflictState,
}

impl std::fmt::Display for StageTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.previous, self.current)
    }
}

/// Live instance of a stage definition (Aggregate Root)
///
/// Invariant: at creation, the number of assignments per role equals the
/// definition's reviewer requirement exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewStage {
    id: StageId,
    project_id: ProjectId,
    definition: StageDefinition,
    assignments: Vec<ScreeningAssignment>,
    conflict_state: ConflictState,
    activated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    outcome: Option<ConsensusOutcome>,
}

impl ReviewStage {
    /// Create a stage with one pending assignment per request
    ///
    /// Fails with [`DomainError::RoleCountMismatch`] unless the requests
    /// match the definition's reviewer requirement role by role.
    pub fn create(
        project_id: ProjectId,
        definition: &StageDefinition,
        requests: &[AssignmentRequest],
        activated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::check_requests(definition, requests)?;

        let id = StageId::generate();
        let assignments = requests
            .iter()
            .map(|request| ScreeningAssignment::pending(id.clone(), request, activated_at))
            .collect();

        Ok(Self {
            id,
            project_id,
            definition: definition.clone(),
            assignments,
            conflict_state: ConflictState::None,
            activated_at,
            completed_at: None,
            outcome: None,
        })
    }

    /// Validate assignment requests against a definition's requirement
    pub fn check_requests(
        definition: &StageDefinition,
        requests: &[AssignmentRequest],
    ) -> Result<(), DomainError> {
        let requirement = definition.requirement();
        let mut problems = Vec::new();

        if requests.len() != requirement.total_required() {
            problems.push(format!(
                "stage '{}' requires {} reviewer(s), got {}",
                definition.id(),
                requirement.total_required(),
                requests.len()
            ));
        }
        problems.extend(requirement.mismatches(&role_counts(requests.iter().map(|r| r.role))));

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::RoleCountMismatch(problems.join("; ")))
        }
    }

    pub fn id(&self) -> &StageId {
        &self.id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn definition(&self) -> &StageDefinition {
        &self.definition
    }

    pub fn definition_id(&self) -> &StageDefinitionId {
        self.definition.id()
    }

    pub fn assignments(&self) -> &[ScreeningAssignment] {
        &self.assignments
    }

    pub fn conflict_state(&self) -> ConflictState {
        self.conflict_state
    }

    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn outcome(&self) -> Option<&ConsensusOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn tally(&self) -> DecisionTally {
        DecisionTally::from_assignments(&self.assignments)
    }

    /// Evaluate the quorum rule over the current assignments
    pub fn evaluate(&self) -> QuorumEvaluation {
        evaluate_quorum(
            &self.assignments,
            self.definition.requirement().total_required(),
            self.definition.consensus(),
        )
    }

    /// Replace the assignment list with a freshly loaded one
    pub fn with_assignments(
        &self,
        assignments: Vec<ScreeningAssignment>,
    ) -> Result<Self, DomainError> {
        if let Some(foreign) = assignments.iter().find(|a| a.stage_id() != &self.id) {
            return Err(DomainError::ForeignAssignment {
                assignment: foreign.id().to_string(),
                stage: self.id.to_string(),
            });
        }
        Ok(Self {
            assignments,
            ..self.clone()
        })
    }

    /// Apply the quorum rule, producing the transitioned stage
    ///
    /// Returns `None` when nothing changes: the stage already left
    /// [`ConflictState::None`], or quorum has not been reached yet. When
    /// the stage resolves, the unanimous verdict is recorded as its
    /// [`ConsensusOutcome`].
    pub fn apply_quorum(&self, now: DateTime<Utc>) -> Option<(Self, StageTransition)> {
        if self.conflict_state.is_terminal() {
            return None;
        }

        let QuorumEvaluation::Reached {
            state,
            unanimous_decision,
            ..
        } = self.evaluate()
        else {
            return None;
        };

        let completed_at = self.completed_at.or(Some(now));
        if state == self.conflict_state && completed_at == self.completed_at {
            return None;
        }

        let outcome = match (state, unanimous_decision) {
            (ConflictState::Resolved, Some(decision)) => Some(ConsensusOutcome::new(
                self.id.clone(),
                decision == ScreeningDecision::Included,
                state,
                now,
            )),
            _ => self.outcome.clone(),
        };

        let transition = StageTransition {
            previous: self.conflict_state,
            current: state,
        };

        Some((
            Self {
                conflict_state: state,
                completed_at,
                outcome,
                ..self.clone()
            },
            transition,
        ))
    }

    /// Reviewers of the given role, in assignment order
    pub fn reviewers_in_role(
        &self,
        role: ReviewerRole,
    ) -> impl Iterator<Item = &ScreeningAssignment> + '_ {
        self.assignments.iter().filter(move |a| a.role() == role)
    }
}

/// Count roles in an iterator
pub fn role_counts(roles: impl IntoIterator<Item = ReviewerRole>) -> BTreeMap<ReviewerRole, usize> {
    let mut counts = BTreeMap::new();
    for role in roles {
        *counts.entry(role).or_insert(0) += 1;
    }
    counts
}
