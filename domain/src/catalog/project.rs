//! Review project aggregate

use super::definition::{StageDefinition, StageType};
use crate::core::error::DomainError;
use crate::core::ids::{ProjectId, StageDefinitionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A systematic-review project owning an ordered stage catalog
///
/// The list of stage definitions is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewProject {
    id: ProjectId,
    name: String,
    created_at: DateTime<Utc>,
    definitions: Vec<StageDefinition>,
}

impl ReviewProject {
    /// Create a project, rejecting blank names, empty catalogs and duplicate
    /// definition ids
    pub fn new(
        id: impl Into<ProjectId>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        definitions: Vec<StageDefinition>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if definitions.is_empty() {
            return Err(DomainError::NoStageDefinitions);
        }

        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.id()) {
                return Err(DomainError::DuplicateDefinition(
                    definition.id().to_string(),
                ));
            }
        }

        Ok(Self {
            id: id.into(),
            name,
            created_at,
            definitions,
        })
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Stage definitions in project order
    pub fn definitions(&self) -> &[StageDefinition] {
        &self.definitions
    }

    pub fn definition(&self, id: &StageDefinitionId) -> Option<&StageDefinition> {
        self.definitions.iter().find(|d| d.id() == id)
    }

    /// First definition of the given type (project order) not in `used`
    pub fn first_unused_of_type<'a>(
        &'a self,
        stage_type: StageType,
        used: &HashSet<&StageDefinitionId>,
    ) -> Option<&'a StageDefinition> {
        self.definitions
            .iter()
            .find(|d| d.stage_type() == stage_type && !used.contains(d.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConsensusPolicy, ReviewerRequirement, ReviewerRole};

    fn definition(id: &str, stage_type: StageType) -> StageDefinition {
        StageDefinition::new(
            id,
            format!("Stage {}", id),
            stage_type,
            ReviewerRequirement::new([(ReviewerRole::Primary, 1)]).unwrap(),
            ConsensusPolicy::Disabled,
        )
        .unwrap()
    }

    #[test]
    fn test_project_rejects_duplicates() {
        let result = ReviewProject::new(
            "p1",
            "Review",
            Utc::now(),
            vec![
                definition("a", StageType::TitleScreening),
                definition("a", StageType::FullTextReview),
            ],
        );
        assert_eq!(
            result.unwrap_err(),
            DomainError::DuplicateDefinition("a".to_string())
        );
    }

    #[test]
    fn test_project_rejects_empty_catalog() {
        let result = ReviewProject::new("p1", "Review", Utc::now(), vec![]);
        assert_eq!(result.unwrap_err(), DomainError::NoStageDefinitions);
    }

    #[test]
    fn test_first_unused_of_type_respects_order_and_usage() {
        let project = ReviewProject::new(
            "p1",
            "Review",
            Utc::now(),
            vec![
                definition("title", StageType::TitleScreening),
                definition("meeting-1", StageType::ConsensusMeeting),
                definition("meeting-2", StageType::ConsensusMeeting),
            ],
        )
        .unwrap();

        let mut used = HashSet::new();
        let first = project
            .first_unused_of_type(StageType::ConsensusMeeting, &used)
            .unwrap();
        assert_eq!(first.id().as_str(), "meeting-1");

        let meeting_1 = StageDefinitionId::new("meeting-1");
        used.insert(&meeting_1);
        let second = project
            .first_unused_of_type(StageType::ConsensusMeeting, &used)
            .unwrap();
        assert_eq!(second.id().as_str(), "meeting-2");

        assert!(project
            .first_unused_of_type(StageType::QualityAssurance, &used)
            .is_none());
    }
}
