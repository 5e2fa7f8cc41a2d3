//! Project catalog from TOML (`[project]` section)

use chrono::{DateTime, Utc};
use screening_domain::{
    ConfigIssue, ConfigIssueCode, ConsensusPolicy, DomainError, ReviewProject, ReviewerRequirement,
    ReviewerRole, StageDefinition, StageType,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Errors raised while turning a project section into a [`ReviewProject`]
#[derive(Debug, Error)]
pub enum ProjectConfigError {
    #[error("invalid project configuration: {}", summarize(.0))]
    Invalid(Vec<ConfigIssue>),

    #[error("{0}")]
    Parse(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

fn summarize(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw project configuration from TOML
///
/// # Example
///
/// ```toml
/// [project]
/// id = "statins"
/// name = "Statins review"
///
/// [[project.stages]]
/// id = "title"
/// name = "Title screening"
/// stage_type = "title_screening"
/// reviewers = { primary = 1, secondary = 1 }
/// consensus = { enabled = true, minimum_agreements = 2, escalate_on_disagreement = true }
///
/// [[project.stages]]
/// id = "meeting"
/// stage_type = "consensus_meeting"
/// reviewers = { primary = 1, secondary = 1 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProjectConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stages: Vec<FileStageConfig>,
}

/// One `[[project.stages]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStageConfig {
    pub id: String,
    /// Display name, defaults to the id
    #[serde(default)]
    pub name: Option<String>,
    pub stage_type: String,
    /// Role name → reviewer count
    #[serde(default)]
    pub reviewers: BTreeMap<String, usize>,
    #[serde(default)]
    pub consensus: FileConsensusConfig,
}

/// Consensus settings of a stage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    pub enabled: bool,
    /// Defaults to the stage's total reviewer count
    pub minimum_agreements: Option<usize>,
    pub escalate_on_disagreement: bool,
    pub arbitration_role: Option<String>,
}

fn names<T: std::fmt::Display>(values: &[T]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn invalid_value(field: String, value: &str, valid_values: Vec<String>) -> ConfigIssue {
    let message = format!("{}: unknown value '{}'", field, value);
    ConfigIssue::error(
        ConfigIssueCode::InvalidEnumValue {
            field,
            value: value.to_string(),
            valid_values,
        },
        message,
    )
}

impl FileProjectConfig {
    /// Built-in project used when no `[project]` section is configured:
    /// title screening (escalating), full-text review and a consensus meeting,
    /// each staffed by one primary and one secondary reviewer.
    pub fn sample() -> Self {
        let pair = || {
            BTreeMap::from([("primary".to_string(), 1), ("secondary".to_string(), 1)])
        };
        let stage = |id: &str, name: &str, stage_type: &str, escalate: bool| FileStageConfig {
            id: id.to_string(),
            name: Some(name.to_string()),
            stage_type: stage_type.to_string(),
            reviewers: pair(),
            consensus: FileConsensusConfig {
                enabled: true,
                minimum_agreements: Some(2),
                escalate_on_disagreement: escalate,
                arbitration_role: None,
            },
        };

        Self {
            id: "demo".to_string(),
            name: "Demo review".to_string(),
            stages: vec![
                stage("title", "Title screening", "title_screening", true),
                stage("full-text", "Full-text review", "full_text_review", false),
                stage("meeting", "Consensus meeting", "consensus_meeting", false),
            ],
        }
    }

    /// Validate the project section, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.id.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "project.id".to_string(),
                },
                "project.id must not be empty",
            ));
        }
        if self.name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "project.name".to_string(),
                },
                "project.name must not be empty",
            ));
        }
        if self.stages.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoStages,
                "project declares no [[project.stages]]",
            ));
        }

        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateStageId {
                        id: stage.id.clone(),
                    },
                    format!("stage id '{}' is declared more than once", stage.id),
                ));
            }
            issues.extend(stage.validate());
        }

        let escalates = self
            .stages
            .iter()
            .any(|s| s.consensus.enabled && s.consensus.escalate_on_disagreement);
        let has_target = self.stages.iter().any(|s| {
            s.stage_type
                .parse::<StageType>()
                .is_ok_and(|t| t.accepts_escalation())
        });
        if escalates && !has_target {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoEscalationTarget,
                "a stage escalates on disagreement but no consensus_meeting or \
                 quality_assurance stage is declared; escalated stages will stay open",
            ));
        }

        issues
    }

    /// Build the validated [`ReviewProject`]
    ///
    /// Fails with [`ProjectConfigError::Invalid`] carrying every error-level
    /// issue if validation does not pass.
    pub fn to_project(&self, created_at: DateTime<Utc>) -> Result<ReviewProject, ProjectConfigError> {
        let errors: Vec<ConfigIssue> = self
            .validate()
            .into_iter()
            .filter(ConfigIssue::is_error)
            .collect();
        if !errors.is_empty() {
            return Err(ProjectConfigError::Invalid(errors));
        }

        let definitions = self
            .stages
            .iter()
            .map(FileStageConfig::to_definition)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReviewProject::new(
            self.id.as_str(),
            self.name.as_str(),
            created_at,
            definitions,
        )?)
    }
}

impl FileStageConfig {
    fn field(&self, name: &str) -> String {
        format!("project.stages.{}.{}", self.id, name)
    }

    fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.id.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "project.stages.id".to_string(),
                },
                "every stage needs a non-empty id",
            ));
        }

        if self.stage_type.parse::<StageType>().is_err() {
            issues.push(invalid_value(
                self.field("stage_type"),
                &self.stage_type,
                names(StageType::all()),
            ));
        }

        if self.reviewers.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyRequirement {
                    stage: self.id.clone(),
                },
                format!("stage '{}' requests no reviewers", self.id),
            ));
        }

        for (role, count) in &self.reviewers {
            if role.parse::<ReviewerRole>().is_err() {
                issues.push(invalid_value(
                    self.field("reviewers"),
                    role,
                    names(ReviewerRole::all()),
                ));
            }
            if *count == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroReviewerCount {
                        stage: self.id.clone(),
                        role: role.clone(),
                    },
                    format!("stage '{}' requests zero {} reviewers", self.id, role),
                ));
            }
        }

        let consensus = &self.consensus;
        if consensus.enabled {
            let total: usize = self.reviewers.values().sum();
            let minimum = consensus.minimum_agreements.unwrap_or(total);
            if total > 0 && (minimum == 0 || minimum > total) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnreachableConsensus {
                        stage: self.id.clone(),
                        minimum_agreements: minimum,
                        total_required: total,
                    },
                    format!(
                        "stage '{}' needs {} agreement(s) but has {} reviewer(s)",
                        self.id, minimum, total
                    ),
                ));
            }
            if let Some(role) = &consensus.arbitration_role
                && role.parse::<ReviewerRole>().is_err()
            {
                issues.push(invalid_value(
                    self.field("consensus.arbitration_role"),
                    role,
                    names(ReviewerRole::all()),
                ));
            }
        }

        issues
    }

    fn to_definition(&self) -> Result<StageDefinition, ProjectConfigError> {
        let stage_type: StageType = self.stage_type.parse().map_err(ProjectConfigError::Parse)?;
        let roles = self
            .reviewers
            .iter()
            .map(|(role, count)| role.parse::<ReviewerRole>().map(|r| (r, *count)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ProjectConfigError::Parse)?;
        let requirement = ReviewerRequirement::new(roles)?;
        let consensus = self.consensus.to_policy(requirement.total_required())?;

        Ok(StageDefinition::new(
            self.id.as_str(),
            self.name.clone().unwrap_or_else(|| self.id.clone()),
            stage_type,
            requirement,
            consensus,
        )?)
    }
}

impl FileConsensusConfig {
    fn to_policy(&self, total_required: usize) -> Result<ConsensusPolicy, ProjectConfigError> {
        if !self.enabled {
            return Ok(ConsensusPolicy::Disabled);
        }

        let policy = ConsensusPolicy::require_agreement(
            self.minimum_agreements.unwrap_or(total_required),
            self.escalate_on_disagreement,
        );
        match &self.arbitration_role {
            Some(role) => Ok(policy.with_arbitration_role(
                role.parse().map_err(ProjectConfigError::Parse)?,
            )),
            None => Ok(policy),
        }
    }
}
