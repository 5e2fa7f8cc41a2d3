//! Stage definitions
//!
//! A [`StageDefinition`] is the immutable template of a review phase: what
//! kind of phase it is, how many reviewers of each role it needs, and how
//! disagreement between those reviewers is handled.

use super::policy::ConsensusPolicy;
use crate::core::error::DomainError;
use crate::core::ids::StageDefinitionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of review phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    /// Title/abstract screening of identified records
    TitleScreening,
    /// Full-text eligibility review
    FullTextReview,
    /// Structured data extraction from included studies
    DataExtraction,
    /// Meeting to settle reviewer disagreement
    ConsensusMeeting,
    /// Quality assurance pass over earlier decisions
    QualityAssurance,
    /// Risk-of-bias assessment of included studies
    RiskOfBias,
}

impl StageType {
    /// Returns all stage types.
    pub fn all() -> &'static [StageType] {
        &[
            StageType::TitleScreening,
            StageType::FullTextReview,
            StageType::DataExtraction,
            StageType::ConsensusMeeting,
            StageType::QualityAssurance,
            StageType::RiskOfBias,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::TitleScreening => "title_screening",
            StageType::FullTextReview => "full_text_review",
            StageType::DataExtraction => "data_extraction",
            StageType::ConsensusMeeting => "consensus_meeting",
            StageType::QualityAssurance => "quality_assurance",
            StageType::RiskOfBias => "risk_of_bias",
        }
    }

    /// Whether stages of this type are reported in the PRISMA flow
    pub fn counts_toward_prisma(&self) -> bool {
        matches!(self, StageType::TitleScreening | StageType::FullTextReview)
    }

    /// Whether stages of this type can receive escalated disagreement
    pub fn accepts_escalation(&self) -> bool {
        matches!(
            self,
            StageType::ConsensusMeeting | StageType::QualityAssurance
        )
    }
}

impl std::fmt::Display for StageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "title_screening" | "title" => Ok(StageType::TitleScreening),
            "full_text_review" | "full_text" | "fulltext" => Ok(StageType::FullTextReview),
            "data_extraction" | "extraction" => Ok(StageType::DataExtraction),
            "consensus_meeting" | "consensus" => Ok(StageType::ConsensusMeeting),
            "quality_assurance" | "qa" => Ok(StageType::QualityAssurance),
            "risk_of_bias" | "rob" => Ok(StageType::RiskOfBias),
            _ => Err(format!("Unknown stage type: {}", s)),
        }
    }
}

/// Role a reviewer plays within a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerRole {
    Primary,
    Secondary,
    Tertiary,
    /// Senior reviewer who settles disagreement
    Arbitrator,
}

impl ReviewerRole {
    pub fn all() -> &'static [ReviewerRole] {
        &[
            ReviewerRole::Primary,
            ReviewerRole::Secondary,
            ReviewerRole::Tertiary,
            ReviewerRole::Arbitrator,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewerRole::Primary => "primary",
            ReviewerRole::Secondary => "secondary",
            ReviewerRole::Tertiary => "tertiary",
            ReviewerRole::Arbitrator => "arbitrator",
        }
    }
}

impl std::fmt::Display for ReviewerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(ReviewerRole::Primary),
            "secondary" => Ok(ReviewerRole::Secondary),
            "tertiary" => Ok(ReviewerRole::Tertiary),
            "arbitrator" | "arbiter" => Ok(ReviewerRole::Arbitrator),
            _ => Err(format!("Unknown reviewer role: {}", s)),
        }
    }
}

/// How many reviewers of each role a stage needs
///
/// # Example
///
/// ```
/// use screening_domain::catalog::{ReviewerRequirement, ReviewerRole};
///
/// let requirement = ReviewerRequirement::new([
///     (ReviewerRole::Primary, 1),
///     (ReviewerRole::Secondary, 1),
/// ])
/// .unwrap();
/// assert_eq!(requirement.total_required(), 2);
/// assert_eq!(requirement.count_for(ReviewerRole::Primary), 1);
/// assert_eq!(requirement.count_for(ReviewerRole::Arbitrator), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerRequirement {
    roles: BTreeMap<ReviewerRole, usize>,
}

impl ReviewerRequirement {
    /// Create a requirement, rejecting empty maps and zero counts
    pub fn new(roles: impl IntoIterator<Item = (ReviewerRole, usize)>) -> Result<Self, DomainError> {
        let mut map = BTreeMap::new();
        for (role, count) in roles {
            *map.entry(role).or_insert(0) += count;
        }
        if map.is_empty() || map.values().any(|count| *count == 0) {
            return Err(DomainError::EmptyRequirement);
        }
        Ok(Self { roles: map })
    }

    /// Total number of reviewers across all roles
    pub fn total_required(&self) -> usize {
        self.roles.values().sum()
    }

    /// Number of reviewers required for a role (0 if the role is not used)
    pub fn count_for(&self, role: ReviewerRole) -> usize {
        self.roles.get(&role).copied().unwrap_or(0)
    }

    pub fn contains_role(&self, role: ReviewerRole) -> bool {
        self.roles.contains_key(&role)
    }

    /// Iterate over (role, count) pairs in role order
    pub fn iter(&self) -> impl Iterator<Item = (ReviewerRole, usize)> + '_ {
        self.roles.iter().map(|(role, count)| (*role, *count))
    }

    /// Compare observed role counts against this requirement.
    ///
    /// Returns a description of every mismatch: missing or surplus reviewers
    /// for a required role, and roles the requirement does not use at all.
    pub fn mismatches(&self, observed: &BTreeMap<ReviewerRole, usize>) -> Vec<String> {
        let mut problems = Vec::new();

        for (role, required) in self.iter() {
            let actual = observed.get(&role).copied().unwrap_or(0);
            if actual != required {
                problems.push(format!("{} requires {} reviewer(s), got {}", role, required, actual));
            }
        }

        for (role, actual) in observed {
            if !self.contains_role(*role) && *actual > 0 {
                problems.push(format!("{} is not part of the requirement ({} requested)", role, actual));
            }
        }

        problems
    }
}

/// Immutable template describing a review phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    id: StageDefinitionId,
    name: String,
    stage_type: StageType,
    requirement: ReviewerRequirement,
    consensus: ConsensusPolicy,
}

impl StageDefinition {
    /// Create a stage definition, validating the consensus policy against
    /// the reviewer requirement
    pub fn new(
        id: impl Into<StageDefinitionId>,
        name: impl Into<String>,
        stage_type: StageType,
        requirement: ReviewerRequirement,
        consensus: ConsensusPolicy,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        consensus.validate_against(&requirement)?;

        Ok(Self {
            id: id.into(),
            name,
            stage_type,
            requirement,
            consensus,
        })
    }

    pub fn id(&self) -> &StageDefinitionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage_type(&self) -> StageType {
        self.stage_type
    }

    pub fn requirement(&self) -> &ReviewerRequirement {
        &self.requirement
    }

    pub fn consensus(&self) -> &ConsensusPolicy {
        &self.consensus
    }
}
