//! Consensus policy
//!
//! Controls whether reviewer disagreement on a stage is escalated into a
//! follow-up stage or left open as a conflict.

use super::definition::{ReviewerRequirement, ReviewerRole};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How disagreement between reviewers of a stage is handled
///
/// # Example
///
/// ```
/// use screening_domain::catalog::ConsensusPolicy;
///
/// let policy = ConsensusPolicy::require_agreement(2, true);
/// assert!(policy.escalates_on_disagreement());
/// assert!(!ConsensusPolicy::Disabled.escalates_on_disagreement());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConsensusPolicy {
    /// No consensus handling: disagreement is recorded as a conflict
    #[default]
    Disabled,

    /// Reviewers are expected to agree
    RequireAgreement {
        /// Number of agreeing reviewers the stage is expected to gather
        minimum_agreements: usize,
        /// Open a follow-up stage when reviewers disagree
        escalate_on_disagreement: bool,
        /// Role that arbitrates the follow-up stage, if any
        arbitration_role: Option<ReviewerRole>,
    },
}

impl ConsensusPolicy {
    /// Policy requiring agreement, without a dedicated arbitration role
    pub fn require_agreement(minimum_agreements: usize, escalate_on_disagreement: bool) -> Self {
        ConsensusPolicy::RequireAgreement {
            minimum_agreements,
            escalate_on_disagreement,
            arbitration_role: None,
        }
    }

    /// Set the arbitration role (no-op for a disabled policy)
    pub fn with_arbitration_role(self, role: ReviewerRole) -> Self {
        match self {
            ConsensusPolicy::RequireAgreement {
                minimum_agreements,
                escalate_on_disagreement,
                ..
            } => ConsensusPolicy::RequireAgreement {
                minimum_agreements,
                escalate_on_disagreement,
                arbitration_role: Some(role),
            },
            ConsensusPolicy::Disabled => ConsensusPolicy::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ConsensusPolicy::RequireAgreement { .. })
    }

    pub fn escalates_on_disagreement(&self) -> bool {
        matches!(
            self,
            ConsensusPolicy::RequireAgreement {
                escalate_on_disagreement: true,
                ..
            }
        )
    }

    pub fn minimum_agreements(&self) -> Option<usize> {
        match self {
            ConsensusPolicy::RequireAgreement {
                minimum_agreements, ..
            } => Some(*minimum_agreements),
            ConsensusPolicy::Disabled => None,
        }
    }

    pub fn arbitration_role(&self) -> Option<ReviewerRole> {
        match self {
            ConsensusPolicy::RequireAgreement {
                arbitration_role, ..
            } => *arbitration_role,
            ConsensusPolicy::Disabled => None,
        }
    }

    /// Human-readable description of this policy
    pub fn description(&self) -> String {
        match self {
            ConsensusPolicy::Disabled => "disabled".to_string(),
            ConsensusPolicy::RequireAgreement {
                minimum_agreements,
                escalate_on_disagreement,
                ..
            } => {
                let action = if *escalate_on_disagreement {
                    "escalate"
                } else {
                    "flag conflict"
                };
                format!(
                    "require {} agreement(s), {} on disagreement",
                    minimum_agreements, action
                )
            }
        }
    }

    /// Check that the thresholds can be met by the given requirement
    pub(crate) fn validate_against(
        &self,
        requirement: &ReviewerRequirement,
    ) -> Result<(), DomainError> {
        if let ConsensusPolicy::RequireAgreement {
            minimum_agreements, ..
        } = self
        {
            let total = requirement.total_required();
            if *minimum_agreements == 0 || *minimum_agreements > total {
                return Err(DomainError::InvalidConsensusPolicy(format!(
                    "minimum_agreements must be between 1 and {}, got {}",
                    total, minimum_agreements
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for ConsensusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        assert_eq!(ConsensusPolicy::default(), ConsensusPolicy::Disabled);
        assert!(!ConsensusPolicy::default().is_enabled());
        assert_eq!(ConsensusPolicy::default().minimum_agreements(), None);
    }

    #[test]
    fn test_arbitration_role() {
        let policy = ConsensusPolicy::require_agreement(2, false)
            .with_arbitration_role(ReviewerRole::Arbitrator);
        assert_eq!(policy.arbitration_role(), Some(ReviewerRole::Arbitrator));
        assert!(!policy.escalates_on_disagreement());

        let disabled = ConsensusPolicy::Disabled.with_arbitration_role(ReviewerRole::Arbitrator);
        assert_eq!(disabled.arbitration_role(), None);
    }

    #[test]
    fn test_validate_against_requirement() {
        let requirement = ReviewerRequirement::new([(ReviewerRole::Primary, 2)]).unwrap();
        assert!(ConsensusPolicy::require_agreement(2, true)
            .validate_against(&requirement)
            .is_ok());
        assert!(ConsensusPolicy::require_agreement(0, true)
            .validate_against(&requirement)
            .is_err());
        assert!(ConsensusPolicy::Disabled.validate_against(&requirement).is_ok());
    }

    #[test]
    fn test_description() {
        assert_eq!(
            ConsensusPolicy::require_agreement(2, true).to_string(),
            "require 2 agreement(s), escalate on disagreement"
        );
        assert_eq!(ConsensusPolicy::Disabled.to_string(), "disabled");
    }
}
