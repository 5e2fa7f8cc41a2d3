//! Analytics snapshot types
//!
//! Read-only metrics computed over a project's stage history. The values
//! are produced by the application layer's analytics service; this module
//! only defines their shape and the small ratio helpers they share.

use crate::catalog::StageType;
use crate::core::ids::{ProjectId, ReviewerId, StageDefinitionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress of one stage definition across its instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    pub definition_id: StageDefinitionId,
    pub name: String,
    pub stage_type: StageType,
    pub total_instances: usize,
    pub completed_instances: usize,
    /// completed / total, in [0, 1]
    pub completion_rate: f64,
    /// Mean share of required reviewers that reached a verdict, in [0, 1]
    pub average_reviewer_completion: f64,
}

/// Workload of one reviewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerLoad {
    pub reviewer_id: ReviewerId,
    pub active_assignments: usize,
    pub completed_assignments: usize,
    pub average_decision_latency_hours: f64,
    pub throughput_per_day: f64,
}

/// Disagreement statistics across stages
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConflictRates {
    pub total_stages: usize,
    /// Stages whose conflict state left `None`
    pub conflict_count: usize,
    pub escalated_count: usize,
    pub resolved_count: usize,
    /// Conflict + Escalated
    pub open_conflicts: usize,
    pub conflict_rate: f64,
    pub escalation_rate: f64,
    pub resolution_rate: f64,
}

/// PRISMA-style record flow over screening stages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrismaFlow {
    pub records_identified: usize,
    pub records_screened: usize,
    pub records_included: usize,
    pub records_excluded: usize,
    pub records_escalated: usize,
    pub records_pending: usize,
}

/// Point-in-time metrics for a review project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub project_id: ProjectId,
    pub generated_at: DateTime<Utc>,
    pub stage_progress: Vec<StageProgress>,
    pub reviewer_load: Vec<ReviewerLoad>,
    pub conflict_rates: ConflictRates,
    pub prisma_flow: PrismaFlow,
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Arithmetic mean, or 0 for an empty sequence
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
