//! Analytics use case
//!
//! Computes an [`AnalyticsSnapshot`] over a project's stage history. Pure and
//! read-only: the caller supplies the project and its stages (typically from
//! [`ReviewWorkflowUseCase::load_history`](super::review_workflow::ReviewWorkflowUseCase::load_history)).

use screening_domain::analytics::{mean, ratio};
use screening_domain::{
    AnalyticsSnapshot, ConflictRates, ConflictState, DecisionTally, PrismaFlow, ReviewProject,
    ReviewStage, ReviewerId, ReviewerLoad, ScreeningAssignment, ScreeningDecision, StageProgress,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Predicate selecting which stages enter a snapshot
pub type StagePredicate = Box<dyn Fn(&ReviewStage) -> bool + Send + Sync>;

/// Predicate selecting which assignments enter a snapshot
pub type AssignmentPredicate = Box<dyn Fn(&ScreeningAssignment) -> bool + Send + Sync>;

/// Inclusive time window applied to assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineFilter {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimelineFilter {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Window length in (fractional) days
    pub fn duration_days(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / SECONDS_PER_DAY
    }
}

/// Options for [`AnalyticsService::create_snapshot`]
pub struct AnalyticsOptions {
    /// Reference time for throughput windows and the snapshot timestamp
    pub as_of: DateTime<Utc>,
    pub stage_filter: Option<StagePredicate>,
    pub assignment_filter: Option<AssignmentPredicate>,
    /// Restricts assignments to those assigned within the window and sets
    /// the throughput window
    pub timeline: Option<TimelineFilter>,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self::as_of(Utc::now())
    }
}

impl AnalyticsOptions {
    pub fn as_of(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            stage_filter: None,
            assignment_filter: None,
            timeline: None,
        }
    }

    pub fn with_stage_filter(
        mut self,
        filter: impl Fn(&ReviewStage) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.stage_filter = Some(Box::new(filter));
        self
    }

    pub fn with_assignment_filter(
        mut self,
        filter: impl Fn(&ScreeningAssignment) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.assignment_filter = Some(Box::new(filter));
        self
    }

    pub fn with_timeline(mut self, timeline: TimelineFilter) -> Self {
        self.timeline = Some(timeline);
        self
    }

    fn accepts_stage(&self, stage: &ReviewStage) -> bool {
        self.stage_filter.as_ref().is_none_or(|f| f(stage))
    }

    fn accepts_assignment(&self, assignment: &ScreeningAssignment) -> bool {
        self.assignment_filter.as_ref().is_none_or(|f| f(assignment))
            && self
                .timeline
                .is_none_or(|t| t.contains(assignment.assigned_at()))
    }
}

/// A stage together with the assignments that passed the filters
struct StageView<'a> {
    stage: &'a ReviewStage,
    assignments: Vec<&'a ScreeningAssignment>,
}

impl StageView<'_> {
    fn tally(&self) -> DecisionTally {
        DecisionTally::from_assignments(self.assignments.iter().copied())
    }

    fn is_screened(&self) -> bool {
        self.stage.is_complete() || self.tally().all_terminal()
    }
}

/// Read-only metrics over review history
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Build a snapshot of `project` from `stages`
    ///
    /// Stages of other projects are ignored.
    pub fn create_snapshot(
        &self,
        project: &ReviewProject,
        stages: &[ReviewStage],
        options: &AnalyticsOptions,
    ) -> AnalyticsSnapshot {
        let views: Vec<StageView<'_>> = stages
            .iter()
            .filter(|s| s.project_id() == project.id() && options.accepts_stage(s))
            .map(|stage| StageView {
                stage,
                assignments: stage
                    .assignments()
                    .iter()
                    .filter(|a| options.accepts_assignment(a))
                    .collect(),
            })
            .collect();

        debug!(
            "Computing analytics for project {} over {} of {} stage(s)",
            project.id(),
            views.len(),
            stages.len()
        );

        AnalyticsSnapshot {
            project_id: project.id().clone(),
            generated_at: options.as_of,
            stage_progress: stage_progress(project, &views),
            reviewer_load: reviewer_load(&views, options),
            conflict_rates: conflict_rates(&views),
            prisma_flow: prisma_flow(&views),
        }
    }
}

fn stage_progress(project: &ReviewProject, views: &[StageView<'_>]) -> Vec<StageProgress> {
    project
        .definitions()
        .iter()
        .map(|definition| {
            let instances: Vec<&StageView<'_>> = views
                .iter()
                .filter(|v| v.stage.definition_id() == definition.id())
                .collect();
            let completed = instances.iter().filter(|v| v.stage.is_complete()).count();
            let reviewer_completion = mean(instances.iter().map(|v| {
                let required = v.stage.definition().requirement().total_required();
                ratio(v.tally().terminal(), required).clamp(0.0, 1.0)
            }));

            StageProgress {
                definition_id: definition.id().clone(),
                name: definition.name().to_string(),
                stage_type: definition.stage_type(),
                total_instances: instances.len(),
                completed_instances: completed,
                completion_rate: ratio(completed, instances.len()),
                average_reviewer_completion: reviewer_completion,
            }
        })
        .collect()
}

fn reviewer_load(views: &[StageView<'_>], options: &AnalyticsOptions) -> Vec<ReviewerLoad> {
    let mut by_reviewer: BTreeMap<&ReviewerId, Vec<&ScreeningAssignment>> = BTreeMap::new();
    for assignment in views.iter().flat_map(|v| v.assignments.iter().copied()) {
        by_reviewer
            .entry(assignment.reviewer_id())
            .or_default()
            .push(assignment);
    }

    let mut loads: Vec<ReviewerLoad> = by_reviewer
        .into_iter()
        .map(|(reviewer_id, assignments)| {
            let active = assignments.iter().filter(|a| a.status().is_active()).count();
            let completed = assignments.iter().filter(|a| a.is_terminal()).count();
            let latency = mean(assignments.iter().filter_map(|a| a.decision_latency_hours()));

            let window_days = match options.timeline {
                Some(timeline) if timeline.duration_days() > 0.0 => timeline.duration_days(),
                Some(_) => 1.0,
                None => {
                    let earliest = assignments
                        .iter()
                        .map(|a| a.assigned_at())
                        .min()
                        .unwrap_or(options.as_of);
                    ((options.as_of - earliest).num_seconds() as f64 / SECONDS_PER_DAY).max(1.0)
                }
            };

            ReviewerLoad {
                reviewer_id: reviewer_id.clone(),
                active_assignments: active,
                completed_assignments: completed,
                average_decision_latency_hours: latency,
                throughput_per_day: completed as f64 / window_days,
            }
        })
        .collect();

    loads.sort_by(|a, b| {
        b.active_assignments
            .cmp(&a.active_assignments)
            .then_with(|| a.reviewer_id.cmp(&b.reviewer_id))
    });
    loads
}

fn conflict_rates(views: &[StageView<'_>]) -> ConflictRates {
    let count = |state: ConflictState| {
        views
            .iter()
            .filter(|v| v.stage.conflict_state() == state)
            .count()
    };

    let total = views.len();
    let conflicts = views
        .iter()
        .filter(|v| v.stage.conflict_state().is_terminal())
        .count();
    let open_conflicts = views
        .iter()
        .filter(|v| v.stage.conflict_state().is_open_conflict())
        .count();
    let escalated = count(ConflictState::Escalated);
    let resolved = count(ConflictState::Resolved);

    ConflictRates {
        total_stages: total,
        conflict_count: conflicts,
        escalated_count: escalated,
        resolved_count: resolved,
        open_conflicts,
        conflict_rate: ratio(conflicts, total),
        escalation_rate: ratio(escalated, total),
        resolution_rate: ratio(resolved, conflicts),
    }
}

fn prisma_flow(views: &[StageView<'_>]) -> PrismaFlow {
    let mut flow = PrismaFlow::default();

    for view in views
        .iter()
        .filter(|v| v.stage.definition().stage_type().counts_toward_prisma())
    {
        flow.records_identified += 1;
        if view.stage.conflict_state() == ConflictState::Escalated {
            flow.records_escalated += 1;
        }
        if !view.is_screened() {
            continue;
        }
        flow.records_screened += 1;

        let verdict = match view.stage.outcome() {
            Some(outcome) if outcome.approved => Some(ScreeningDecision::Included),
            Some(_) => Some(ScreeningDecision::Excluded),
            None => view.tally().unanimous_decision(),
        };
        match verdict {
            Some(ScreeningDecision::Included) => flow.records_included += 1,
            Some(ScreeningDecision::Excluded) => flow.records_excluded += 1,
            None => {}
        }
    }

    flow.records_pending = flow.records_identified.saturating_sub(flow.records_screened);
    flow
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use screening_domain::{
        AssignmentRequest, AssignmentStatus, ConsensusPolicy, ReviewerDecision, ReviewerRequirement,
        ReviewerRole, StageDefinition, StageDefinitionId, StageType,
    };

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn project() -> ReviewProject {
        let pair = || {
            ReviewerRequirement::new([(ReviewerRole::Primary, 1), (ReviewerRole::Secondary, 1)])
                .unwrap()
        };
        ReviewProject::new(
            "p1",
            "Statins review",
            t0(),
            vec![
                StageDefinition::new(
                    "title",
                    "Title screening",
                    StageType::TitleScreening,
                    pair(),
                    ConsensusPolicy::require_agreement(2, true),
                )
                .unwrap(),
                StageDefinition::new(
                    "full-text",
                    "Full-text review",
                    StageType::FullTextReview,
                    pair(),
                    ConsensusPolicy::require_agreement(2, false),
                )
                .unwrap(),
                StageDefinition::new(
                    "extraction",
                    "Data extraction",
                    StageType::DataExtraction,
                    pair(),
                    ConsensusPolicy::Disabled,
                )
                .unwrap(),
            ],
        )
        .unwrap()
    }

    /// A stage of `definition` reviewed by alice and bob, with the given
    /// verdicts recorded `hours` after activation
    fn stage(
        project: &ReviewProject,
        definition: &str,
        verdicts: [Option<AssignmentStatus>; 2],
        hours: i64,
    ) -> ReviewStage {
        let definition = project
            .definition(&StageDefinitionId::new(definition))
            .unwrap();
        let requests = [
            AssignmentRequest::new("alice", ReviewerRole::Primary),
            AssignmentRequest::new("bob", ReviewerRole::Secondary),
        ];
        let stage = ReviewStage::create(project.id().clone(), definition, &requests, t0()).unwrap();
        let decided_at = t0() + Duration::hours(hours);

        let assignments = stage
            .assignments()
            .iter()
            .zip(verdicts)
            .map(|(assignment, verdict)| match verdict {
                Some(status) => assignment.with_decision(ReviewerDecision::new(
                    assignment.id().clone(),
                    assignment.reviewer_id().clone(),
                    ScreeningDecision::try_from(status).unwrap(),
                    decided_at,
                )),
                None => assignment.clone(),
            })
            .collect();
        let stage = stage.with_assignments(assignments).unwrap();
        match stage.apply_quorum(decided_at) {
            Some((next, _)) => next,
            None => stage,
        }
    }

    const IN: Option<AssignmentStatus> = Some(AssignmentStatus::Included);
    const EX: Option<AssignmentStatus> = Some(AssignmentStatus::Excluded);

    fn snapshot(project: &ReviewProject, stages: &[ReviewStage], options: AnalyticsOptions) -> AnalyticsSnapshot {
        AnalyticsService::new().create_snapshot(project, stages, &options)
    }

    #[test]
    fn test_prisma_flow_over_completed_screening_stages() {
        let project = project();
        let stages = vec![
            stage(&project, "title", [IN, IN], 2),
            stage(&project, "title", [EX, EX], 2),
            stage(&project, "title", [IN, EX], 2),
            stage(&project, "full-text", [IN, IN], 4),
        ];

        let snapshot = snapshot(&project, &stages, AnalyticsOptions::as_of(t0() + Duration::days(2)));
        let flow = snapshot.prisma_flow;

        assert_eq!(flow.records_identified, 4);
        assert_eq!(flow.records_screened, 4);
        assert_eq!(flow.records_escalated, 1);
        assert_eq!(flow.records_included, 2);
        assert_eq!(flow.records_excluded, 1);
        assert_eq!(flow.records_pending, 0);
    }

    #[test]
    fn test_prisma_ignores_other_stage_types_and_counts_pending() {
        let project = project();
        let stages = vec![
            stage(&project, "title", [IN, None], 1),
            stage(&project, "extraction", [IN, IN], 1),
        ];

        let flow = snapshot(&project, &stages, AnalyticsOptions::as_of(t0())).prisma_flow;
        assert_eq!(flow.records_identified, 1);
        assert_eq!(flow.records_screened, 0);
        assert_eq!(flow.records_pending, 1);
    }

    #[test]
    fn test_stage_with_every_assignment_filtered_out_counts_as_screened() {
        let project = project();
        let stages = vec![stage(&project, "title", [None, None], 1)];

        let options = AnalyticsOptions::as_of(t0()).with_assignment_filter(|_| false);
        let flow = snapshot(&project, &stages, options).prisma_flow;
        assert_eq!(flow.records_identified, 1);
        assert_eq!(flow.records_screened, 1);
        assert_eq!(flow.records_pending, 0);
        assert_eq!(flow.records_included + flow.records_excluded, 0);
    }

    #[test]
    fn test_stage_progress_in_project_order() {
        let project = project();
        let stages = vec![
            stage(&project, "full-text", [IN, IN], 1),
            stage(&project, "title", [IN, None], 1),
            stage(&project, "title", [IN, IN], 1),
        ];

        let progress = snapshot(&project, &stages, AnalyticsOptions::as_of(t0())).stage_progress;
        let ids: Vec<&str> = progress.iter().map(|p| p.definition_id.as_str()).collect();
        assert_eq!(ids, ["title", "full-text", "extraction"]);

        let title = &progress[0];
        assert_eq!(title.total_instances, 2);
        assert_eq!(title.completed_instances, 1);
        assert_eq!(title.completion_rate, 0.5);
        assert_eq!(title.average_reviewer_completion, 0.75);

        let extraction = &progress[2];
        assert_eq!(extraction.total_instances, 0);
        assert_eq!(extraction.completion_rate, 0.0);
        assert_eq!(extraction.average_reviewer_completion, 0.0);
    }

    #[test]
    fn test_conflict_rates() {
        let project = project();
        let stages = vec![
            stage(&project, "title", [IN, IN], 1),
            stage(&project, "title", [IN, EX], 1),
            stage(&project, "full-text", [IN, EX], 1),
            stage(&project, "full-text", [None, None], 1),
        ];

        let rates = snapshot(&project, &stages, AnalyticsOptions::as_of(t0())).conflict_rates;
        assert_eq!(rates.total_stages, 4);
        assert_eq!(rates.conflict_count, 3);
        assert_eq!(rates.escalated_count, 1);
        assert_eq!(rates.resolved_count, 1);
        assert_eq!(rates.open_conflicts, 2);
        assert_eq!(rates.conflict_rate, 0.75);
        assert_eq!(rates.escalation_rate, 0.25);
        assert!((rates.resolution_rate - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_yields_zero_rates() {
        let project = project();
        let snapshot = snapshot(&project, &[], AnalyticsOptions::as_of(t0()));

        assert_eq!(snapshot.conflict_rates, ConflictRates::default());
        assert_eq!(snapshot.prisma_flow, PrismaFlow::default());
        assert!(snapshot.reviewer_load.is_empty());
        assert!(snapshot.stage_progress.iter().all(|p| p.completion_rate == 0.0));
    }

    #[test]
    fn test_reviewer_load_ordering_and_throughput() {
        let project = project();
        let stages = vec![
            stage(&project, "title", [IN, None], 6),
            stage(&project, "title", [IN, None], 6),
            stage(&project, "full-text", [EX, IN], 12),
        ];

        let load = snapshot(&project, &stages, AnalyticsOptions::as_of(t0() + Duration::days(4)))
            .reviewer_load;

        // bob has two open assignments, so he comes first
        assert_eq!(load[0].reviewer_id.as_str(), "bob");
        assert_eq!(load[0].active_assignments, 2);
        assert_eq!(load[0].completed_assignments, 1);
        assert_eq!(load[0].average_decision_latency_hours, 12.0);
        assert_eq!(load[0].throughput_per_day, 0.25);

        assert_eq!(load[1].reviewer_id.as_str(), "alice");
        assert_eq!(load[1].active_assignments, 0);
        assert_eq!(load[1].completed_assignments, 3);
        assert_eq!(load[1].average_decision_latency_hours, 8.0);
        assert_eq!(load[1].throughput_per_day, 0.75);
    }

    #[test]
    fn test_throughput_window_is_at_least_one_day() {
        let project = project();
        let stages = vec![stage(&project, "title", [IN, IN], 1)];

        let load = snapshot(&project, &stages, AnalyticsOptions::as_of(t0() + Duration::hours(2)))
            .reviewer_load;
        assert!(load.iter().all(|l| l.throughput_per_day == 1.0));
    }

    #[test]
    fn test_timeline_filters_assignments_and_sets_window() {
        let project = project();
        let stages = vec![stage(&project, "title", [IN, IN], 1)];

        let inside = TimelineFilter::new(t0() - Duration::days(1), t0() + Duration::days(1));
        let load = snapshot(
            &project,
            &stages,
            AnalyticsOptions::as_of(t0() + Duration::days(30)).with_timeline(inside),
        )
        .reviewer_load;
        assert_eq!(load.len(), 2);
        assert!(load.iter().all(|l| l.throughput_per_day == 0.5));

        let before = TimelineFilter::new(t0() - Duration::days(3), t0() - Duration::days(1));
        let snapshot = snapshot(
            &project,
            &stages,
            AnalyticsOptions::as_of(t0()).with_timeline(before),
        );
        assert!(snapshot.reviewer_load.is_empty());
        // The stage is complete even though none of its assignments are visible
        assert_eq!(snapshot.prisma_flow.records_screened, 1);
        assert_eq!(snapshot.stage_progress[0].average_reviewer_completion, 0.0);
    }

    #[test]
    fn test_stage_and_assignment_predicates() {
        let project = project();
        let stages = vec![
            stage(&project, "title", [IN, IN], 1),
            stage(&project, "full-text", [IN, EX], 1),
        ];

        let options = AnalyticsOptions::as_of(t0())
            .with_stage_filter(|s| s.definition().stage_type() == StageType::TitleScreening)
            .with_assignment_filter(|a| a.reviewer_id().as_str() == "alice");
        let snapshot = snapshot(&project, &stages, options);

        assert_eq!(snapshot.conflict_rates.total_stages, 1);
        assert_eq!(snapshot.reviewer_load.len(), 1);
        assert_eq!(snapshot.reviewer_load[0].reviewer_id.as_str(), "alice");
        assert_eq!(snapshot.stage_progress[0].average_reviewer_completion, 0.5);
    }

    #[test]
    fn test_foreign_project_stages_are_ignored() {
        let project = project();
        let other = ReviewProject::new("p2", "Other", t0(), project.definitions().to_vec()).unwrap();
        let stages = vec![stage(&other, "title", [IN, IN], 1)];

        let snapshot = snapshot(&project, &stages, AnalyticsOptions::as_of(t0()));
        assert_eq!(snapshot.conflict_rates.total_stages, 0);
        assert_eq!(snapshot.project_id, *project.id());
    }
}
