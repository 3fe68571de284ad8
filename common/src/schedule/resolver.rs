// Assignment resolution: rebuild a weekly timetable from group schedules
//
// Each assignment runs through an ordered pipeline of strategies and keeps
// the first non-empty result. Failures never abort the other assignments.

use crate::cache::GroupScheduleCache;
use crate::models::{
    canonical, AssignmentOrigin, GroupSchedule, SessionKind, SessionSlot, SubjectAssignment,
    WeeklySchedule,
};
use crate::schedule::{generator, sorter};
use crate::telemetry;
use std::sync::Arc;
use tracing::{debug, info};

/// A way of finding sessions for one assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Sessions of the pinned professor for the subject, in any group
    ExactProfessor,
    /// The target group's sessions for the subject, re-taught by the pinned professor
    TemplateAdaptation,
    /// Deterministic placeholder sessions
    Synthetic,
    /// The target group's own sessions for the subject and professor
    GroupMatch,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ExactProfessor => "exact_professor",
            Strategy::TemplateAdaptation => "template_adaptation",
            Strategy::Synthetic => "synthetic",
            Strategy::GroupMatch => "group_match",
        }
    }
}

/// Priority order for pinned professors
pub static FORCED_PIPELINE: [Strategy; 3] = [
    Strategy::ExactProfessor,
    Strategy::TemplateAdaptation,
    Strategy::Synthetic,
];

/// Assignments inherited from a group only accept that group's sessions
pub static GROUP_PIPELINE: [Strategy; 1] = [Strategy::GroupMatch];

/// Pipeline that applies to an origin; `None` means the assignment is skipped.
pub fn pipeline_for(origin: &AssignmentOrigin) -> Option<&'static [Strategy]> {
    match origin {
        AssignmentOrigin::Forced => Some(&FORCED_PIPELINE[..]),
        AssignmentOrigin::FromGroup(_) => Some(&GROUP_PIPELINE[..]),
        AssignmentOrigin::Automatic => None,
    }
}

/// Canonical lookup keys of one assignment, built once.
#[derive(Debug, Clone)]
pub struct MatchKeys {
    pub subject: String,
    pub professor: String,
}

impl MatchKeys {
    pub fn of(assignment: &SubjectAssignment) -> Self {
        Self {
            subject: canonical(assignment.subject()),
            professor: canonical(assignment.professor()),
        }
    }
}

/// Sessions of `schedule` for the subject, taught by anyone.
pub fn subject_sessions(schedule: &[SessionSlot], keys: &MatchKeys) -> Vec<SessionSlot> {
    schedule
        .iter()
        .filter(|slot| slot.teaches(&keys.subject))
        .cloned()
        .collect()
}

/// Sessions of `schedule` for the subject taught by the assignment's professor.
pub fn professor_sessions(schedule: &[SessionSlot], keys: &MatchKeys) -> Vec<SessionSlot> {
    schedule
        .iter()
        .filter(|slot| slot.teaches(&keys.subject) && slot.taught_by(&keys.professor))
        .cloned()
        .collect()
}

/// Overwrite what a borrowed session says with what the assignment says.
///
/// Subject, professor and rating always come from the assignment; pinned
/// assignments also turn every session `Forced`.
pub fn stamp(sessions: Vec<SessionSlot>, assignment: &SubjectAssignment) -> Vec<SessionSlot> {
    let forced = assignment.origin().is_forced();
    sessions
        .into_iter()
        .map(|mut slot| {
            slot.subject = assignment.subject().to_string();
            slot.professor = assignment.professor().to_string();
            slot.rating = assignment.rating();
            if forced {
                slot.kind = SessionKind::Forced;
            }
            slot
        })
        .collect()
}

fn non_empty(sessions: Vec<SessionSlot>) -> Option<Vec<SessionSlot>> {
    if sessions.is_empty() {
        None
    } else {
        Some(sessions)
    }
}

/// Rebuilds weekly timetables from the schedules held by a [`GroupScheduleCache`].
pub struct AssignmentResolver {
    cache: Arc<GroupScheduleCache>,
}

impl AssignmentResolver {
    pub fn new(cache: Arc<GroupScheduleCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<GroupScheduleCache> {
        &self.cache
    }

    /// Resolve every assignment and return the canonically sorted result.
    ///
    /// Assignments are processed one at a time in input order. Returns
    /// `None` when no assignment produced any session.
    #[tracing::instrument(skip_all, fields(assignments = assignments.len()))]
    pub async fn resolve(&self, assignments: &[SubjectAssignment]) -> Option<WeeklySchedule> {
        let mut accumulated = Vec::new();

        for assignment in assignments {
            accumulated.extend(self.resolve_assignment(assignment).await);
        }

        if accumulated.is_empty() {
            info!("No sessions resolved for any assignment");
            return None;
        }

        info!(sessions = accumulated.len(), "Weekly schedule resolved");
        Some(sorter::sort(accumulated))
    }

    /// Sessions for a single assignment, empty when nothing applies.
    #[tracing::instrument(
        skip_all,
        fields(subject = %assignment.subject(), professor = %assignment.professor())
    )]
    pub async fn resolve_assignment(&self, assignment: &SubjectAssignment) -> Vec<SessionSlot> {
        let Some(pipeline) = pipeline_for(assignment.origin()) else {
            // Automatic assignments carry no group affinity to search from
            info!("Skipping assignment without group affinity");
            telemetry::record_skipped("automatic_origin");
            return Vec::new();
        };

        let keys = MatchKeys::of(assignment);
        let target = self.target_schedule(assignment, &keys).await;

        // Pinned assignments still run their pipeline: the cross-group search
        // and the synthetic fallback do not need a target group
        if target.is_none() && !assignment.origin().is_forced() {
            info!("Skipping assignment: target group has no schedule");
            telemetry::record_skipped("no_group_schedule");
            return Vec::new();
        }

        let target = target.unwrap_or_default();
        for &strategy in pipeline {
            if let Some(found) = self.attempt(strategy, assignment, &keys, &target).await {
                debug!(strategy = strategy.as_str(), sessions = found.len(), "Strategy matched");
                telemetry::record_resolved(strategy.as_str());
                return stamp(found, assignment);
            }
            debug!(strategy = strategy.as_str(), "Strategy found nothing");
        }

        info!("Skipping assignment: no matching sessions");
        telemetry::record_skipped("no_matching_sessions");
        Vec::new()
    }

    /// Run one strategy; `None` unless it found at least one session.
    async fn attempt(
        &self,
        strategy: Strategy,
        assignment: &SubjectAssignment,
        keys: &MatchKeys,
        target: &[SessionSlot],
    ) -> Option<Vec<SessionSlot>> {
        match strategy {
            Strategy::ExactProfessor => self.exact_professor_sessions(keys).await,
            Strategy::TemplateAdaptation => non_empty(subject_sessions(target, keys)),
            Strategy::Synthetic => non_empty(generator::generate(
                assignment.subject(),
                assignment.professor(),
                assignment.duration_minutes(),
            )),
            Strategy::GroupMatch => non_empty(professor_sessions(target, keys)),
        }
    }

    /// Name of the group whose schedule is consulted for this assignment.
    ///
    /// Pinned assignments use the first listed group carrying the subject;
    /// inherited ones use their origin group.
    pub async fn target_group(&self, assignment: &SubjectAssignment) -> Option<String> {
        self.target_group_for(assignment, &MatchKeys::of(assignment))
            .await
    }

    async fn target_group_for(
        &self,
        assignment: &SubjectAssignment,
        keys: &MatchKeys,
    ) -> Option<String> {
        match assignment.origin() {
            AssignmentOrigin::FromGroup(name) => Some(name.clone()),
            AssignmentOrigin::Forced => {
                let listing = self.cache.get_all_groups().await?;
                listing
                    .iter()
                    .find(|(_, subjects)| {
                        subjects
                            .iter()
                            .any(|entry| canonical(&entry.subject) == keys.subject)
                    })
                    .map(|(name, _)| name.clone())
            }
            AssignmentOrigin::Automatic => None,
        }
    }

    /// Target group's sessions, `None` when there is no target or its schedule is absent or empty.
    async fn target_schedule(
        &self,
        assignment: &SubjectAssignment,
        keys: &MatchKeys,
    ) -> Option<GroupSchedule> {
        let Some(group) = self.target_group_for(assignment, keys).await else {
            debug!("No target group determined");
            return None;
        };

        let schedule = self.cache.get(&group).await?;
        if schedule.is_empty() {
            debug!(group = %group, "Target group schedule is empty");
            return None;
        }

        debug!(group = %group, sessions = schedule.len(), "Target group schedule loaded");
        Some(schedule)
    }

    /// Search every listed group that carries the subject with the pinned
    /// professor, fetching their schedules one at a time, and return the
    /// matching sessions of the first group that has any.
    pub async fn exact_professor_sessions(&self, keys: &MatchKeys) -> Option<Vec<SessionSlot>> {
        let listing = self.cache.get_all_groups().await?;

        let candidates = listing.iter().filter(|(_, subjects)| {
            subjects.iter().any(|entry| {
                canonical(&entry.subject) == keys.subject
                    && canonical(&entry.professor) == keys.professor
            })
        });

        for (group, _) in candidates {
            let Some(schedule) = self.cache.get(group).await else {
                continue;
            };

            let found = professor_sessions(&schedule, keys);
            if !found.is_empty() {
                debug!(group = %group, sessions = found.len(), "Pinned professor found");
                return Some(found);
            }
        }

        None
    }
}
