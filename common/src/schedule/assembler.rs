// Group-level schedule lookup with resolution and synthetic fallbacks

use crate::cache::GroupScheduleCache;
use crate::models::{AssignmentOrigin, SubjectAssignment, WeeklySchedule};
use crate::schedule::resolver::{stamp, AssignmentResolver};
use crate::schedule::{generator, sorter};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Where an assembled schedule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    /// The group's own schedule as computed by the directory
    Directory,
    /// Rebuilt from the assignments' origin groups
    Resolved,
    /// Generated locally
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledSchedule {
    pub source: ScheduleSource,
    pub sessions: WeeklySchedule,
}

/// Concatenate synthetic schedules for every assignment, stamped and sorted.
///
/// Sessions of different assignments may collide; no conflict resolution
/// is attempted.
pub fn generate_for_group(assignments: &[SubjectAssignment]) -> WeeklySchedule {
    let sessions = assignments
        .iter()
        .flat_map(|assignment| {
            let generated = generator::generate(
                assignment.subject(),
                assignment.professor(),
                assignment.duration_minutes(),
            );
            stamp(generated, assignment)
        })
        .collect();

    sorter::sort(sessions)
}

/// Produces the timetable shown for a group, whatever data is available.
pub struct ScheduleAssembler {
    resolver: AssignmentResolver,
}

impl ScheduleAssembler {
    pub fn new(cache: Arc<GroupScheduleCache>) -> Self {
        Self {
            resolver: AssignmentResolver::new(cache),
        }
    }

    pub fn resolver(&self) -> &AssignmentResolver {
        &self.resolver
    }

    /// Schedule for `group_name`, tried in order:
    /// 1. the group's own schedule from the directory
    /// 2. resolution from origin groups, when any assignment has one
    /// 3. synthetic generation for every assignment
    #[tracing::instrument(skip(self, assignments), fields(assignments = assignments.len()))]
    pub async fn schedule_for_group(
        &self,
        group_name: &str,
        assignments: &[SubjectAssignment],
    ) -> AssembledSchedule {
        if let Some(schedule) = self.resolver.cache().get(group_name).await {
            if !schedule.is_empty() {
                info!(sessions = schedule.len(), "Using directory schedule");
                return AssembledSchedule {
                    source: ScheduleSource::Directory,
                    sessions: sorter::sort(schedule.to_vec()),
                };
            }
        }

        let has_origin_groups = assignments
            .iter()
            .any(|a| matches!(a.origin(), AssignmentOrigin::FromGroup(_)));

        if has_origin_groups {
            if let Some(sessions) = self.resolver.resolve(assignments).await {
                info!(sessions = sessions.len(), "Using schedule resolved from origin groups");
                return AssembledSchedule {
                    source: ScheduleSource::Resolved,
                    sessions,
                };
            }
        }

        let sessions = generate_for_group(assignments);
        info!(sessions = sessions.len(), "Using synthetic schedule");
        AssembledSchedule {
            source: ScheduleSource::Synthetic,
            sessions,
        }
    }
}
