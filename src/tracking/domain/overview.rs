//! Project-level roll-ups of task spend time.

use super::{Project, SpendTime, Task};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Spend time attributed to one root task and its direct continuations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Name of the root task.
    pub name: String,
    /// Elapsed time of the root task plus its direct continuations.
    pub spend_time: SpendTime,
}

/// A project together with its spend time roll-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOverview {
    project: Project,
    total_spend_time: SpendTime,
    task_summaries: Vec<TaskSummary>,
}

impl ProjectOverview {
    /// Computes the roll-ups for `project` from `tasks`.
    ///
    /// Tasks belonging to other projects are ignored. `tasks` must be in
    /// storage order; summaries follow that order.
    #[must_use]
    pub fn build(project: Project, tasks: &[Task], clock: &impl Clock) -> Self {
        let owned: Vec<&Task> = tasks
            .iter()
            .filter(|task| task.project_id() == project.id())
            .collect();

        let total_spend_time = owned.iter().map(|task| task.spend_time(clock)).sum();
        let task_summaries = owned
            .iter()
            .filter(|task| task.is_root())
            .map(|root| summarize_root(root, &owned, clock))
            .collect();

        Self {
            project,
            total_spend_time,
            task_summaries,
        }
    }

    /// Returns the summarised project.
    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Returns the summed elapsed time of every task in the project.
    #[must_use]
    pub const fn total_spend_time(&self) -> SpendTime {
        self.total_spend_time
    }

    /// Returns one summary per root task, in storage order.
    #[must_use]
    pub fn task_summaries(&self) -> &[TaskSummary] {
        &self.task_summaries
    }
}

/// Only direct continuations are attributed to the root; a continuation of
/// a continuation is counted in the project total but not here.
fn summarize_root(root: &Task, tasks: &[&Task], clock: &impl Clock) -> TaskSummary {
    let continuations: SpendTime = tasks
        .iter()
        .filter(|task| task.cloned_from() == Some(root.id()))
        .map(|task| task.spend_time(clock))
        .sum();

    TaskSummary {
        name: root.name().to_owned(),
        spend_time: root.spend_time(clock) + continuations,
    }
}
