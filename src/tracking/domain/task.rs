//! Task aggregate root, its lifecycle state machine, and time accounting.

use super::{ParseTaskStateError, ProjectId, SpendTime, TaskId, TrackingDomainError};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Name given to tasks created without one.
pub const DEFAULT_TASK_NAME: &str = "Unnamed task";

/// Maximum length for a task name, matching the `VARCHAR(250)` column.
const MAX_NAME_LENGTH: usize = 250;

/// Task lifecycle state derived from the task's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Time is accruing.
    Running,
    /// Work is temporarily paused.
    Paused,
    /// The task has ended. Only a continuation can follow.
    Closed,
}

impl TaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }

    /// Returns whether no further lifecycle transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// What the task is currently doing, carrying the timestamp that marks the
/// end of its measured span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskActivity {
    /// Time is accruing.
    Running,
    /// Paused since `paused_at`.
    Paused {
        /// Instant the pause began.
        paused_at: DateTime<Utc>,
    },
    /// Ended at `ended_at`.
    Closed {
        /// Instant the task was closed.
        ended_at: DateTime<Utc>,
    },
}

impl TaskActivity {
    /// Returns the lifecycle state for this activity.
    #[must_use]
    pub const fn state(self) -> TaskState {
        match self {
            Self::Running => TaskState::Running,
            Self::Paused { .. } => TaskState::Paused,
            Self::Closed { .. } => TaskState::Closed,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    cloned_from: Option<TaskId>,
    name: String,
    started_at: DateTime<Utc>,
    seconds_paused: u64,
    activity: TaskActivity,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Task this one continues, if any.
    pub cloned_from: Option<TaskId>,
    /// Persisted task name.
    pub name: String,
    /// Start of the measured span.
    pub started_at: DateTime<Utc>,
    /// Close timestamp, if closed.
    pub ended_at: Option<DateTime<Utc>>,
    /// Accumulated pause time in whole seconds.
    pub seconds_paused: u64,
    /// Pause timestamp, if paused.
    pub paused_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a running task in `project_id`, started now.
    ///
    /// A missing or blank name falls back to [`DEFAULT_TASK_NAME`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::TaskNameTooLong`] when the name exceeds
    /// 250 characters.
    pub fn new(
        project_id: ProjectId,
        name: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, TrackingDomainError> {
        Ok(Self {
            id: TaskId::new(),
            project_id,
            cloned_from: None,
            name: normalize_name(name)?,
            started_at: clock.utc(),
            seconds_paused: 0,
            activity: TaskActivity::Running,
        })
    }

    /// Creates a running continuation of a closed task.
    ///
    /// The new task keeps the source's name and project and records the
    /// source in `cloned_from`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::TaskStillOpen`] when `source` is not
    /// closed.
    pub fn continue_from(source: &Self, clock: &impl Clock) -> Result<Self, TrackingDomainError> {
        if !source.is_closed() {
            return Err(TrackingDomainError::TaskStillOpen(source.id));
        }

        Ok(Self {
            id: TaskId::new(),
            project_id: source.project_id,
            cloned_from: Some(source.id),
            name: source.name.clone(),
            started_at: clock.utc(),
            seconds_paused: 0,
            activity: TaskActivity::Running,
        })
    }

    /// Closes a freshly created task `duration` after its start.
    #[must_use]
    pub fn with_duration(mut self, duration: TimeDelta) -> Self {
        self.activity = TaskActivity::Closed {
            ended_at: self.started_at + duration,
        };
        self
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::PausedAndClosed`] when both `ended_at`
    /// and `paused_at` are set.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TrackingDomainError> {
        let activity = match (data.ended_at, data.paused_at) {
            (None, None) => TaskActivity::Running,
            (None, Some(paused_at)) => TaskActivity::Paused { paused_at },
            (Some(ended_at), None) => TaskActivity::Closed { ended_at },
            (Some(_), Some(_)) => return Err(TrackingDomainError::PausedAndClosed(data.id)),
        };

        Ok(Self {
            id: data.id,
            project_id: data.project_id,
            cloned_from: data.cloned_from,
            name: data.name,
            started_at: data.started_at,
            seconds_paused: data.seconds_paused,
            activity,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task this one continues, if any.
    #[must_use]
    pub const fn cloned_from(&self) -> Option<TaskId> {
        self.cloned_from
    }

    /// Returns whether this task is not a continuation.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.cloned_from.is_none()
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the start of the measured span.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the close timestamp, if closed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        match self.activity {
            TaskActivity::Closed { ended_at } => Some(ended_at),
            _ => None,
        }
    }

    /// Returns the pause timestamp, if paused.
    #[must_use]
    pub const fn paused_at(&self) -> Option<DateTime<Utc>> {
        match self.activity {
            TaskActivity::Paused { paused_at } => Some(paused_at),
            _ => None,
        }
    }

    /// Returns the accumulated pause time in whole seconds.
    #[must_use]
    pub const fn seconds_paused(&self) -> u64 {
        self.seconds_paused
    }

    /// Returns the current activity.
    #[must_use]
    pub const fn activity(&self) -> TaskActivity {
        self.activity
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.activity.state()
    }

    /// Returns whether the task is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self.activity, TaskActivity::Paused { .. })
    }

    /// Returns whether the task is closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.activity, TaskActivity::Closed { .. })
    }

    /// Returns whether the task is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.activity, TaskActivity::Running)
    }

    /// Whole seconds from `started_at` to the end of the measured span.
    ///
    /// The span ends at `ended_at` when closed, at `paused_at` when paused,
    /// and at the current time otherwise. `seconds_paused` is not
    /// subtracted, so this is wall-clock time rather than active time.
    #[must_use]
    pub fn elapsed_seconds(&self, clock: &impl Clock) -> u64 {
        let reference_end = match self.activity {
            TaskActivity::Closed { ended_at } => ended_at,
            TaskActivity::Paused { paused_at } => paused_at,
            TaskActivity::Running => clock.utc(),
        };
        whole_seconds(reference_end - self.started_at)
    }

    /// Returns [`Self::elapsed_seconds`] as a formattable spend time.
    #[must_use]
    pub fn spend_time(&self, clock: &impl Clock) -> SpendTime {
        SpendTime::from_seconds(self.elapsed_seconds(clock))
    }

    /// Pauses a running task. Pausing a paused task does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::TaskAlreadyClosed`] when closed.
    pub fn pause(&mut self, clock: &impl Clock) -> Result<(), TrackingDomainError> {
        match self.activity {
            TaskActivity::Closed { .. } => Err(self.already_closed()),
            TaskActivity::Paused { .. } => Ok(()),
            TaskActivity::Running => {
                self.activity = TaskActivity::Paused {
                    paused_at: clock.utc(),
                };
                Ok(())
            }
        }
    }

    /// Resumes a paused task, crediting the pause to `seconds_paused`.
    ///
    /// Only the whole-second part of the pause is credited. Resuming a
    /// running task does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::TaskAlreadyClosed`] when closed.
    pub fn unpause(&mut self, clock: &impl Clock) -> Result<(), TrackingDomainError> {
        match self.activity {
            TaskActivity::Closed { .. } => Err(self.already_closed()),
            TaskActivity::Running => Ok(()),
            TaskActivity::Paused { paused_at } => {
                let paused_for = whole_seconds(clock.utc() - paused_at);
                self.seconds_paused = self.seconds_paused.saturating_add(paused_for);
                self.activity = TaskActivity::Running;
                Ok(())
            }
        }
    }

    /// Pauses a running task or resumes a paused one.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::TaskAlreadyClosed`] when closed.
    pub fn toggle_pause(&mut self, clock: &impl Clock) -> Result<(), TrackingDomainError> {
        if self.is_paused() {
            self.unpause(clock)
        } else {
            self.pause(clock)
        }
    }

    /// Closes the task, resuming it first if paused.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::TaskAlreadyClosed`] when closed.
    pub fn close(&mut self, clock: &impl Clock) -> Result<(), TrackingDomainError> {
        self.unpause(clock)?;
        self.activity = TaskActivity::Closed {
            ended_at: clock.utc(),
        };
        Ok(())
    }

    /// Rewinds an open task to a fresh running state starting now.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::TaskAlreadyClosed`] when closed.
    pub fn restart(&mut self, clock: &impl Clock) -> Result<(), TrackingDomainError> {
        if self.is_closed() {
            return Err(self.already_closed());
        }
        self.started_at = clock.utc();
        self.seconds_paused = 0;
        self.activity = TaskActivity::Running;
        Ok(())
    }

    const fn already_closed(&self) -> TrackingDomainError {
        TrackingDomainError::TaskAlreadyClosed(self.id)
    }
}

fn normalize_name(name: Option<String>) -> Result<String, TrackingDomainError> {
    let Some(raw) = name else {
        return Ok(DEFAULT_TASK_NAME.to_owned());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_TASK_NAME.to_owned());
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(TrackingDomainError::TaskNameTooLong(raw));
    }
    Ok(trimmed.to_owned())
}

/// Truncates a span to whole seconds, clamping negative spans to zero.
fn whole_seconds(span: TimeDelta) -> u64 {
    u64::try_from(span.num_seconds()).unwrap_or(0)
}
