//! Domain model for projects, tasks, and time accounting.
//!
//! The domain owns the task lifecycle state machine and the elapsed-time
//! rules while keeping persistence and clock sources outside its boundary.

mod duration;
mod error;
mod ids;
mod overview;
mod project;
mod spend_time;
mod task;

pub use duration::{PLACEHOLDER_DURATION, parse_clock_duration, resolve_task_duration};
pub use error::{ParseSpendTimeError, ParseTaskStateError, TrackingDomainError};
pub use ids::{ProjectId, TaskId, UserId};
pub use overview::{ProjectOverview, TaskSummary};
pub use project::{Project, ProjectName};
pub use spend_time::SpendTime;
pub use task::{DEFAULT_TASK_NAME, PersistedTaskData, Task, TaskActivity, TaskState};
