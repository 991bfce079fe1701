//! Diesel row models and domain conversions for tracking persistence.

use super::schema::{projects, tasks};
use crate::tracking::{
    domain::{PersistedTaskData, Project, ProjectId, ProjectName, Task, TaskId, UserId},
    ports::{RepositoryError, RepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Internal project identifier.
    pub id: uuid::Uuid,
    /// Project name.
    pub name: String,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Internal project identifier.
    pub id: uuid::Uuid,
    /// Project name.
    pub name: String,
    /// Owning user identifier.
    pub owner_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Continued task, if any.
    pub cloned_from_id: Option<uuid::Uuid>,
    /// Task name.
    pub name: String,
    /// Start of the measured span.
    pub started_at: DateTime<Utc>,
    /// Close timestamp.
    pub ended_at: Option<DateTime<Utc>>,
    /// Accumulated pause seconds.
    pub seconds_paused: i64,
    /// Pause timestamp.
    pub paused_at: Option<DateTime<Utc>>,
}

/// Insert model for task records. `position` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Continued task, if any.
    pub cloned_from_id: Option<uuid::Uuid>,
    /// Task name.
    pub name: String,
    /// Start of the measured span.
    pub started_at: DateTime<Utc>,
    /// Close timestamp.
    pub ended_at: Option<DateTime<Utc>>,
    /// Accumulated pause seconds.
    pub seconds_paused: i64,
    /// Pause timestamp.
    pub paused_at: Option<DateTime<Utc>>,
}

/// Lifecycle columns rewritten by task transitions.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskLifecycleChangeset {
    /// Start of the measured span.
    pub started_at: DateTime<Utc>,
    /// Close timestamp.
    pub ended_at: Option<DateTime<Utc>>,
    /// Accumulated pause seconds.
    pub seconds_paused: i64,
    /// Pause timestamp.
    pub paused_at: Option<DateTime<Utc>>,
}

impl NewProjectRow {
    /// Builds an insert row from a domain project.
    #[must_use]
    pub fn from_domain(project: &Project) -> Self {
        Self {
            id: project.id().into_inner(),
            name: project.name().as_str().to_owned(),
            owner_id: project.owner().into_inner(),
            created_at: project.created_at(),
        }
    }
}

impl ProjectRow {
    /// Reconstructs the domain project.
    pub fn into_domain(self) -> RepositoryResult<Project> {
        let name = ProjectName::new(self.name).map_err(RepositoryError::invalid_persisted_data)?;
        Ok(Project::from_persisted(
            ProjectId::from_uuid(self.id),
            name,
            UserId::from_uuid(self.owner_id),
            self.created_at,
        ))
    }
}

impl NewTaskRow {
    /// Builds an insert row from a domain task.
    pub fn try_from_domain(task: &Task) -> RepositoryResult<Self> {
        Ok(Self {
            id: task.id().into_inner(),
            project_id: task.project_id().into_inner(),
            cloned_from_id: task.cloned_from().map(TaskId::into_inner),
            name: task.name().to_owned(),
            started_at: task.started_at(),
            ended_at: task.ended_at(),
            seconds_paused: seconds_to_column(task.seconds_paused())?,
            paused_at: task.paused_at(),
        })
    }
}

impl TaskLifecycleChangeset {
    /// Builds the lifecycle changeset from a domain task.
    pub fn try_from_domain(task: &Task) -> RepositoryResult<Self> {
        Ok(Self {
            started_at: task.started_at(),
            ended_at: task.ended_at(),
            seconds_paused: seconds_to_column(task.seconds_paused())?,
            paused_at: task.paused_at(),
        })
    }
}

impl TaskRow {
    /// Reconstructs the domain task.
    pub fn into_domain(self) -> RepositoryResult<Task> {
        let seconds_paused =
            u64::try_from(self.seconds_paused).map_err(RepositoryError::invalid_persisted_data)?;
        Task::from_persisted(PersistedTaskData {
            id: TaskId::from_uuid(self.id),
            project_id: ProjectId::from_uuid(self.project_id),
            cloned_from: self.cloned_from_id.map(TaskId::from_uuid),
            name: self.name,
            started_at: self.started_at,
            ended_at: self.ended_at,
            seconds_paused,
            paused_at: self.paused_at,
        })
        .map_err(RepositoryError::invalid_persisted_data)
    }
}

fn seconds_to_column(seconds: u64) -> RepositoryResult<i64> {
    i64::try_from(seconds).map_err(RepositoryError::invalid_persisted_data)
}
