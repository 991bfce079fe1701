//! Repository ports for project and task persistence.
//!
//! Ownership of a task is always resolved through its project: a task belongs
//! to a user when its project's owner is that user.

use crate::tracking::domain::{Project, ProjectId, ProjectName, Task, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateProject`] when the project ID
    /// already exists or [`RepositoryError::DuplicateProjectName`] when the
    /// name is already taken by any user.
    async fn store_project(&self, project: &Project) -> RepositoryResult<()>;

    /// Finds a project by identifier regardless of owner.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;

    /// Returns the projects owned by `owner` in creation order.
    async fn list_projects(&self, owner: UserId) -> RepositoryResult<Vec<Project>>;
}

/// Task persistence contract.
///
/// `store_task` and `update_task` are each one atomic unit of work: the
/// running-task check and the write cannot interleave with another write for
/// the same owner. `update_task` also compares the stored task against the
/// copy the caller read, so a write based on an outdated read is rejected.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task belonging to a project owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::RunningTaskExists`] when `task` is running
    /// and `owner` already has a running task,
    /// [`RepositoryError::DuplicateTask`] when the task ID already exists, or
    /// [`RepositoryError::ProjectNotFound`] when the project is missing.
    async fn store_task(&self, owner: UserId, task: &Task) -> RepositoryResult<()>;

    /// Replaces `expected` with `task`, the same task after a lifecycle
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::StaleTask`] when the stored task no longer
    /// equals `expected`, [`RepositoryError::RunningTaskExists`] when `task`
    /// is running and another task of `owner` is running, or
    /// [`RepositoryError::TaskNotFound`] when the task does not exist.
    async fn update_task(
        &self,
        owner: UserId,
        expected: &Task,
        task: &Task,
    ) -> RepositoryResult<()>;

    /// Finds a task whose project is owned by `owner`.
    ///
    /// Returns `None` when the task does not exist or belongs to another user.
    async fn find_owned_task(&self, owner: UserId, id: TaskId) -> RepositoryResult<Option<Task>>;

    /// Returns a running task of `owner`, if there is one.
    async fn find_running_task(&self, owner: UserId) -> RepositoryResult<Option<Task>>;

    /// Returns every task of `owner`, most recently started first.
    async fn list_owned_tasks(&self, owner: UserId) -> RepositoryResult<Vec<Task>>;

    /// Returns the tasks of a project in storage order.
    async fn list_project_tasks(&self, project_id: ProjectId) -> RepositoryResult<Vec<Task>>;
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// A project with the same name already exists.
    #[error("duplicate project name: {0}")]
    DuplicateProjectName(ProjectName),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The owner already has a running task.
    #[error("user {owner} already has running task {running}")]
    RunningTaskExists {
        /// Owner of both tasks.
        owner: UserId,
        /// The task that is already running.
        running: TaskId,
    },

    /// The task changed after the caller read it.
    #[error("task {0} was modified concurrently")]
    StaleTask(TaskId),

    /// A concurrent write for the same owner won the race.
    #[error("concurrent update rejected: {0}")]
    Contention(Arc<dyn std::error::Error + Send + Sync>),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a serialization conflict reported by the store.
    pub fn contention(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Contention(Arc::new(err))
    }

    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
