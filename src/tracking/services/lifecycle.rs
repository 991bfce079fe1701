//! Service layer for task creation, transitions, and continuation.

use super::error::{TrackingServiceError, TrackingServiceResult};
use crate::tracking::{
    domain::{
        ProjectId, Task, TaskId, TaskState, TrackingDomainError, UserId, resolve_task_duration,
    },
    ports::{ProjectRepository, RepositoryError, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
///
/// Identifiers arrive as raw strings so that absent and malformed values are
/// reported as validation errors in the documented order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner: UserId,
    project_id: Option<String>,
    name: Option<String>,
    duration: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request for `owner` with no project, name, or duration.
    #[must_use]
    pub const fn new(owner: UserId) -> Self {
        Self {
            owner,
            project_id: None,
            name: None,
            duration: None,
        }
    }

    /// Sets the target project identifier.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the task name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets an `HH:MM:SS` duration, which closes the task on creation.
    ///
    /// The duration is validated but the placeholder duration is applied;
    /// see [`crate::tracking::domain::PLACEHOLDER_DURATION`].
    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }
}

/// Request payload for continuing a closed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinueTaskRequest {
    owner: UserId,
    task_id: Option<String>,
}

impl ContinueTaskRequest {
    /// Creates a request for `owner` with no task identifier.
    #[must_use]
    pub const fn new(owner: UserId) -> Self {
        Self {
            owner,
            task_id: None,
        }
    }

    /// Sets the identifier of the closed task to continue.
    #[must_use]
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}

/// Task lifecycle orchestration service.
///
/// Enforces that each user has at most one running task. The service checks
/// up front to report a conflict before any validation, and the repository
/// re-checks atomically on every write.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: ProjectRepository + TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: ProjectRepository + TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and starts a task in a project owned by the requester.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::RunningTaskExists`] when the owner
    /// already has a running task, [`TrackingServiceError::Domain`] when the
    /// project id is absent, malformed, or not owned by the requester, or
    /// when the name or duration is invalid, and
    /// [`TrackingServiceError::Repository`] when persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TrackingServiceResult<Task> {
        let CreateTaskRequest {
            owner,
            project_id,
            name,
            duration,
        } = request;

        self.ensure_no_running_task(owner).await?;

        let raw_project_id = project_id.ok_or(TrackingDomainError::MissingProjectId)?;
        let project_id = self.resolve_owned_project(owner, &raw_project_id).await?;
        let applied_duration = duration.as_deref().map(resolve_task_duration).transpose()?;

        let mut task = Task::new(project_id, name, &*self.clock)?;
        if let Some(span) = applied_duration {
            task = task.with_duration(span);
        }

        self.repository
            .store_task(owner, &task)
            .await
            .map_err(conflict_or_repository)?;
        info!(
            %owner,
            task_id = %task.id(),
            project_id = %task.project_id(),
            state = task.state().as_str(),
            "task created"
        );
        Ok(task)
    }

    /// Pauses a running task or resumes a paused one.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::TaskNotFound`] when the task is not
    /// owned by the requester, [`TrackingServiceError::Domain`] when it is
    /// closed, and [`TrackingServiceError::RunningTaskExists`] when resuming
    /// would leave the owner with two running tasks.
    pub async fn pause_or_resume_task(
        &self,
        owner: UserId,
        task_id: TaskId,
    ) -> TrackingServiceResult<Task> {
        self.transition(owner, task_id, "pause toggled", |task, clock| {
            task.toggle_pause(clock)
        })
        .await
    }

    /// Closes an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::TaskNotFound`] when the task is not
    /// owned by the requester and [`TrackingServiceError::Domain`] when it
    /// is already closed.
    pub async fn close_task(&self, owner: UserId, task_id: TaskId) -> TrackingServiceResult<Task> {
        self.transition(owner, task_id, "task closed", |task, clock| task.close(clock))
            .await
    }

    /// Rewinds an open task to a fresh running state.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::TaskNotFound`] when the task is not
    /// owned by the requester, [`TrackingServiceError::Domain`] when it is
    /// closed, and [`TrackingServiceError::RunningTaskExists`] when
    /// restarting a paused task would leave the owner with two running
    /// tasks.
    pub async fn restart_task(
        &self,
        owner: UserId,
        task_id: TaskId,
    ) -> TrackingServiceResult<Task> {
        self.transition(owner, task_id, "task restarted", |task, clock| {
            task.restart(clock)
        })
        .await
    }

    /// Starts a new task continuing a closed one.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::RunningTaskExists`] when the owner
    /// already has a running task, [`TrackingServiceError::Domain`] when the
    /// task id is absent or malformed, and
    /// [`TrackingServiceError::TaskNotFound`] when no closed task with that
    /// id is owned by the requester.
    pub async fn continue_task(
        &self,
        request: ContinueTaskRequest,
    ) -> TrackingServiceResult<Task> {
        let ContinueTaskRequest { owner, task_id } = request;

        self.ensure_no_running_task(owner).await?;

        let raw_task_id = task_id.ok_or(TrackingDomainError::MissingTaskId)?;
        let source_id = TaskId::parse(&raw_task_id)?;
        let source = self
            .repository
            .find_owned_task(owner, source_id)
            .await?
            .filter(Task::is_closed)
            .ok_or(TrackingServiceError::TaskNotFound(source_id))?;

        let continuation = Task::continue_from(&source, &*self.clock)?;
        self.repository
            .store_task(owner, &continuation)
            .await
            .map_err(conflict_or_repository)?;
        info!(
            %owner,
            task_id = %continuation.id(),
            cloned_from = %source_id,
            "task continued"
        );
        Ok(continuation)
    }

    /// Returns every task of `owner`, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_tasks(&self, owner: UserId) -> TrackingServiceResult<Vec<Task>> {
        Ok(self.repository.list_owned_tasks(owner).await?)
    }

    /// Returns the tasks of `owner` whose state is named by `state`, most
    /// recently started first.
    ///
    /// State names are matched case-insensitively against `running`,
    /// `paused`, and `closed`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingServiceError::Domain`] when `state` names no known
    /// state and [`TrackingServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_tasks_in_state(
        &self,
        owner: UserId,
        state: &str,
    ) -> TrackingServiceResult<Vec<Task>> {
        let wanted = TaskState::try_from(state).map_err(TrackingDomainError::from)?;
        let mut tasks = self.repository.list_owned_tasks(owner).await?;
        tasks.retain(|task| task.state() == wanted);
        Ok(tasks)
    }

    async fn ensure_no_running_task(&self, owner: UserId) -> TrackingServiceResult<()> {
        match self.repository.find_running_task(owner).await? {
            Some(running) => {
                warn!(%owner, running = %running.id(), "rejected: task already running");
                Err(TrackingServiceError::RunningTaskExists {
                    owner,
                    running: running.id(),
                })
            }
            None => Ok(()),
        }
    }

    async fn resolve_owned_project(
        &self,
        owner: UserId,
        raw_project_id: &str,
    ) -> TrackingServiceResult<ProjectId> {
        let project_id = ProjectId::parse(raw_project_id)?;
        let owned = self
            .repository
            .find_project(project_id)
            .await?
            .is_some_and(|project| project.is_owned_by(owner));
        if !owned {
            return Err(TrackingDomainError::UnknownProject(raw_project_id.to_owned()).into());
        }
        Ok(project_id)
    }

    async fn transition<F>(
        &self,
        owner: UserId,
        task_id: TaskId,
        action: &'static str,
        apply: F,
    ) -> TrackingServiceResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TrackingDomainError> + Send,
    {
        let current = self
            .repository
            .find_owned_task(owner, task_id)
            .await?
            .ok_or(TrackingServiceError::TaskNotFound(task_id))?;

        if current.is_closed() {
            warn!(%owner, %task_id, action, "rejected: task already closed");
            return Err(TrackingDomainError::TaskAlreadyClosed(task_id).into());
        }
        let mut task = current.clone();
        apply(&mut task, &*self.clock)?;

        self.repository
            .update_task(owner, &current, &task)
            .await
            .map_err(|err| {
                if matches!(err, RepositoryError::StaleTask(_)) {
                    warn!(%owner, %task_id, action, "rejected: task changed since it was read");
                }
                conflict_or_repository(err)
            })?;
        debug!(%owner, %task_id, state = task.state().as_str(), "{action}");
        Ok(task)
    }
}

fn conflict_or_repository(err: RepositoryError) -> TrackingServiceError {
    match err {
        RepositoryError::RunningTaskExists { owner, running } => {
            TrackingServiceError::RunningTaskExists { owner, running }
        }
        other => TrackingServiceError::Repository(other),
    }
}
