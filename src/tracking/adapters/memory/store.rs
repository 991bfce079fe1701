//! In-memory tracking store for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::tracking::{
    domain::{Project, ProjectId, ProjectName, Task, TaskId, UserId},
    ports::{ProjectRepository, RepositoryError, RepositoryResult, TaskRepository},
};

/// Thread-safe in-memory store implementing both repository ports.
///
/// Projects and tasks share one lock so that ownership joins and the
/// running-task check see a consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackingStore {
    state: Arc<RwLock<InMemoryTrackingState>>,
}

#[derive(Debug, Default)]
struct InMemoryTrackingState {
    projects: HashMap<ProjectId, Project>,
    project_order: Vec<ProjectId>,
    name_index: HashMap<ProjectName, ProjectId>,
    tasks: HashMap<TaskId, Task>,
    task_order: Vec<TaskId>,
}

impl InMemoryTrackingState {
    fn owns_project(&self, owner: UserId, project_id: ProjectId) -> bool {
        self.projects
            .get(&project_id)
            .is_some_and(|project| project.is_owned_by(owner))
    }

    fn ordered_tasks(&self) -> impl Iterator<Item = &Task> {
        self.task_order.iter().filter_map(|id| self.tasks.get(id))
    }

    fn running_task_of(&self, owner: UserId, except: TaskId) -> Option<&Task> {
        self.ordered_tasks().find(|task| {
            task.id() != except && task.is_running() && self.owns_project(owner, task.project_id())
        })
    }

    fn ensure_single_running(&self, owner: UserId, task: &Task) -> RepositoryResult<()> {
        if !task.is_running() {
            return Ok(());
        }
        match self.running_task_of(owner, task.id()) {
            Some(running) => Err(RepositoryError::RunningTaskExists {
                owner,
                running: running.id(),
            }),
            None => Ok(()),
        }
    }
}

impl InMemoryTrackingStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, InMemoryTrackingState>> {
        self.state
            .read()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, InMemoryTrackingState>> {
        self.state
            .write()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl ProjectRepository for InMemoryTrackingStore {
    async fn store_project(&self, project: &Project) -> RepositoryResult<()> {
        let mut state = self.write()?;

        if state.projects.contains_key(&project.id()) {
            return Err(RepositoryError::DuplicateProject(project.id()));
        }
        if state.name_index.contains_key(project.name()) {
            return Err(RepositoryError::DuplicateProjectName(
                project.name().clone(),
            ));
        }

        state
            .name_index
            .insert(project.name().clone(), project.id());
        state.project_order.push(project.id());
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_projects(&self, owner: UserId) -> RepositoryResult<Vec<Project>> {
        let state = self.read()?;
        let projects = state
            .project_order
            .iter()
            .filter_map(|id| state.projects.get(id))
            .filter(|project| project.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(projects)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTrackingStore {
    async fn store_task(&self, owner: UserId, task: &Task) -> RepositoryResult<()> {
        let mut state = self.write()?;

        if state.tasks.contains_key(&task.id()) {
            return Err(RepositoryError::DuplicateTask(task.id()));
        }
        if !state.owns_project(owner, task.project_id()) {
            return Err(RepositoryError::ProjectNotFound(task.project_id()));
        }
        state.ensure_single_running(owner, task)?;

        state.task_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(
        &self,
        owner: UserId,
        expected: &Task,
        task: &Task,
    ) -> RepositoryResult<()> {
        let mut state = self.write()?;

        let stored = state
            .tasks
            .get(&task.id())
            .filter(|existing| state.owns_project(owner, existing.project_id()));
        match stored {
            None => return Err(RepositoryError::TaskNotFound(task.id())),
            Some(stored) if stored != expected => {
                return Err(RepositoryError::StaleTask(task.id()));
            }
            Some(_) => {}
        }
        state.ensure_single_running(owner, task)?;

        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_owned_task(&self, owner: UserId, id: TaskId) -> RepositoryResult<Option<Task>> {
        let state = self.read()?;
        let task = state
            .tasks
            .get(&id)
            .filter(|task| state.owns_project(owner, task.project_id()))
            .cloned();
        Ok(task)
    }

    async fn find_running_task(&self, owner: UserId) -> RepositoryResult<Option<Task>> {
        let state = self.read()?;
        let running = state
            .ordered_tasks()
            .find(|task| task.is_running() && state.owns_project(owner, task.project_id()))
            .cloned();
        Ok(running)
    }

    async fn list_owned_tasks(&self, owner: UserId) -> RepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .ordered_tasks()
            .filter(|task| state.owns_project(owner, task.project_id()))
            .cloned()
            .collect();
        tasks.sort_by(|left, right| right.started_at().cmp(&left.started_at()));
        Ok(tasks)
    }

    async fn list_project_tasks(&self, project_id: ProjectId) -> RepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state
            .ordered_tasks()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect();
        Ok(tasks)
    }
}
