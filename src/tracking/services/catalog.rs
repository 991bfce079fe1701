//! Service layer for project creation and project overviews.

use super::error::TrackingServiceResult;
use crate::tracking::{
    domain::{Project, ProjectName, ProjectOverview, UserId},
    ports::{ProjectRepository, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Project creation and listing service.
#[derive(Clone)]
pub struct ProjectCatalogService<R, C>
where
    R: ProjectRepository + TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ProjectCatalogService<R, C>
where
    R: ProjectRepository + TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project catalogue service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a project owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackingServiceError::Domain`] when the name is empty
    /// or too long, and [`super::TrackingServiceError::Repository`] when the
    /// name is already taken or persistence fails.
    pub async fn create_project(
        &self,
        owner: UserId,
        name: impl Into<String> + Send,
    ) -> TrackingServiceResult<Project> {
        let project_name = ProjectName::new(name)?;
        let project = Project::new(project_name, owner, &*self.clock);
        self.repository.store_project(&project).await?;
        info!(%owner, project_id = %project.id(), name = %project.name(), "project created");
        Ok(project)
    }

    /// Returns the projects of `owner` with their spend time roll-ups.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackingServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_projects(&self, owner: UserId) -> TrackingServiceResult<Vec<ProjectOverview>> {
        let projects = self.repository.list_projects(owner).await?;
        let mut overviews = Vec::with_capacity(projects.len());
        for project in projects {
            let tasks = self.repository.list_project_tasks(project.id()).await?;
            overviews.push(ProjectOverview::build(project, &tasks, &*self.clock));
        }
        Ok(overviews)
    }
}
