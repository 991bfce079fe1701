//! `PostgreSQL` store implementing the project and task repository ports.

use super::{
    models::{NewProjectRow, NewTaskRow, ProjectRow, TaskLifecycleChangeset, TaskRow},
    schema::{projects, tasks},
};
use crate::tracking::{
    domain::{Project, ProjectId, Task, TaskId, UserId},
    ports::{ProjectRepository, RepositoryError, RepositoryResult, TaskRepository},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by tracking adapters.
pub type TrackingPgPool = Pool<ConnectionManager<PgConnection>>;

/// Name of the unique constraint on `projects.name`.
const PROJECT_NAME_CONSTRAINT: &str = "projects_name_key";

/// `PostgreSQL`-backed store for projects and tasks.
///
/// Task writes run in `SERIALIZABLE` transactions so two concurrent requests
/// for the same owner cannot both observe "no running task" and both write
/// one. The losing transaction surfaces as [`RepositoryError::Contention`].
/// Updates re-read the row inside the same transaction and reject the write
/// with [`RepositoryError::StaleTask`] when it differs from the caller's copy.
#[derive(Debug, Clone)]
pub struct PostgresTrackingStore {
    pool: TrackingPgPool,
}

impl PostgresTrackingStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RepositoryError::persistence)?
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                Self::contention(err)
            }
            _ => Self::persistence(err),
        }
    }
}

#[async_trait]
impl ProjectRepository for PostgresTrackingStore {
    async fn store_project(&self, project: &Project) -> RepositoryResult<()> {
        let project_id = project.id();
        let name = project.name().clone();
        let new_row = NewProjectRow::from_domain(project);

        self.run_blocking(move |connection| {
            // The unique constraint still guards the window between this
            // check and the insert.
            let name_taken: i64 = projects::table
                .filter(projects::name.eq(name.as_str()))
                .count()
                .get_result(connection)?;
            if name_taken > 0 {
                return Err(RepositoryError::DuplicateProjectName(name));
            }

            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_project_name_violation(info.as_ref()) =>
                    {
                        RepositoryError::DuplicateProjectName(name.clone())
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        RepositoryError::DuplicateProject(project_id)
                    }
                    _ => RepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            row.map(ProjectRow::into_domain).transpose()
        })
        .await
    }

    async fn list_projects(&self, owner: UserId) -> RepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            projects::table
                .filter(projects::owner_id.eq(owner.into_inner()))
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?
                .into_iter()
                .map(ProjectRow::into_domain)
                .collect()
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresTrackingStore {
    async fn store_task(&self, owner: UserId, task: &Task) -> RepositoryResult<()> {
        let task_id = task.id();
        let project_id = task.project_id();
        let is_running = task.is_running();
        let new_row = NewTaskRow::try_from_domain(task)?;

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .serializable()
                .run::<_, RepositoryError, _>(|tx| {
                    let owns_project: i64 = projects::table
                        .filter(projects::id.eq(project_id.into_inner()))
                        .filter(projects::owner_id.eq(owner.into_inner()))
                        .count()
                        .get_result(tx)?;
                    if owns_project == 0 {
                        return Err(RepositoryError::ProjectNotFound(project_id));
                    }
                    if is_running {
                        ensure_no_other_running(tx, owner, task_id)?;
                    }

                    diesel::insert_into(tasks::table)
                        .values(&new_row)
                        .execute(tx)
                        .map_err(|err| match err {
                            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                                RepositoryError::DuplicateTask(task_id)
                            }
                            other => RepositoryError::from(other),
                        })?;
                    Ok(())
                })
        })
        .await
    }

    async fn update_task(
        &self,
        owner: UserId,
        expected: &Task,
        task: &Task,
    ) -> RepositoryResult<()> {
        let task_id = task.id();
        let is_running = task.is_running();
        let expected = expected.clone();
        let changeset = TaskLifecycleChangeset::try_from_domain(task)?;

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .serializable()
                .run::<_, RepositoryError, _>(|tx| {
                    let stored = find_owned_row(tx, owner, task_id)?
                        .ok_or(RepositoryError::TaskNotFound(task_id))?
                        .into_domain()?;
                    if stored != expected {
                        return Err(RepositoryError::StaleTask(task_id));
                    }
                    if is_running {
                        ensure_no_other_running(tx, owner, task_id)?;
                    }

                    diesel::update(tasks::table.find(task_id.into_inner()))
                        .set(&changeset)
                        .execute(tx)?;
                    Ok(())
                })
        })
        .await
    }

    async fn find_owned_task(&self, owner: UserId, id: TaskId) -> RepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            find_owned_row(connection, owner, id)?
                .map(TaskRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn find_running_task(&self, owner: UserId) -> RepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .inner_join(projects::table)
                .filter(projects::owner_id.eq(owner.into_inner()))
                .filter(tasks::ended_at.is_null())
                .filter(tasks::paused_at.is_null())
                .order(tasks::position.asc())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(TaskRow::into_domain).transpose()
        })
        .await
    }

    async fn list_owned_tasks(&self, owner: UserId) -> RepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .inner_join(projects::table)
                .filter(projects::owner_id.eq(owner.into_inner()))
                .order((tasks::started_at.desc(), tasks::position.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(TaskRow::into_domain)
                .collect()
        })
        .await
    }

    async fn list_project_tasks(&self, project_id: ProjectId) -> RepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .order(tasks::position.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(TaskRow::into_domain)
                .collect()
        })
        .await
    }
}

fn find_owned_row(
    connection: &mut PgConnection,
    owner: UserId,
    id: TaskId,
) -> RepositoryResult<Option<TaskRow>> {
    Ok(tasks::table
        .inner_join(projects::table)
        .filter(projects::owner_id.eq(owner.into_inner()))
        .filter(tasks::id.eq(id.into_inner()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()?)
}

fn ensure_no_other_running(
    connection: &mut PgConnection,
    owner: UserId,
    task_id: TaskId,
) -> RepositoryResult<()> {
    let running = tasks::table
        .inner_join(projects::table)
        .filter(projects::owner_id.eq(owner.into_inner()))
        .filter(tasks::ended_at.is_null())
        .filter(tasks::paused_at.is_null())
        .filter(tasks::id.ne(task_id.into_inner()))
        .select(tasks::id)
        .first::<uuid::Uuid>(connection)
        .optional()?;

    match running {
        Some(running) => Err(RepositoryError::RunningTaskExists {
            owner,
            running: TaskId::from_uuid(running),
        }),
        None => Ok(()),
    }
}

fn is_project_name_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == PROJECT_NAME_CONSTRAINT)
}
