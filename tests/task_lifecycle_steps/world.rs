//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::ManualClock;
use rstest::fixture;
use timekeeper::tracking::{
    adapters::memory::InMemoryTrackingStore,
    domain::{Project, Task, UserId},
    services::{ProjectCatalogService, TaskLifecycleService, TrackingServiceError},
};
use uuid::Uuid;

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle = TaskLifecycleService<InMemoryTrackingStore, ManualClock>;
/// Catalogue service type used by the BDD world.
pub type TestCatalog = ProjectCatalogService<InMemoryTrackingStore, ManualClock>;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub clock: Arc<ManualClock>,
    pub lifecycle: TestLifecycle,
    pub catalog: TestCatalog,
    pub owner: UserId,
    pub project: Option<Project>,
    pub current_task: Option<Task>,
    pub last_result: Option<Result<Task, TrackingServiceError>>,
}

impl TaskLifecycleWorld {
    /// Creates a world for a fresh user with no projects.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTrackingStore::new());
        let clock = Arc::new(ManualClock::new());

        Self {
            lifecycle: TaskLifecycleService::new(Arc::clone(&store), Arc::clone(&clock)),
            catalog: ProjectCatalogService::new(store, Arc::clone(&clock)),
            clock,
            owner: UserId::from_uuid(Uuid::new_v4()),
            project: None,
            current_task: None,
            last_result: None,
        }
    }

    /// Returns the scenario project.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the task the scenario is acting on.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Records an operation result, tracking the returned task on success.
    pub fn record(&mut self, result: Result<Task, TrackingServiceError>) {
        if let Ok(ref task) = result {
            self.current_task = Some(task.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
