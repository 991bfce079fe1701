//! Shared fixtures for in-memory service integration tests.

use crate::test_helpers::ManualClock;
use rstest::fixture;
use std::sync::Arc;
use timekeeper::tracking::{
    adapters::memory::InMemoryTrackingStore,
    domain::{Project, UserId},
    services::{CreateTaskRequest, ProjectCatalogService, TaskLifecycleService},
};
use uuid::Uuid;

/// Lifecycle service over the in-memory store.
pub type TestLifecycle = TaskLifecycleService<InMemoryTrackingStore, ManualClock>;
/// Catalogue service over the in-memory store.
pub type TestCatalog = ProjectCatalogService<InMemoryTrackingStore, ManualClock>;

/// Both services sharing one store and one clock.
pub struct Tracker {
    pub clock: Arc<ManualClock>,
    pub lifecycle: TestLifecycle,
    pub catalog: TestCatalog,
}

impl Tracker {
    /// Creates a project owned by `owner`.
    pub async fn project(&self, owner: UserId, name: &str) -> Project {
        self.catalog
            .create_project(owner, name)
            .await
            .expect("project creation should succeed")
    }
}

/// Provides fresh services for each test.
#[fixture]
pub fn tracker() -> Tracker {
    let store = Arc::new(InMemoryTrackingStore::new());
    let clock = Arc::new(ManualClock::new());
    Tracker {
        lifecycle: TaskLifecycleService::new(Arc::clone(&store), Arc::clone(&clock)),
        catalog: ProjectCatalogService::new(store, Arc::clone(&clock)),
        clock,
    }
}

/// Returns a fresh user identity.
pub fn user() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}

/// Builds a create request targeting `project`.
pub fn create_in(owner: UserId, project: &Project) -> CreateTaskRequest {
    CreateTaskRequest::new(owner).with_project_id(project.id().to_string())
}
