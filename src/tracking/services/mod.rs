//! Application services for task lifecycle and project orchestration.

mod catalog;
mod error;
mod lifecycle;

pub use catalog::ProjectCatalogService;
pub use error::{ErrorKind, TrackingServiceError, TrackingServiceResult};
pub use lifecycle::{ContinueTaskRequest, CreateTaskRequest, TaskLifecycleService};
