//! Port contracts for project and task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracking services.

pub mod repository;

pub use repository::{ProjectRepository, RepositoryError, RepositoryResult, TaskRepository};
