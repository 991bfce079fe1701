//! Service-level errors and their caller-facing classification.

use crate::tracking::{
    domain::{TaskId, TrackingDomainError, UserId},
    ports::RepositoryError,
};
use thiserror::Error;

/// Caller-facing category of a service error.
///
/// The REST layer maps these to 400, 409, 404, and 500 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed input, or an operation on a closed task.
    Validation,
    /// The single-running-task invariant would be violated.
    Conflict,
    /// The referenced record does not exist or is not visible to the caller.
    NotFound,
    /// Infrastructure failure.
    Internal,
}

/// Service-level errors for tracking operations.
#[derive(Debug, Error)]
pub enum TrackingServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TrackingDomainError),

    /// The user already has a running task.
    #[error("user {owner} already has running task {running}")]
    RunningTaskExists {
        /// Requesting user.
        owner: UserId,
        /// The running task.
        running: TaskId,
    },

    /// The task does not exist, is not owned by the caller, or does not
    /// match the operation's filters.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TrackingServiceError {
    /// Classifies the error for the calling layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::RunningTaskExists { .. } => ErrorKind::Conflict,
            Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::Repository(err) => match err {
                RepositoryError::DuplicateProjectName(_) => ErrorKind::Validation,
                RepositoryError::RunningTaskExists { .. }
                | RepositoryError::StaleTask(_)
                | RepositoryError::Contention(_) => ErrorKind::Conflict,
                RepositoryError::TaskNotFound(_) | RepositoryError::ProjectNotFound(_) => {
                    ErrorKind::NotFound
                }
                RepositoryError::DuplicateProject(_)
                | RepositoryError::DuplicateTask(_)
                | RepositoryError::InvalidPersistedData(_)
                | RepositoryError::Persistence(_) => ErrorKind::Internal,
            },
        }
    }
}

/// Result type for tracking service operations.
pub type TrackingServiceResult<T> = Result<T, TrackingServiceError>;
