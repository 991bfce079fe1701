//! Error types for tracking domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or transitioning domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackingDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project name exceeds the 200-character storage limit.
    #[error("project name exceeds 200 character limit: {0}")]
    ProjectNameTooLong(String),

    /// The task name exceeds the 250-character storage limit.
    #[error("task name exceeds 250 character limit: {0}")]
    TaskNameTooLong(String),

    /// No project identifier was supplied.
    #[error("project id is required")]
    MissingProjectId,

    /// No task identifier was supplied.
    #[error("task id is required")]
    MissingTaskId,

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The project does not exist or belongs to another user.
    #[error("unknown project: {0}")]
    UnknownProject(String),

    /// A task state filter names no known state.
    #[error(transparent)]
    UnknownTaskState(#[from] ParseTaskStateError),

    /// The duration does not follow the `HH:MM:SS` format.
    #[error("invalid duration '{0}', expected HH:MM:SS")]
    MalformedDuration(String),

    /// The task has already been closed.
    #[error("task already closed: {0}")]
    TaskAlreadyClosed(TaskId),

    /// A continuation was requested for a task that is still open.
    #[error("task {0} is still open and cannot be continued")]
    TaskStillOpen(TaskId),

    /// Persisted columns describe a task that is paused and closed at once.
    #[error("task {0} is persisted as both paused and closed")]
    PausedAndClosed(TaskId),
}

/// Error returned while parsing task states from storage or user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing a formatted spend time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid spend time '{0}', expected 'H hrs M mins S secs'")]
pub struct ParseSpendTimeError(pub String);
