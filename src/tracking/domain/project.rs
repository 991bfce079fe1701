//! Project aggregate and its validated name.

use super::{ProjectId, TrackingDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a project name, matching the `VARCHAR(200)` column.
const MAX_NAME_LENGTH: usize = 200;

/// Validated project name.
///
/// Names are compared case-sensitively and must be unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// The input is trimmed; case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingDomainError::EmptyProjectName`] when the value is
    /// empty after trimming, or [`TrackingDomainError::ProjectNameTooLong`]
    /// when it exceeds 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackingDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(TrackingDomainError::EmptyProjectName);
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(TrackingDomainError::ProjectNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the project name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Project aggregate root.
///
/// A project is owned by exactly one user and is the only link between that
/// user and the project's tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    owner: UserId,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project owned by `owner`.
    #[must_use]
    pub fn new(name: ProjectName, owner: UserId, clock: &impl Clock) -> Self {
        Self {
            id: ProjectId::new(),
            name,
            owner,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ProjectId,
        name: ProjectName,
        owner: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            owner,
            created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns whether `user` owns this project.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
