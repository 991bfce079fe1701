//! Runtime configuration read from environment variables.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TIMEKEEPER_DATABASE_URL` | `PostgreSQL` connection URL | `DATABASE_URL` |
//! | `TIMEKEEPER_POOL_SIZE` | Maximum pooled connections | `4` |
//! | `RUST_LOG` | `tracing` filter directives | `timekeeper=info` |

use std::env;
use thiserror::Error;

/// Primary database URL variable.
pub const DATABASE_URL_ENV: &str = "TIMEKEEPER_DATABASE_URL";
/// Fallback database URL variable shared with Diesel tooling.
pub const FALLBACK_DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Connection pool size variable.
pub const POOL_SIZE_ENV: &str = "TIMEKEEPER_POOL_SIZE";
/// Log filter variable.
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_LOG_FILTER: &str = "timekeeper=info";

/// Errors returned while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither database URL variable is set.
    #[error(
        "database url missing: set {primary} or {fallback}",
        primary = DATABASE_URL_ENV,
        fallback = FALLBACK_DATABASE_URL_ENV
    )]
    MissingDatabaseUrl,

    /// The pool size is not a positive integer.
    #[error("invalid {var} '{0}', expected a positive integer", var = POOL_SIZE_ENV)]
    InvalidPoolSize(String),
}

/// Runtime settings for the timekeeper binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    database_url: String,
    pool_size: u32,
    log_filter: String,
}

impl TrackerConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of a
    /// variable when it is set.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = read(DATABASE_URL_ENV)
            .or_else(|| read(FALLBACK_DATABASE_URL_ENV))
            .ok_or(ConfigError::MissingDatabaseUrl)?;
        let pool_size = read(POOL_SIZE_ENV)
            .map(|raw| parse_pool_size(&raw))
            .transpose()?
            .unwrap_or(DEFAULT_POOL_SIZE);
        let log_filter = read(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Ok(Self {
            database_url,
            pool_size,
            log_filter,
        })
    }

    /// Returns the database connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Returns the `tracing` filter directives.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| ConfigError::InvalidPoolSize(raw.to_owned()))
}
