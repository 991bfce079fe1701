//! Project and task time tracking.
//!
//! Users own projects; projects own tasks; tasks record work intervals that
//! can be paused, resumed, closed, restarted, and continued as a new linked
//! task. Each user has at most one running task at any time. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
