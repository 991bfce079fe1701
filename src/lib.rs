//! Timekeeper: project time tracking with a single running task per user.
//!
//! This crate provides the task lifecycle state machine, elapsed-time
//! accounting, and project roll-ups behind repository ports, so that a REST
//! or CLI layer only has to translate requests and errors.
//!
//! # Architecture
//!
//! Timekeeper follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`tracking`]: Projects, tasks, and their lifecycle services
//! - [`config`]: Environment-driven runtime configuration

pub mod config;
pub mod tracking;
