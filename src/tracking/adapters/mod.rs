//! Adapter implementations for tracking persistence ports.
//!
//! - [`memory`]: in-process store sharing one lock across projects and tasks
//! - [`postgres`]: Diesel-backed store using serializable transactions

pub mod memory;
pub mod postgres;
