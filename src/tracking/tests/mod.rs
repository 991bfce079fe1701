//! Unit tests for the tracking module.

mod support;
