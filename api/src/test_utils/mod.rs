//! Test utilities
//!
//! In-memory port implementations and fixtures for unit testing.
//!
//! Mocks stand in for the user directory and the workflow engine: the
//! directory resolves from a map, the recording queue keeps every run it
//! receives so tests can assert on dispatch.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
