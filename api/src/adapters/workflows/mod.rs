//! Workflow registry adapter
//!
//! Keeps the loaded workflow definitions in memory and swaps them on reload.

pub mod registry;

pub use registry::WorkflowRegistry;
