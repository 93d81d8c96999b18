//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod directory;
pub mod engine;
pub mod workflows;

pub use directory::HttpUserDirectory;
pub use engine::{HttpWorkflowQueue, LoggingWorkflowQueue};
pub use workflows::WorkflowRegistry;
