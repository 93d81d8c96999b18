//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod directory;
pub mod workflows;

pub use directory::UserDirectory;
pub use workflows::{TriggerRegistry, WorkflowQueue};
