//! Workflow engine adapter
//!
//! Hands matched workflow runs to the workflow engine.

pub mod client;

pub use client::{HttpWorkflowQueue, LoggingWorkflowQueue};
