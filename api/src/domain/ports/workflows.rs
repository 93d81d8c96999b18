//! Workflow port traits
//!
//! The trigger registry supplies read-only snapshots of the loaded workflows;
//! the workflow queue hands matched runs to the workflow engine.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{WorkflowRunRequest, WorkflowSnapshot};
use crate::error::DispatchError;

/// Source of the workflow definitions currently in effect
pub trait TriggerRegistry: Send + Sync {
    /// Snapshot to evaluate against; never mutated after it is handed out
    fn snapshot(&self) -> Arc<WorkflowSnapshot>;
}

/// Sink for workflow runs
#[async_trait]
pub trait WorkflowQueue: Send + Sync {
    async fn enqueue_workflow_run(&self, run: &WorkflowRunRequest) -> Result<(), DispatchError>;
}
