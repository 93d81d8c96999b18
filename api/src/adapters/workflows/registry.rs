//! In-memory workflow registry
//!
//! Evaluations hold an `Arc` to the snapshot they started with. A reload
//! builds a complete new snapshot first and only then swaps the pointer, so
//! a failed reload leaves the previous definitions in effect.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::app::load_workflow_dir;
use crate::domain::entities::WorkflowSnapshot;
use crate::domain::ports::TriggerRegistry;
use crate::error::ConfigurationError;

pub struct WorkflowRegistry {
    current: RwLock<Arc<WorkflowSnapshot>>,
    source_dir: Option<PathBuf>,
}

impl WorkflowRegistry {
    #[cfg(test)]
    pub fn new(snapshot: WorkflowSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            source_dir: None,
        }
    }

    /// Load the registry from a directory of workflow files
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self, ConfigurationError> {
        let dir = dir.into();
        let snapshot = load_workflow_dir(&dir)?;
        Ok(Self {
            current: RwLock::new(Arc::new(snapshot)),
            source_dir: Some(dir),
        })
    }

    pub fn source_dir(&self) -> Option<&Path> {
        self.source_dir.as_deref()
    }

    /// Swap in a new snapshot
    pub fn replace(&self, snapshot: WorkflowSnapshot) -> Arc<WorkflowSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = snapshot.clone();
        snapshot
    }

    /// Re-read the workflow directory and swap in the result
    pub fn reload(&self) -> Result<Arc<WorkflowSnapshot>, ConfigurationError> {
        let dir = self
            .source_dir
            .as_deref()
            .ok_or(ConfigurationError::NoWorkflowDir)?;

        match load_workflow_dir(dir) {
            Ok(snapshot) => {
                let count = snapshot.workflows.len();
                let snapshot = self.replace(snapshot);
                tracing::info!(
                    dir = %dir.display(),
                    workflows = count,
                    "Workflow definitions reloaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(
                    dir = %dir.display(),
                    error = %e,
                    "Workflow reload failed, keeping previous definitions"
                );
                Err(e)
            }
        }
    }
}

impl TriggerRegistry for WorkflowRegistry {
    fn snapshot(&self) -> Arc<WorkflowSnapshot> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
