//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{User, WorkflowRunRequest};
use crate::domain::ports::{UserDirectory, WorkflowQueue};
use crate::error::{DirectoryError, DispatchError};

// ============================================================================
// In-Memory User Directory
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user, reachable by username and email
    pub fn with_user(self, user: User) -> Self {
        {
            let mut users = self.users.write().unwrap();
            if let Some(email) = &user.email {
                users.insert(email.clone(), user.clone());
            }
            users.insert(user.username.clone(), user);
        }
        self
    }

    /// Make an extra identifier resolve to `user`
    pub fn with_alias(self, alias: &str, user: User) -> Self {
        self.users.write().unwrap().insert(alias.to_string(), user);
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn resolve_user(&self, identifier: &str) -> Result<Option<User>, DirectoryError> {
        let users = self.users.read().unwrap();
        Ok(users.get(identifier).cloned())
    }
}

/// Directory that is always down
pub struct UnavailableUserDirectory;

#[async_trait]
impl UserDirectory for UnavailableUserDirectory {
    async fn resolve_user(&self, _identifier: &str) -> Result<Option<User>, DirectoryError> {
        Err(DirectoryError::Api {
            status: 503,
            message: "directory unavailable".to_string(),
        })
    }
}

// ============================================================================
// Workflow Queues
// ============================================================================

/// Records every run it receives
#[derive(Default)]
pub struct RecordingWorkflowQueue {
    runs: Arc<RwLock<Vec<WorkflowRunRequest>>>,
}

impl RecordingWorkflowQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> Vec<WorkflowRunRequest> {
        self.runs.read().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowQueue for RecordingWorkflowQueue {
    async fn enqueue_workflow_run(&self, run: &WorkflowRunRequest) -> Result<(), DispatchError> {
        self.runs.write().unwrap().push(run.clone());
        Ok(())
    }
}

/// Rejects every run
pub struct FailingWorkflowQueue;

#[async_trait]
impl WorkflowQueue for FailingWorkflowQueue {
    async fn enqueue_workflow_run(&self, _run: &WorkflowRunRequest) -> Result<(), DispatchError> {
        Err(DispatchError::Unavailable("engine is down".to_string()))
    }
}
