//! Workflow engine client implementations

use async_trait::async_trait;
use reqwest::Client;
use urlencoding::encode;

use crate::domain::entities::WorkflowRunRequest;
use crate::domain::ports::WorkflowQueue;
use crate::error::DispatchError;

/// Posts workflow runs to the workflow engine's HTTP API
pub struct HttpWorkflowQueue {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpWorkflowQueue {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn runs_url(&self, workflow_id: &str) -> String {
        format!("{}/workflows/{}/runs", self.base_url, encode(workflow_id))
    }
}

#[async_trait]
impl WorkflowQueue for HttpWorkflowQueue {
    async fn enqueue_workflow_run(&self, run: &WorkflowRunRequest) -> Result<(), DispatchError> {
        let mut request = self.http.post(self.runs_url(&run.workflow_id)).json(run);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 401 {
            Err(DispatchError::Unauthorized)
        } else if status.as_u16() == 503 {
            let message = response.text().await.unwrap_or_default();
            Err(DispatchError::Unavailable(message))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(DispatchError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Logs workflow runs instead of dispatching them
///
/// Used when no workflow engine is configured.
pub struct LoggingWorkflowQueue;

#[async_trait]
impl WorkflowQueue for LoggingWorkflowQueue {
    async fn enqueue_workflow_run(&self, run: &WorkflowRunRequest) -> Result<(), DispatchError> {
        tracing::info!(
            run_id = %run.run_id,
            workflow_id = %run.workflow_id,
            workflow_name = %run.workflow_name,
            incident_id = %run.event.incident_id,
            mentioned_user = %run.event.mentioned_user,
            mentioned_by = %run.event.mentioned_by,
            "Workflow engine not configured, dropping run"
        );
        Ok(())
    }
}
