//! Workflow admin handlers
//!
//! Inspect, reload and validate the workflow definitions in effect.
//! Definition errors come back as 422 with the loader's message so workflow
//! authors see them at load time.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::load_workflow_str;
use crate::domain::entities::{
    MentionPolicy, Trigger, Workflow, WorkflowSnapshot, WorkflowTrigger,
};
use crate::domain::ports::TriggerRegistry;
use crate::error::{AppError, DomainError};
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub key: String,
    pub value: String,
    pub is_regex: bool,
    pub exclude: bool,
}

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterResponse>,
}

#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub disabled: bool,
    pub triggers: Vec<TriggerResponse>,
}

#[derive(Debug, Serialize)]
pub struct WorkflowListResponse {
    pub loaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,
    pub mention_policy: MentionPolicy,
    pub workflows: Vec<WorkflowResponse>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub loaded_at: DateTime<Utc>,
    pub workflows: usize,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub workflow: WorkflowResponse,
}

fn filters_response(trigger: &Trigger) -> Vec<FilterResponse> {
    trigger
        .filters
        .iter()
        .map(|f| FilterResponse {
            key: f.key.to_string(),
            value: f.pattern.as_str().to_string(),
            is_regex: f.pattern.is_regex(),
            exclude: f.exclude,
        })
        .collect()
}

impl From<&Workflow> for WorkflowResponse {
    fn from(workflow: &Workflow) -> Self {
        WorkflowResponse {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            disabled: workflow.disabled,
            triggers: workflow
                .triggers
                .iter()
                .map(|t| TriggerResponse {
                    kind: t.kind().to_string(),
                    filters: match t {
                        WorkflowTrigger::UserAssigned(trigger) => filters_response(trigger),
                        WorkflowTrigger::Other(_) => Vec::new(),
                    },
                })
                .collect(),
        }
    }
}

fn workflow_list(state: &AppState, snapshot: &WorkflowSnapshot) -> WorkflowListResponse {
    WorkflowListResponse {
        loaded_at: snapshot.loaded_at,
        source_dir: state
            .registry
            .source_dir()
            .map(|dir| dir.display().to_string()),
        mention_policy: state.mention_service.policy(),
        workflows: snapshot.workflows.iter().map(WorkflowResponse::from).collect(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /workflows
///
/// List the workflow definitions currently in effect.
pub async fn list_workflows(State(state): State<AppState>) -> Json<WorkflowListResponse> {
    let snapshot = state.registry.snapshot();
    Json(workflow_list(&state, &snapshot))
}

/// POST /workflows/reload
///
/// Re-read the workflow directory. On failure the previous definitions stay in effect.
pub async fn reload_workflows(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let registry = state.registry.clone();
    let snapshot = tokio::task::spawn_blocking(move || registry.reload())
        .await
        .map_err(|e| DomainError::Internal(format!("reload task failed: {}", e)))??;

    Ok(Json(ReloadResponse {
        loaded_at: snapshot.loaded_at,
        workflows: snapshot.workflows.len(),
    }))
}

/// POST /workflows/validate
///
/// Validate a workflow YAML document without registering it.
pub async fn validate_workflow(body: String) -> Result<Json<ValidateResponse>, AppError> {
    let workflow = load_workflow_str(&body)?;

    Ok(Json(ValidateResponse {
        valid: true,
        workflow: WorkflowResponse::from(&workflow),
    }))
}
