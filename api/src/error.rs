//! Unified error types for the mention relay
//!
//! This module defines error types for each layer:
//! - `ConfigurationError`: invalid workflow definitions (surfaced to workflow authors)
//! - `DomainError`: core business logic errors
//! - `DirectoryError`: user directory client errors
//! - `DispatchError`: workflow engine client errors
//! - `AppError`: application layer errors (wraps the above for HTTP responses)

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Workflow definition errors
///
/// Raised while a workflow is loaded, validated or reloaded, never while an
/// event is being evaluated.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Unknown filter key '{key}' (expected one of: {expected})")]
    UnknownFilterKey { key: String, expected: String },

    #[error("Unknown trigger type: {0}")]
    UnknownTriggerType(String),

    #[error("Invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid workflow: {0}")]
    InvalidWorkflow(String),

    #[error("No workflow directory configured")]
    NoWorkflowDir,

    #[error("Duplicate workflow id '{id}' in {path}")]
    DuplicateWorkflow { id: String, path: PathBuf },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigurationError>,
    },
}

impl ConfigurationError {
    /// Attach the file a definition was read from
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ConfigurationError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// A mention token that does not resolve to a known user
///
/// Internal and non-fatal: the mention is dropped before event construction.
#[derive(Debug, Error)]
#[error("Unknown user: {0}")]
pub struct UnknownUserError(pub String);

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    TooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// User directory client errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid token")]
    Unauthorized,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Workflow engine client errors
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid token")]
    Unauthorized,

    #[error("Queue unavailable: {0}")]
    Unavailable(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("User directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::TooLarge(msg)) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Configuration(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Configuration error",
                Some(e.to_string()),
            ),
            AppError::Directory(e) => {
                tracing::error!("User directory error: {}", e);
                (StatusCode::BAD_GATEWAY, "User directory error", None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_carries_file_context() {
        let err = ConfigurationError::UnknownTriggerType("webhook".to_string())
            .in_file("workflows/page.yml");

        assert_eq!(
            err.to_string(),
            "workflows/page.yml: Unknown trigger type: webhook"
        );
    }

    #[test]
    fn configuration_error_maps_to_unprocessable_entity() {
        let err = AppError::from(ConfigurationError::InvalidWorkflow(
            "missing id".to_string(),
        ));

        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn directory_error_hides_details() {
        let err = AppError::from(DirectoryError::Unauthorized);
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
