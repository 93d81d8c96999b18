//! Mention handlers
//!
//! Lets presentation layers (comment composer, highlighted rendering) use the
//! same tokenizer as the workflow pipeline.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::{extract_mentions, unique_mentions};
use crate::error::{AppError, DomainError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractMentionsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractMentionsResponse {
    /// One entry per occurrence, in text order
    pub mentions: Vec<String>,
    /// Distinct users, in order of first occurrence
    pub unique: Vec<String>,
}

/// POST /mentions/extract
pub async fn post_extract(
    State(state): State<AppState>,
    Json(req): Json<ExtractMentionsRequest>,
) -> Result<Json<ExtractMentionsResponse>, AppError> {
    if req.text.len() > state.config.max_comment_bytes {
        return Err(DomainError::TooLarge(format!(
            "text is {} bytes, limit is {}",
            req.text.len(),
            state.config.max_comment_bytes
        ))
        .into());
    }

    Ok(Json(ExtractMentionsResponse {
        mentions: extract_mentions(&req.text),
        unique: unique_mentions(&req.text),
    }))
}
