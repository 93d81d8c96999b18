//! Comment webhook handler
//!
//! Receives comment submissions from the incident API and starts the
//! workflows their mentions trigger.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::app::QueuedRun;
use crate::domain::entities::CommentSubmission;
use crate::error::AppError;
use crate::AppState;

/// Header carrying the `sha256=<hex>` HMAC of the raw body
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Comment webhook payload
#[derive(Debug, Deserialize)]
pub struct CommentWebhookPayload {
    pub incident_id: String,
    pub comment_id: String,
    #[serde(alias = "commenter")]
    pub author: String,
    #[serde(alias = "comment")]
    pub text: String,
}

impl From<CommentWebhookPayload> for CommentSubmission {
    fn from(payload: CommentWebhookPayload) -> Self {
        CommentSubmission {
            incident_id: payload.incident_id,
            comment_id: payload.comment_id,
            author: payload.author,
            text: payload.text,
        }
    }
}

/// Summary returned to the incident API
#[derive(Debug, Serialize)]
pub struct CommentWebhookResponse {
    pub mentions: Vec<String>,
    pub dropped: Vec<String>,
    pub events: usize,
    pub queued: Vec<QueuedRun>,
    pub failed: usize,
}

/// Verify HMAC-SHA256 signature
pub(crate) fn verify_signature(payload: &[u8], signature: Option<&str>, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        // No secret configured, skip verification (development mode)
        tracing::warn!("Webhook secret not configured, skipping signature verification");
        return true;
    };

    let Some(sig_header) = signature else {
        tracing::warn!("No signature provided in webhook request");
        return false;
    };

    let expected_hex = sig_header.strip_prefix("sha256=").unwrap_or(sig_header);

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => {
            tracing::error!("Invalid webhook secret key");
            return false;
        }
    };

    mac.update(payload);

    let expected_bytes = match hex::decode(expected_hex) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid signature format");
            return false;
        }
    };

    mac.verify_slice(&expected_bytes).is_ok()
}

/// POST /webhooks/comments
///
/// Handle a comment submitted on an incident.
pub async fn comment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CommentWebhookResponse>), AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok());

    if !verify_signature(&body, signature, state.config.webhook_secret.as_deref()) {
        tracing::warn!("Webhook signature verification failed");
        return Err(AppError::Unauthorized);
    }

    let payload: CommentWebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse comment payload");
        AppError::BadRequest(format!("Invalid JSON: {}", e))
    })?;
    let submission = CommentSubmission::from(payload);

    tracing::info!(
        incident_id = %submission.incident_id,
        comment_id = %submission.comment_id,
        author = %submission.author,
        "Received incident comment"
    );

    let outcome = state.mention_service.process_comment(&submission).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CommentWebhookResponse {
            mentions: outcome.mentions,
            dropped: outcome.dropped,
            events: outcome.events.len(),
            queued: outcome.queued,
            failed: outcome.failed,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sign_body as sign;

    #[test]
    fn parse_comment_payload() {
        let json = r#"{
            "incident_id": "inc-7",
            "comment_id": "c-1",
            "author": "alice@example.com",
            "text": "@bob can you look?"
        }"#;

        let payload: CommentWebhookPayload = serde_json::from_str(json).unwrap();
        let submission = CommentSubmission::from(payload);
        assert_eq!(submission.incident_id, "inc-7");
        assert_eq!(submission.text, "@bob can you look?");
    }

    #[test]
    fn parse_comment_payload_aliases() {
        let json = r#"{
            "incident_id": "inc-7",
            "comment_id": "c-1",
            "commenter": "alice@example.com",
            "comment": "@bob"
        }"#;

        let payload: CommentWebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.author, "alice@example.com");
        assert_eq!(payload.text, "@bob");
    }

    #[test]
    fn signature_without_secret_is_accepted() {
        assert!(verify_signature(b"{}", None, None));
    }

    #[test]
    fn signature_round_trip() {
        let body = br#"{"incident_id":"1"}"#;
        let signature = sign("s3cret", body);

        assert!(verify_signature(body, Some(&signature), Some("s3cret")));
        assert!(verify_signature(
            body,
            signature.strip_prefix("sha256="),
            Some("s3cret")
        ));
    }

    #[test]
    fn signature_rejections() {
        let body = br#"{"incident_id":"1"}"#;
        let signature = sign("s3cret", body);

        assert!(!verify_signature(body, None, Some("s3cret")));
        assert!(!verify_signature(body, Some(&signature), Some("other")));
        assert!(!verify_signature(b"tampered", Some(&signature), Some("s3cret")));
        assert!(!verify_signature(body, Some("sha256=zz"), Some("s3cret")));
    }
}
