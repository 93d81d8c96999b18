//! Admin token authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// Extract the bearer token from the Authorization header
fn extract_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Compare digests so the comparison time does not depend on the token
fn token_matches(provided: &str, expected: &str) -> bool {
    Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Authentication middleware for the workflow admin routes
///
/// When no admin token is configured the routes are open (development mode).
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        tracing::warn!("Admin token not configured, admin routes are unauthenticated");
        return Ok(next.run(request).await);
    };

    let provided = extract_token(&request).ok_or(AppError::Unauthorized)?;
    if !token_matches(provided, expected) {
        tracing::warn!("Rejected admin request with invalid token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
