//! Mention Relay Server
//!
//! Turns `@user` mentions in incident comments into `user_assigned` workflow runs.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{HttpUserDirectory, HttpWorkflowQueue, LoggingWorkflowQueue, WorkflowRegistry};
use app::MentionService;
use config::Config;
use domain::ports::{TriggerRegistry, UserDirectory, WorkflowQueue};

/// Mention service as wired in production: adapters are chosen from config
pub type AppMentionService = MentionService<dyn UserDirectory, WorkflowRegistry, dyn WorkflowQueue>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub mention_service: Arc<AppMentionService>,
    pub registry: Arc<WorkflowRegistry>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Request body limit for the comment webhook
///
/// JSON escaping can roughly double the size of the comment text.
fn webhook_body_limit(max_comment_bytes: usize) -> usize {
    max_comment_bytes.saturating_mul(2).saturating_add(4096)
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    let body_limit = webhook_body_limit(state.config.max_comment_bytes);

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Webhooks (no auth, uses signature verification)
        .route(
            "/webhooks/comments",
            post(handlers::comment_webhook).layer(DefaultBodyLimit::max(body_limit)),
        )
        // Tokenizer for presentation layers
        .route("/mentions/extract", post(handlers::post_extract))
        // Workflow administration
        .nest(
            "/workflows",
            Router::new()
                .route("/", get(handlers::list_workflows))
                .route("/reload", post(handlers::reload_workflows))
                .route("/validate", post(handlers::validate_workflow))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::admin_auth_middleware,
                )),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mention_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mention relay...");

    // Load configuration
    let config = Config::from_env()?;

    // Workflow definitions are validated up front; a bad definition stops startup
    tracing::info!(dir = %config.workflows_dir.display(), "Loading workflows...");
    let registry = Arc::new(
        WorkflowRegistry::from_dir(&config.workflows_dir)
            .context("Failed to load workflow definitions")?,
    );
    tracing::info!(
        workflows = registry.snapshot().workflows.len(),
        "Workflows loaded"
    );

    // Create adapters
    let users: Arc<dyn UserDirectory> = Arc::new(HttpUserDirectory::new(
        config.user_directory_url.clone(),
        config.user_directory_token.clone(),
    ));

    let queue: Arc<dyn WorkflowQueue> = match &config.workflow_engine_url {
        Some(url) => Arc::new(HttpWorkflowQueue::new(
            url.clone(),
            config.workflow_engine_token.clone(),
        )),
        None => {
            tracing::warn!("WORKFLOW_ENGINE_URL not set, workflow runs will only be logged");
            Arc::new(LoggingWorkflowQueue)
        }
    };

    // Create application services
    let mention_service = Arc::new(MentionService::new(
        users,
        registry.clone(),
        queue,
        config.mention_policy,
        config.max_comment_bytes,
    ));

    // Create app state
    let state = AppState {
        mention_service,
        registry,
        config: config.clone(),
    };

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        engine = config.engine_enabled(),
        policy = %config.mention_policy,
        "Listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
