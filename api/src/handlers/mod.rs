//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod comments;
pub mod mentions;
pub mod workflows;

pub use comments::comment_webhook;
pub use mentions::post_extract;
pub use workflows::{list_workflows, reload_workflows, validate_workflow};
