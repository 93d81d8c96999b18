//! Domain entities
//!
//! Pure domain models representing core business concepts.

pub mod mention;
pub mod user;
pub mod workflow;

pub use mention::{CommentSubmission, EventField, MentionEvent, MentionPolicy};
pub use user::User;
pub use workflow::{
    FilterPattern, Trigger, TriggerFilter, TriggerKind, Workflow, WorkflowRunRequest,
    WorkflowSnapshot, WorkflowTrigger,
};
