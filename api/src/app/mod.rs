//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod mention_parser;
pub mod mention_service;
pub mod trigger_matcher;
pub mod workflow_loader;

pub use mention_parser::{extract_mentions, unique_mentions};
#[allow(unused_imports)]
pub use mention_service::{MentionOutcome, MentionService, QueuedRun};
// Re-export trigger matching for direct evaluation of events
#[allow(unused_imports)]
pub use trigger_matcher::{matches, matching_workflows};
pub use workflow_loader::{load_workflow_dir, load_workflow_str};
