//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::{Config, DEFAULT_MAX_COMMENT_BYTES};
use crate::domain::entities::{
    CommentSubmission, MentionEvent, MentionPolicy, Trigger, User, Workflow, WorkflowTrigger,
};

/// Workflow exercising every filter flavour, plus a non-mention trigger
pub const MENTION_WORKFLOW_YAML: &str = r#"
workflow:
  id: page-on-urgent-mention
  name: Page on urgent mention
  description: Page the mentioned responder when a comment is urgent
  triggers:
    - type: user_assigned
      filters:
        - key: mentioned_user
          value: john.doe
        - key: comment_text
          value: "urgent|sev1"
          is_regex: true
        - key: mentioned_by
          value: bot-user
          exclude: true
    - type: manual
  actions:
    - name: page-responder
      provider:
        type: console
        with:
          message: "{{ event.mentioned_user }} was mentioned"
"#;

/// Workflow that fires on every mention
pub const MINIMAL_WORKFLOW_YAML: &str = r#"
workflow:
  id: notify-mentions
  triggers:
    - type: user_assigned
"#;

/// Create a directory user whose username is `username`
pub fn test_user(username: &str) -> User {
    User {
        id: format!("user-{}", username),
        username: username.to_string(),
        email: Some(format!("{}@example.com", username)),
        name: None,
    }
}

/// Create a comment submission with the given text
pub fn test_submission(text: &str) -> CommentSubmission {
    CommentSubmission {
        incident_id: "inc-1001".to_string(),
        comment_id: "comment-42".to_string(),
        author: "oncall@example.com".to_string(),
        text: text.to_string(),
    }
}

/// Create a mention event for `alice`
pub fn test_event() -> MentionEvent {
    test_event_for("alice")
}

/// Create a mention event for a specific user
pub fn test_event_for(mentioned_user: &str) -> MentionEvent {
    MentionEvent::new(
        &test_submission(&format!("@{} please take a look", mentioned_user)),
        mentioned_user,
    )
}

/// Create an enabled workflow with a single unfiltered `user_assigned` trigger
pub fn test_workflow(id: &str) -> Workflow {
    Workflow {
        id: id.to_string(),
        name: format!("Test workflow {}", id),
        description: None,
        disabled: false,
        triggers: vec![WorkflowTrigger::UserAssigned(Trigger::default())],
    }
}

/// Configuration with no secrets and no external services
pub fn test_config() -> Config {
    Config {
        port: 0,
        workflows_dir: "./workflows".into(),
        user_directory_url: "http://users.test".to_string(),
        user_directory_token: None,
        workflow_engine_url: None,
        workflow_engine_token: None,
        webhook_secret: None,
        admin_token: None,
        max_comment_bytes: DEFAULT_MAX_COMMENT_BYTES,
        mention_policy: MentionPolicy::PerOccurrence,
    }
}

/// `sha256=<hex>` HMAC signature of a webhook body
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
