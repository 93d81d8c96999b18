//! Mention domain entity
//!
//! A mention event is materialized for every `@user` tag in an incident
//! comment that resolves to a known user. Events are transient: they are
//! evaluated against the registered triggers and handed to the workflow
//! engine, never stored here.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// A comment submitted on an incident, as received from the incident API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSubmission {
    pub incident_id: String,
    pub comment_id: String,
    /// Identifier (email or username) of the comment's author
    pub author: String,
    pub text: String,
}

/// A single mention of a known user inside an incident comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEvent {
    pub incident_id: String,
    pub comment_id: String,
    pub mentioned_user: String,
    pub mentioned_by: String,
    pub comment_text: String,
}

impl MentionEvent {
    pub fn new(submission: &CommentSubmission, mentioned_user: impl Into<String>) -> Self {
        Self {
            incident_id: submission.incident_id.clone(),
            comment_id: submission.comment_id.clone(),
            mentioned_user: mentioned_user.into(),
            mentioned_by: submission.author.clone(),
            comment_text: submission.text.clone(),
        }
    }

    /// Value of the field a trigger filter refers to
    pub fn field(&self, field: EventField) -> &str {
        match field {
            EventField::IncidentId => &self.incident_id,
            EventField::CommentId => &self.comment_id,
            EventField::MentionedUser => &self.mentioned_user,
            EventField::MentionedBy => &self.mentioned_by,
            EventField::CommentText => &self.comment_text,
        }
    }
}

/// Fields of a mention event that a `user_assigned` filter may name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    IncidentId,
    CommentId,
    MentionedUser,
    MentionedBy,
    CommentText,
}

impl EventField {
    pub const ALL: [EventField; 5] = [
        EventField::IncidentId,
        EventField::CommentId,
        EventField::MentionedUser,
        EventField::MentionedBy,
        EventField::CommentText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventField::IncidentId => "incident_id",
            EventField::CommentId => "comment_id",
            EventField::MentionedUser => "mentioned_user",
            EventField::MentionedBy => "mentioned_by",
            EventField::CommentText => "comment_text",
        }
    }
}

impl std::fmt::Display for EventField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventField {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownFilterKey {
                key: s.to_string(),
                expected: EventField::ALL
                    .iter()
                    .map(EventField::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// How repeated mentions of the same user in one comment become events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionPolicy {
    /// Every occurrence triggers workflows separately
    #[default]
    PerOccurrence,
    /// One event per distinct user, in first-occurrence order
    PerUser,
}

impl std::fmt::Display for MentionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MentionPolicy::PerOccurrence => write!(f, "per_occurrence"),
            MentionPolicy::PerUser => write!(f, "per_user"),
        }
    }
}

impl std::str::FromStr for MentionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per_occurrence" | "occurrence" => Ok(MentionPolicy::PerOccurrence),
            "per_user" | "user" | "unique" => Ok(MentionPolicy::PerUser),
            _ => Err(format!("Unknown mention policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_field_parses_every_recognized_key() {
        for key in [
            "incident_id",
            "comment_id",
            "mentioned_user",
            "mentioned_by",
            "comment_text",
        ] {
            let field: EventField = key.parse().unwrap();
            assert_eq!(field.as_str(), key);
        }
    }

    #[test]
    fn event_field_rejects_unknown_key() {
        let err = "severity".parse::<EventField>().unwrap_err();
        match err {
            ConfigurationError::UnknownFilterKey { key, expected } => {
                assert_eq!(key, "severity");
                assert!(expected.contains("mentioned_user"));
            }
            other => panic!("Expected UnknownFilterKey, got {other:?}"),
        }
    }

    #[test]
    fn event_field_lookup() {
        let submission = CommentSubmission {
            incident_id: "inc-1".to_string(),
            comment_id: "c-9".to_string(),
            author: "alice@example.com".to_string(),
            text: "ping @bob".to_string(),
        };
        let event = MentionEvent::new(&submission, "bob");

        assert_eq!(event.field(EventField::IncidentId), "inc-1");
        assert_eq!(event.field(EventField::CommentId), "c-9");
        assert_eq!(event.field(EventField::MentionedUser), "bob");
        assert_eq!(event.field(EventField::MentionedBy), "alice@example.com");
        assert_eq!(event.field(EventField::CommentText), "ping @bob");
    }

    #[test]
    fn mention_policy_from_str() {
        assert_eq!(
            "per_occurrence".parse::<MentionPolicy>().unwrap(),
            MentionPolicy::PerOccurrence
        );
        assert_eq!(
            "PER_USER".parse::<MentionPolicy>().unwrap(),
            MentionPolicy::PerUser
        );
        assert!("sometimes".parse::<MentionPolicy>().is_err());
    }
}
