//! Workflow domain entity
//!
//! Compiled workflow definitions as far as this service cares about them:
//! identity, enabled state and triggers. Steps and actions belong to the
//! workflow engine and are not modelled.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EventField, MentionEvent};
use crate::error::ConfigurationError;

/// Upper bound on the compiled size of a filter regex
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Kind of event a workflow trigger listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Alert,
    Incident,
    Manual,
    Interval,
    UserAssigned,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKind::Alert => write!(f, "alert"),
            TriggerKind::Incident => write!(f, "incident"),
            TriggerKind::Manual => write!(f, "manual"),
            TriggerKind::Interval => write!(f, "interval"),
            TriggerKind::UserAssigned => write!(f, "user_assigned"),
        }
    }
}

impl std::str::FromStr for TriggerKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alert" => Ok(TriggerKind::Alert),
            "incident" => Ok(TriggerKind::Incident),
            "manual" => Ok(TriggerKind::Manual),
            "interval" => Ok(TriggerKind::Interval),
            "user_assigned" => Ok(TriggerKind::UserAssigned),
            _ => Err(ConfigurationError::UnknownTriggerType(s.to_string())),
        }
    }
}

/// What a filter compares the event field against
#[derive(Debug, Clone)]
pub enum FilterPattern {
    /// Exact string equality
    Literal(String),
    /// Regex search anywhere in the field
    Regex(Regex),
}

impl FilterPattern {
    pub fn as_str(&self) -> &str {
        match self {
            FilterPattern::Literal(value) => value,
            FilterPattern::Regex(re) => re.as_str(),
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, FilterPattern::Regex(_))
    }
}

/// A single key/value predicate narrowing when a trigger fires
#[derive(Debug, Clone)]
pub struct TriggerFilter {
    pub key: EventField,
    pub pattern: FilterPattern,
    pub exclude: bool,
}

impl TriggerFilter {
    /// Build a filter from its declared parts, validating the key and
    /// compiling the pattern when it is a regex.
    pub fn new(
        key: &str,
        value: &str,
        is_regex: bool,
        exclude: bool,
    ) -> Result<Self, ConfigurationError> {
        let key: EventField = key.parse()?;
        let pattern = if is_regex {
            let re = RegexBuilder::new(value)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .map_err(|source| ConfigurationError::InvalidRegex {
                    pattern: value.to_string(),
                    source,
                })?;
            FilterPattern::Regex(re)
        } else {
            FilterPattern::Literal(value.to_string())
        };

        Ok(Self {
            key,
            pattern,
            exclude,
        })
    }

    pub fn literal(key: EventField, value: impl Into<String>) -> Self {
        Self {
            key,
            pattern: FilterPattern::Literal(value.into()),
            exclude: false,
        }
    }

    pub fn excluding(mut self) -> Self {
        self.exclude = true;
        self
    }
}

/// A `user_assigned` trigger: fires when every filter passes
#[derive(Debug, Clone, Default)]
pub struct Trigger {
    pub filters: Vec<TriggerFilter>,
}

impl Trigger {
    pub fn new(filters: Vec<TriggerFilter>) -> Self {
        Self { filters }
    }
}

/// A trigger as declared on a workflow
///
/// Only `user_assigned` triggers are compiled; the other kinds are evaluated
/// by the workflow engine itself.
#[derive(Debug, Clone)]
pub enum WorkflowTrigger {
    UserAssigned(Trigger),
    Other(TriggerKind),
}

impl WorkflowTrigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            WorkflowTrigger::UserAssigned(_) => TriggerKind::UserAssigned,
            WorkflowTrigger::Other(kind) => *kind,
        }
    }
}

/// A loaded workflow definition
#[derive(Debug, Clone)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub disabled: bool,
    pub triggers: Vec<WorkflowTrigger>,
}

impl Workflow {
    pub fn user_assigned_triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter().filter_map(|t| match t {
            WorkflowTrigger::UserAssigned(trigger) => Some(trigger),
            WorkflowTrigger::Other(_) => None,
        })
    }
}

/// Immutable set of workflows shared by in-flight evaluations
#[derive(Debug, Clone)]
pub struct WorkflowSnapshot {
    pub workflows: Vec<Workflow>,
    pub loaded_at: DateTime<Utc>,
}

impl WorkflowSnapshot {
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows,
            loaded_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

/// A request for the workflow engine to run a workflow for a mention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunRequest {
    pub run_id: Uuid,
    pub workflow_id: String,
    pub workflow_name: String,
    pub triggered_by: TriggerKind,
    pub event: MentionEvent,
    pub queued_at: DateTime<Utc>,
}

impl WorkflowRunRequest {
    pub fn user_assigned(workflow: &Workflow, event: MentionEvent) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            workflow_id: workflow.id.clone(),
            workflow_name: workflow.name.clone(),
            triggered_by: TriggerKind::UserAssigned,
            event,
            queued_at: Utc::now(),
        }
    }
}
