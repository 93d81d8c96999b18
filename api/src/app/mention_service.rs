//! Mention service
//!
//! Turns a submitted incident comment into workflow runs:
//! extract `@user` tags, drop the ones the user directory does not know,
//! evaluate every `user_assigned` trigger and hand matches to the queue.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::app::mention_parser::{dedup_mentions, extract_mentions};
use crate::app::trigger_matcher::matching_workflows;
use crate::domain::entities::{
    CommentSubmission, MentionEvent, MentionPolicy, User, WorkflowRunRequest,
};
use crate::domain::ports::{TriggerRegistry, UserDirectory, WorkflowQueue};
use crate::error::{AppError, DomainError, UnknownUserError};

/// A run handed to the workflow queue
#[derive(Debug, Clone, Serialize)]
pub struct QueuedRun {
    pub run_id: Uuid,
    pub workflow_id: String,
    pub mentioned_user: String,
}

/// What happened to a submitted comment
#[derive(Debug, Clone, Default, Serialize)]
pub struct MentionOutcome {
    /// Tokens found in the text, one per occurrence
    pub mentions: Vec<String>,
    /// Tokens that did not resolve to a known user
    pub dropped: Vec<String>,
    pub events: Vec<MentionEvent>,
    pub queued: Vec<QueuedRun>,
    /// Runs the queue refused
    pub failed: usize,
}

/// Service for processing comment mentions
pub struct MentionService<UD, TR, WQ>
where
    UD: UserDirectory + ?Sized,
    TR: TriggerRegistry + ?Sized,
    WQ: WorkflowQueue + ?Sized,
{
    users: Arc<UD>,
    registry: Arc<TR>,
    queue: Arc<WQ>,
    policy: MentionPolicy,
    max_comment_bytes: usize,
}

impl<UD, TR, WQ> MentionService<UD, TR, WQ>
where
    UD: UserDirectory + ?Sized,
    TR: TriggerRegistry + ?Sized,
    WQ: WorkflowQueue + ?Sized,
{
    pub fn new(
        users: Arc<UD>,
        registry: Arc<TR>,
        queue: Arc<WQ>,
        policy: MentionPolicy,
        max_comment_bytes: usize,
    ) -> Self {
        Self {
            users,
            registry,
            queue,
            policy,
            max_comment_bytes,
        }
    }

    pub fn policy(&self) -> MentionPolicy {
        self.policy
    }

    /// Process a submitted comment end to end
    ///
    /// Users are resolved before anything is enqueued, so a directory outage
    /// fails the whole comment instead of dispatching part of it.
    pub async fn process_comment(
        &self,
        submission: &CommentSubmission,
    ) -> Result<MentionOutcome, AppError> {
        self.validate(submission)?;

        let mentions = extract_mentions(&submission.text);
        if mentions.is_empty() {
            tracing::debug!(
                incident_id = %submission.incident_id,
                comment_id = %submission.comment_id,
                "Comment has no mentions"
            );
            return Ok(MentionOutcome::default());
        }

        tracing::info!(
            incident_id = %submission.incident_id,
            comment_id = %submission.comment_id,
            mentions = ?mentions,
            "Found mentions in comment"
        );

        let (known, dropped) = self.resolve_all(submission, &mentions).await?;

        let mut resolved: Vec<&User> = mentions.iter().filter_map(|t| known.get(t)).collect();
        if self.policy == MentionPolicy::PerUser {
            // Different tokens may resolve to the same directory user
            let mut seen = HashSet::new();
            resolved.retain(|user| seen.insert(user.id.clone()));
        }
        let events: Vec<MentionEvent> = resolved
            .into_iter()
            .map(|user| MentionEvent::new(submission, user.username.clone()))
            .collect();

        let mut outcome = MentionOutcome {
            mentions,
            dropped,
            events: Vec::with_capacity(events.len()),
            queued: Vec::new(),
            failed: 0,
        };

        let snapshot = self.registry.snapshot();
        for event in events {
            for workflow in matching_workflows(&event, &snapshot) {
                let run = WorkflowRunRequest::user_assigned(workflow, event.clone());
                match self.queue.enqueue_workflow_run(&run).await {
                    Ok(()) => {
                        tracing::info!(
                            run_id = %run.run_id,
                            workflow_id = %run.workflow_id,
                            incident_id = %event.incident_id,
                            mentioned_user = %event.mentioned_user,
                            "Workflow run queued for user_assigned event"
                        );
                        outcome.queued.push(QueuedRun {
                            run_id: run.run_id,
                            workflow_id: run.workflow_id,
                            mentioned_user: event.mentioned_user.clone(),
                        });
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            workflow_id = %run.workflow_id,
                            incident_id = %event.incident_id,
                            "Failed to queue workflow run"
                        );
                        outcome.failed += 1;
                    }
                }
            }
            outcome.events.push(event);
        }

        Ok(outcome)
    }

    fn validate(&self, submission: &CommentSubmission) -> Result<(), DomainError> {
        for (name, value) in [
            ("incident_id", &submission.incident_id),
            ("comment_id", &submission.comment_id),
            ("author", &submission.author),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!("{} must not be empty", name)));
            }
        }

        if submission.text.len() > self.max_comment_bytes {
            return Err(DomainError::TooLarge(format!(
                "comment is {} bytes, limit is {}",
                submission.text.len(),
                self.max_comment_bytes
            )));
        }

        Ok(())
    }

    /// Look up each distinct token once
    async fn resolve_all(
        &self,
        submission: &CommentSubmission,
        mentions: &[String],
    ) -> Result<(HashMap<String, User>, Vec<String>), AppError> {
        let mut known = HashMap::new();
        let mut dropped = Vec::new();

        for token in dedup_mentions(mentions.to_vec()) {
            match self.users.resolve_user(&token).await? {
                Some(user) => {
                    known.insert(token, user);
                }
                None => {
                    let err = UnknownUserError(token);
                    tracing::debug!(
                        incident_id = %submission.incident_id,
                        comment_id = %submission.comment_id,
                        error = %err,
                        "Dropping mention"
                    );
                    dropped.push(err.0);
                }
            }
        }

        Ok((known, dropped))
    }
}
