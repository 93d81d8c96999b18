//! Trigger filter matching for `user_assigned` workflows
//!
//! Decides which workflows a mention event starts. Pure: no I/O, no shared
//! state beyond the snapshot passed in.

use crate::domain::entities::{
    FilterPattern, MentionEvent, Trigger, TriggerFilter, Workflow, WorkflowSnapshot,
};

/// Whether a single filter passes for the event
pub fn filter_passes(event: &MentionEvent, filter: &TriggerFilter) -> bool {
    let actual = event.field(filter.key);
    let raw_match = match &filter.pattern {
        FilterPattern::Literal(expected) => actual == expected,
        FilterPattern::Regex(re) => re.is_match(actual),
    };

    raw_match != filter.exclude
}

/// Whether the trigger fires for the event
///
/// Filters are conjunctive; a trigger without filters fires for every event.
pub fn matches(event: &MentionEvent, trigger: &Trigger) -> bool {
    trigger.filters.iter().all(|f| filter_passes(event, f))
}

/// Enabled workflows with at least one matching `user_assigned` trigger
///
/// Each workflow appears at most once, in snapshot order.
pub fn matching_workflows<'a>(
    event: &MentionEvent,
    snapshot: &'a WorkflowSnapshot,
) -> Vec<&'a Workflow> {
    snapshot
        .workflows
        .iter()
        .filter(|w| !w.disabled)
        .filter(|w| w.user_assigned_triggers().any(|t| matches(event, t)))
        .collect()
}
