use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    actor::Actor,
    ledger::{ApprovalAction, ApprovalEvent},
    topic::{Topic, TopicStatus, error::WorkflowError, refreshed},
};

/// Named action that attempts a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Submit,
    Approve,
    Reject,
    RequestRevision,
}

impl Trigger {
    pub const ALL: [Trigger; 4] = [
        Trigger::Submit,
        Trigger::Approve,
        Trigger::Reject,
        Trigger::RequestRevision,
    ];

    /// Ledger action written when this trigger succeeds
    pub fn action(&self) -> ApprovalAction {
        match self {
            Trigger::Submit => ApprovalAction::Submit,
            Trigger::Approve => ApprovalAction::Approve,
            Trigger::Reject => ApprovalAction::Reject,
            Trigger::RequestRevision => ApprovalAction::RequestRevision,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Submit => "submit",
            Trigger::Approve => "approve",
            Trigger::Reject => "reject",
            Trigger::RequestRevision => "request revision for",
        };
        f.write_str(name)
    }
}

/// The whole transition table.
///
/// | trigger          | from                      | to                |
/// |------------------|---------------------------|-------------------|
/// | submit           | draft, revision_required  | pending           |
/// | approve          | pending                   | approved          |
/// | reject           | pending                   | rejected          |
/// | request_revision | pending                   | revision_required |
pub fn next_status(from: TopicStatus, trigger: Trigger) -> Result<TopicStatus, WorkflowError> {
    use TopicStatus::*;

    match (trigger, from) {
        (Trigger::Submit, Draft | RevisionRequired) => Ok(Pending),
        (Trigger::Approve, Pending) => Ok(Approved),
        (Trigger::Reject, Pending) => Ok(Rejected),
        (Trigger::RequestRevision, Pending) => Ok(RevisionRequired),
        _ => Err(WorkflowError::InvalidStateTransition { from, trigger }),
    }
}

/// Outcome of a legal trigger, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Status the write is conditional on
    pub from: TopicStatus,
    /// Topic with the new status and refreshed `updated_at`
    pub topic: Topic,
    /// The single ledger entry recording this transition
    pub event: ApprovalEvent,
}

/// Plans `trigger` against `topic` without touching it.
///
/// The caller commits `Transition` atomically (status write conditional on
/// `from` plus the ledger append), so a failure leaves no partial effects.
pub fn apply(
    topic: &Topic,
    trigger: Trigger,
    actor: &Actor,
    comment: Option<String>,
    now: DateTime<Utc>,
) -> Result<Transition, WorkflowError> {
    let to = next_status(topic.status, trigger)?;

    let mut next = topic.clone();
    next.status = to;
    next.updated_at = refreshed(topic.updated_at, now);

    let event = ApprovalEvent::record(topic.id, actor, trigger.action(), comment, next.updated_at);

    Ok(Transition {
        from: topic.status,
        topic: next,
        event,
    })
}
