use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    actor::{Actor, Role},
    repository::TopicRepository,
    topic::{TopicId, error::WorkflowError},
};

/// Tier stamped on reviewer decisions; topics only know one tier today
pub const SINGLE_TIER_LEVEL: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Submit,
    Approve,
    Reject,
    RequestRevision,
    Comment,
}

impl ApprovalAction {
    pub const ALL: [ApprovalAction; 5] = [
        ApprovalAction::Submit,
        ApprovalAction::Approve,
        ApprovalAction::Reject,
        ApprovalAction::RequestRevision,
        ApprovalAction::Comment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Submit => "submit",
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::RequestRevision => "request_revision",
            ApprovalAction::Comment => "comment",
        }
    }

    fn is_review_decision(&self) -> bool {
        matches!(
            self,
            ApprovalAction::Approve | ApprovalAction::Reject | ApprovalAction::RequestRevision
        )
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalAction {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApprovalAction::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("unknown approval action '{}'", value))
    }
}

/// One immutable ledger entry.
///
/// The actor is captured by value so history stays accurate after the
/// person is renamed or changes role.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalEvent {
    pub id: Uuid,
    pub topic_id: TopicId,
    pub user_id: String,
    pub user_name: String,
    pub user_role: Role,
    pub action: ApprovalAction,
    pub level: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ApprovalEvent {
    pub fn record(
        topic_id: TopicId,
        actor: &Actor,
        action: ApprovalAction,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        let level = action.is_review_decision().then_some(SINGLE_TIER_LEVEL);
        Self {
            id: Uuid::new_v4(),
            topic_id,
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
            user_role: actor.role,
            action,
            level,
            comment,
            created_at: at,
        }
    }
}

/// Sorts ascending by `created_at`. Entries sharing a timestamp keep the
/// order the store returned them in, which is insertion order.
pub fn in_creation_order(mut events: Vec<ApprovalEvent>) -> Vec<ApprovalEvent> {
    events.sort_by_key(|event| event.created_at);
    events
}

/// Timestamp for the next ledger entry of a topic. Never earlier than the
/// topic's `updated_at` or the newest entry already recorded.
pub fn stamp_after(
    history: &[ApprovalEvent],
    floor: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    history
        .iter()
        .map(|event| event.created_at)
        .fold(floor.max(now), DateTime::max)
}

/// Append-only view of the approval events kept by the record store
pub struct AuditLedger<'a, R: TopicRepository> {
    repository: &'a R,
}

impl<'a, R: TopicRepository> AuditLedger<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Appends an event that is not tied to a status change
    pub async fn append(
        &self,
        topic_id: TopicId,
        actor: &Actor,
        action: ApprovalAction,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<ApprovalEvent, WorkflowError> {
        let event = ApprovalEvent::record(topic_id, actor, action, comment, at);
        self.repository
            .append_event(event)
            .await
            .map_err(|err| WorkflowError::storage("failed to append approval event", err))
    }

    /// Full history of a topic, oldest first. Reading has no side effects.
    pub async fn list_for(&self, topic_id: TopicId) -> Result<Vec<ApprovalEvent>, WorkflowError> {
        let events = self
            .repository
            .events_for(topic_id)
            .await
            .map_err(|err| WorkflowError::storage("failed to load approval history", err))?;
        Ok(in_creation_order(events))
    }
}
