use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{
    ledger::ApprovalEvent,
    repository::query::{CountFilter, TopicQuery},
    topic::{Topic, TopicId, TopicStatus},
};

pub mod query;

/// Record store for topics and their append-only approval ledger.
///
/// Every write that depends on the topic's status is conditional on
/// `status = expected` and fails with [`RepositoryError::Conflict`] when the
/// stored status differs. Topic row and ledger row are written atomically.
pub trait TopicRepository: Clone + Send + Sync + 'static {
    /// Store a new topic, plus its first ledger entry when it starts out submitted
    fn insert(
        &self,
        topic: Topic,
        initial_event: Option<ApprovalEvent>,
    ) -> impl Future<Output = Result<Topic, RepositoryError>> + Send;

    /// Find topics matching query, newest first
    fn find(
        &self,
        query: TopicQuery,
    ) -> impl Future<Output = Result<Vec<Topic>, RepositoryError>> + Send;

    /// Find single topic by ID
    fn find_by_id(
        &self,
        id: TopicId,
    ) -> impl Future<Output = Result<Option<Topic>, RepositoryError>> + Send;

    /// Overwrite the content fields and `updated_at`; status and owner are left alone
    fn update_content(
        &self,
        topic: Topic,
        expected_status: TopicStatus,
    ) -> impl Future<Output = Result<Topic, RepositoryError>> + Send;

    /// Delete a topic still in `expected_status`
    fn delete(
        &self,
        id: TopicId,
        expected_status: TopicStatus,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Move `topic.id` from `from` to `topic.status` and append `event`, all or nothing
    fn transition(
        &self,
        topic: Topic,
        from: TopicStatus,
        event: ApprovalEvent,
    ) -> impl Future<Output = Result<Topic, RepositoryError>> + Send;

    /// Append an event that does not change the topic
    fn append_event(
        &self,
        event: ApprovalEvent,
    ) -> impl Future<Output = Result<ApprovalEvent, RepositoryError>> + Send;

    /// Ledger of one topic in insertion order
    fn events_for(
        &self,
        topic_id: TopicId,
    ) -> impl Future<Output = Result<Vec<ApprovalEvent>, RepositoryError>> + Send;

    /// Number of topics matching filter
    fn count(
        &self,
        filter: CountFilter,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    /// The conditional write lost against a concurrent change
    #[error("stored status differs from the expected one")]
    Conflict,

    #[error("database error: {0}")]
    DatabaseError(String),
}

/// Half-open `[start, end)` range of creation timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CreatedWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}
