use std::{collections::HashMap, sync::Arc};

use itertools::Itertools;
use tokio::sync::RwLock;

use crate::domain::{
    ledger::ApprovalEvent,
    repository::{
        RepositoryError, TopicRepository,
        query::{CountFilter, TopicQuery},
    },
    topic::{Topic, TopicId, TopicStatus},
};

/// Record store kept in process memory.
///
/// A single lock guards topics and ledger together, which gives the same
/// all-or-nothing conditional writes as the Postgres store. Used by tests and
/// by local runs with `storage: memory`.
#[derive(Clone, Default)]
pub struct InMemoryTopicRepository {
    store: Arc<RwLock<Store>>,
}

#[derive(Default)]
struct Store {
    topics: HashMap<TopicId, Topic>,
    events: Vec<ApprovalEvent>,
}

impl InMemoryTopicRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TopicRepository for InMemoryTopicRepository {
    async fn insert(
        &self,
        topic: Topic,
        initial_event: Option<ApprovalEvent>,
    ) -> Result<Topic, RepositoryError> {
        let mut store = self.store.write().await;
        if store.topics.contains_key(&topic.id) {
            return Err(RepositoryError::DatabaseError(format!(
                "topic {} already exists",
                topic.id
            )));
        }
        store.topics.insert(topic.id, topic.clone());
        store.events.extend(initial_event);
        Ok(topic)
    }

    async fn find(&self, query: TopicQuery) -> Result<Vec<Topic>, RepositoryError> {
        let store = self.store.read().await;
        let topics = store
            .topics
            .values()
            .filter(|topic| query.matches(topic))
            .sorted_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            .cloned()
            .collect();
        Ok(topics)
    }

    async fn find_by_id(&self, id: TopicId) -> Result<Option<Topic>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.topics.get(&id).cloned())
    }

    async fn update_content(
        &self,
        topic: Topic,
        expected_status: TopicStatus,
    ) -> Result<Topic, RepositoryError> {
        let mut store = self.store.write().await;
        let stored = store
            .topics
            .get_mut(&topic.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != expected_status {
            return Err(RepositoryError::Conflict);
        }

        let Topic {
            title,
            outline,
            content_type,
            category,
            team_members,
            attachments,
            estimated_days,
            start_date,
            deadline,
            approver,
            updated_at,
            ..
        } = topic;

        stored.title = title;
        stored.outline = outline;
        stored.content_type = content_type;
        stored.category = category;
        stored.team_members = team_members;
        stored.attachments = attachments;
        stored.estimated_days = estimated_days;
        stored.start_date = start_date;
        stored.deadline = deadline;
        stored.approver = approver;
        stored.updated_at = updated_at;

        Ok(stored.clone())
    }

    async fn delete(&self, id: TopicId, expected_status: TopicStatus) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        match store.topics.get(&id) {
            None => Err(RepositoryError::NotFound),
            Some(stored) if stored.status != expected_status => Err(RepositoryError::Conflict),
            Some(_) => {
                store.topics.remove(&id);
                Ok(())
            }
        }
    }

    async fn transition(
        &self,
        topic: Topic,
        from: TopicStatus,
        event: ApprovalEvent,
    ) -> Result<Topic, RepositoryError> {
        let mut store = self.store.write().await;
        let stored = store
            .topics
            .get_mut(&topic.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != from {
            return Err(RepositoryError::Conflict);
        }

        stored.status = topic.status;
        stored.updated_at = topic.updated_at;
        let updated = stored.clone();

        store.events.push(event);
        Ok(updated)
    }

    async fn append_event(&self, event: ApprovalEvent) -> Result<ApprovalEvent, RepositoryError> {
        let mut store = self.store.write().await;
        if !store.topics.contains_key(&event.topic_id) {
            return Err(RepositoryError::NotFound);
        }
        store.events.push(event.clone());
        Ok(event)
    }

    async fn events_for(&self, topic_id: TopicId) -> Result<Vec<ApprovalEvent>, RepositoryError> {
        let store = self.store.read().await;
        let events = store
            .events
            .iter()
            .filter(|event| event.topic_id == topic_id)
            .cloned()
            .collect();
        Ok(events)
    }

    async fn count(&self, filter: CountFilter) -> Result<u64, RepositoryError> {
        let store = self.store.read().await;
        let count = store
            .topics
            .values()
            .filter(|topic| filter.matches(topic))
            .count();
        Ok(count as u64)
    }
}
