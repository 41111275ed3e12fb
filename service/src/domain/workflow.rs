use chrono::{DateTime, Utc};

use crate::domain::{
    actor::Actor,
    guard::{self, Operation},
    ledger::{ApprovalAction, ApprovalEvent, AuditLedger, stamp_after},
    repository::{RepositoryError, TopicRepository, query::TopicQuery},
    stats::{self, TopicStats},
    topic::{
        NewTopic, Topic, TopicId, TopicPatch, TopicStatus,
        error::WorkflowError,
        lifecycle::{self, Trigger},
    },
};

/// Topic together with its ledger, oldest event first
#[derive(Debug, Clone, PartialEq)]
pub struct TopicDetails {
    pub topic: Topic,
    pub approval_history: Vec<ApprovalEvent>,
}

/// Entry point for every workflow operation.
///
/// Each call loads the topic fresh, runs the authorization guard, then the
/// state machine, then commits through a conditional write. Errors are
/// handed back untouched.
#[derive(Clone)]
pub struct WorkflowService<R: TopicRepository> {
    repository: R,
}

impl<R: TopicRepository> WorkflowService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    fn ledger(&self) -> AuditLedger<'_, R> {
        AuditLedger::new(&self.repository)
    }

    pub async fn create(&self, data: NewTopic, actor: &Actor) -> Result<Topic, WorkflowError> {
        let now = Utc::now();
        let is_draft = data.is_draft;
        let topic = data.into_topic(actor, now)?;

        let initial_event = (!is_draft)
            .then(|| ApprovalEvent::record(topic.id, actor, ApprovalAction::Submit, None, now));

        let topic = self
            .repository
            .insert(topic, initial_event)
            .await
            .map_err(|err| WorkflowError::storage("failed to store topic", err))?;

        tracing::info!(
            topic_id = %topic.id,
            actor_id = %actor.id,
            status = %topic.status,
            "topic created"
        );
        Ok(topic)
    }

    pub async fn list(&self, query: TopicQuery) -> Result<Vec<Topic>, WorkflowError> {
        self.repository
            .find(query)
            .await
            .map_err(|err| WorkflowError::storage("failed to list topics", err))
    }

    pub async fn get(&self, id: TopicId) -> Result<TopicDetails, WorkflowError> {
        let topic = self.load(id).await?;
        self.with_history(topic).await
    }

    pub async fn history(&self, id: TopicId) -> Result<Vec<ApprovalEvent>, WorkflowError> {
        self.load(id).await?;
        self.ledger().list_for(id).await
    }

    pub async fn update(
        &self,
        id: TopicId,
        patch: TopicPatch,
        actor: &Actor,
    ) -> Result<Topic, WorkflowError> {
        let topic = self.load(id).await?;
        guard::can_edit(actor, &topic).inspect_err(|err| denied(id, actor, err))?;

        let patched = patch.apply_to(&topic, Utc::now())?;
        let updated = match self.repository.update_content(patched, topic.status).await {
            Ok(updated) => updated,
            Err(err) => {
                return Err(self
                    .lost_race(id, err, |status| WorkflowError::InvalidStateForOperation {
                        operation: Operation::Edit,
                        status,
                    })
                    .await);
            }
        };

        tracing::info!(topic_id = %id, actor_id = %actor.id, "topic updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: TopicId, actor: &Actor) -> Result<(), WorkflowError> {
        let topic = self.load(id).await?;
        guard::can_delete(actor, &topic).inspect_err(|err| denied(id, actor, err))?;

        if let Err(err) = self.repository.delete(id, TopicStatus::Draft).await {
            return Err(self
                .lost_race(id, err, |status| WorkflowError::InvalidStateForOperation {
                    operation: Operation::Delete,
                    status,
                })
                .await);
        }

        tracing::info!(topic_id = %id, actor_id = %actor.id, "topic deleted");
        Ok(())
    }

    pub async fn submit(&self, id: TopicId, actor: &Actor) -> Result<Topic, WorkflowError> {
        let details = self.fire(id, actor, Trigger::Submit, None).await?;
        Ok(details.topic)
    }

    pub async fn approve(
        &self,
        id: TopicId,
        actor: &Actor,
        comment: Option<String>,
    ) -> Result<TopicDetails, WorkflowError> {
        self.fire(id, actor, Trigger::Approve, comment).await
    }

    pub async fn reject(
        &self,
        id: TopicId,
        actor: &Actor,
        comment: Option<String>,
    ) -> Result<TopicDetails, WorkflowError> {
        self.fire(id, actor, Trigger::Reject, comment).await
    }

    pub async fn request_revision(
        &self,
        id: TopicId,
        actor: &Actor,
        comment: Option<String>,
    ) -> Result<TopicDetails, WorkflowError> {
        self.fire(id, actor, Trigger::RequestRevision, comment).await
    }

    /// Adds a remark to the ledger without moving the topic
    pub async fn comment(
        &self,
        id: TopicId,
        actor: &Actor,
        comment: String,
    ) -> Result<ApprovalEvent, WorkflowError> {
        let topic = self.load(id).await?;
        guard::can_comment(actor, &topic, Some(&comment)).inspect_err(|err| denied(id, actor, err))?;

        let history = self.ledger().list_for(id).await?;
        let at = stamp_after(&history, topic.updated_at, Utc::now());
        let event = self
            .ledger()
            .append(id, actor, ApprovalAction::Comment, Some(comment.trim().to_string()), at)
            .await?;

        tracing::info!(topic_id = %id, actor_id = %actor.id, "comment recorded");
        Ok(event)
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> Result<TopicStats, WorkflowError> {
        let counts = stats::gather(&self.repository, now)
            .await
            .map_err(|err| WorkflowError::storage("failed to count topics", err))?;
        Ok(counts.into_stats(now))
    }

    /// Runs one transition and returns the ledger read before the write plus
    /// the new event.
    async fn fire(
        &self,
        id: TopicId,
        actor: &Actor,
        trigger: Trigger,
        comment: Option<String>,
    ) -> Result<TopicDetails, WorkflowError> {
        let topic = self.load(id).await?;

        let allowed = match trigger {
            Trigger::Submit => guard::can_submit(actor, &topic),
            _ => guard::can_review(actor, &topic, trigger, comment.as_deref()),
        };
        allowed.inspect_err(|err| denied(id, actor, err))?;

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let mut history = self.ledger().list_for(id).await?;
        let now = stamp_after(&history, topic.updated_at, Utc::now());
        let transition = lifecycle::apply(&topic, trigger, actor, comment, now)
            .inspect_err(|err| denied(id, actor, err))?;

        let from = transition.from;
        let event = transition.event.clone();
        let updated = match self
            .repository
            .transition(transition.topic, from, transition.event)
            .await
        {
            Ok(updated) => updated,
            Err(err) => {
                return Err(self
                    .lost_race(id, err, |status| WorkflowError::InvalidStateTransition {
                        from: status,
                        trigger,
                    })
                    .await);
            }
        };

        tracing::info!(
            topic_id = %id,
            actor_id = %actor.id,
            from = %from,
            to = %updated.status,
            terminal = updated.status.is_terminal(),
            "topic transitioned"
        );
        history.push(event);
        Ok(TopicDetails {
            topic: updated,
            approval_history: history,
        })
    }

    async fn load(&self, id: TopicId) -> Result<Topic, WorkflowError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|err| WorkflowError::storage("failed to load topic", err))?
            .ok_or(WorkflowError::NotFound(id))
    }

    async fn with_history(&self, topic: Topic) -> Result<TopicDetails, WorkflowError> {
        let approval_history = self.ledger().list_for(topic.id).await?;
        Ok(TopicDetails {
            topic,
            approval_history,
        })
    }

    /// Turns a failed conditional write into the error the caller would have
    /// seen had it read the topic after the competing change.
    async fn lost_race(
        &self,
        id: TopicId,
        err: RepositoryError,
        on_conflict: impl FnOnce(TopicStatus) -> WorkflowError,
    ) -> WorkflowError {
        match err {
            RepositoryError::NotFound => WorkflowError::NotFound(id),
            RepositoryError::Conflict => match self.load(id).await {
                Ok(current) => {
                    tracing::warn!(topic_id = %id, status = %current.status, "concurrent change won");
                    on_conflict(current.status)
                }
                Err(err) => err,
            },
            err @ RepositoryError::DatabaseError(_) => {
                WorkflowError::storage("failed to write topic", err)
            }
        }
    }
}

fn denied(id: TopicId, actor: &Actor, err: &WorkflowError) {
    tracing::warn!(topic_id = %id, actor_id = %actor.id, role = %actor.role, "{}", err);
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use crate::{
        domain::{
            actor::Role,
            repository::query::CountFilter,
            topic::ContentType,
        },
        infrastructure::memory::InMemoryTopicRepository,
    };

    use super::*;

    /// In-memory store that can yield after each load, counts lost
    /// conditional writes and can lose its ledger once a transition commits.
    #[derive(Clone, Default)]
    struct ScriptedRepository {
        inner: InMemoryTopicRepository,
        yield_after_load: bool,
        ledger_fails_after_transition: bool,
        ledger_down: Arc<AtomicBool>,
        conflicts: Arc<AtomicUsize>,
    }

    impl TopicRepository for ScriptedRepository {
        async fn insert(
            &self,
            topic: Topic,
            initial_event: Option<ApprovalEvent>,
        ) -> Result<Topic, RepositoryError> {
            self.inner.insert(topic, initial_event).await
        }

        async fn find(&self, query: TopicQuery) -> Result<Vec<Topic>, RepositoryError> {
            self.inner.find(query).await
        }

        async fn find_by_id(&self, id: TopicId) -> Result<Option<Topic>, RepositoryError> {
            let found = self.inner.find_by_id(id).await;
            if self.yield_after_load {
                tokio::task::yield_now().await;
            }
            found
        }

        async fn update_content(
            &self,
            topic: Topic,
            expected_status: TopicStatus,
        ) -> Result<Topic, RepositoryError> {
            self.inner.update_content(topic, expected_status).await
        }

        async fn delete(
            &self,
            id: TopicId,
            expected_status: TopicStatus,
        ) -> Result<(), RepositoryError> {
            self.inner.delete(id, expected_status).await
        }

        async fn transition(
            &self,
            topic: Topic,
            from: TopicStatus,
            event: ApprovalEvent,
        ) -> Result<Topic, RepositoryError> {
            let result = self.inner.transition(topic, from, event).await;
            match &result {
                Ok(_) if self.ledger_fails_after_transition => {
                    self.ledger_down.store(true, Ordering::SeqCst)
                }
                Err(RepositoryError::Conflict) => {
                    self.conflicts.fetch_add(1, Ordering::SeqCst);
                }
                _ => {}
            }
            result
        }

        async fn append_event(
            &self,
            event: ApprovalEvent,
        ) -> Result<ApprovalEvent, RepositoryError> {
            self.inner.append_event(event).await
        }

        async fn events_for(
            &self,
            topic_id: TopicId,
        ) -> Result<Vec<ApprovalEvent>, RepositoryError> {
            if self.ledger_down.load(Ordering::SeqCst) {
                return Err(RepositoryError::DatabaseError("connection reset".to_string()));
            }
            self.inner.events_for(topic_id).await
        }

        async fn count(&self, filter: CountFilter) -> Result<u64, RepositoryError> {
            self.inner.count(filter).await
        }
    }

    fn service() -> WorkflowService<InMemoryTopicRepository> {
        WorkflowService::new(InMemoryTopicRepository::default())
    }

    fn alice() -> Actor {
        Actor::new("alice", "Alice", Role::Staff)
    }

    fn bob() -> Actor {
        Actor::new("bob", "Bob", Role::Staff)
    }

    fn chief() -> Actor {
        Actor::new("chief", "Chief Editor", Role::Leadership)
    }

    fn draft(title: &str) -> NewTopic {
        NewTopic::titled(title, ContentType::Digital)
    }

    fn submitted(title: &str) -> NewTopic {
        let mut new_topic = draft(title);
        new_topic.is_draft = false;
        new_topic
    }

    fn actions(details: &TopicDetails) -> Vec<ApprovalAction> {
        details.approval_history.iter().map(|e| e.action).collect()
    }

    #[tokio::test]
    async fn draft_creation_writes_no_ledger_entry() {
        let service = service();
        let topic = service.create(draft("A"), &alice()).await.unwrap();

        let details = service.get(topic.id).await.unwrap();
        assert_eq!(details.topic.status, TopicStatus::Draft);
        assert!(details.approval_history.is_empty());
    }

    #[tokio::test]
    async fn submitted_creation_then_approve_records_both() {
        let service = service();
        let topic = service.create(submitted("A"), &alice()).await.unwrap();
        assert_eq!(topic.status, TopicStatus::Pending);

        let details = service.approve(topic.id, &chief(), None).await.unwrap();
        assert_eq!(details.topic.status, TopicStatus::Approved);
        assert_eq!(actions(&details), vec![ApprovalAction::Submit, ApprovalAction::Approve]);
    }

    #[tokio::test]
    async fn end_to_end_draft_submit_approve() {
        let service = service();
        let topic = service.create(draft("A"), &alice()).await.unwrap();
        assert_eq!(topic.status, TopicStatus::Draft);
        assert!(service.history(topic.id).await.unwrap().is_empty());

        let topic = service.submit(topic.id, &alice()).await.unwrap();
        assert_eq!(topic.status, TopicStatus::Pending);
        let history = service.history(topic.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, ApprovalAction::Submit);

        let details = service
            .approve(topic.id, &chief(), Some("ok".to_string()))
            .await
            .unwrap();
        assert_eq!(details.topic.status, TopicStatus::Approved);
        assert_eq!(actions(&details), vec![ApprovalAction::Submit, ApprovalAction::Approve]);
        assert_eq!(details.approval_history[1].comment.as_deref(), Some("ok"));
        assert_eq!(details.approval_history[1].user_name, "Chief Editor");

        let again = service.approve(topic.id, &chief(), None).await;
        assert!(matches!(
            again,
            Err(WorkflowError::InvalidStateTransition {
                from: TopicStatus::Approved,
                trigger: Trigger::Approve
            })
        ));
        assert_eq!(service.history(topic.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn illegal_triggers_leave_topic_and_ledger_untouched() {
        let service = service();
        let topic = service.create(draft("A"), &alice()).await.unwrap();
        let before = service.get(topic.id).await.unwrap();

        for result in [
            service.approve(topic.id, &chief(), None).await,
            service.reject(topic.id, &chief(), Some("no".to_string())).await,
            service
                .request_revision(topic.id, &chief(), Some("more".to_string()))
                .await,
        ] {
            assert!(matches!(result, Err(WorkflowError::InvalidStateTransition { .. })));
        }

        assert_eq!(service.get(topic.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn strangers_cannot_touch_someone_elses_topic() {
        let service = service();
        let topic = service.create(draft("A"), &alice()).await.unwrap();
        let before = service.get(topic.id).await.unwrap();

        let patch = TopicPatch {
            title: Some("Hijacked".to_string()),
            ..TopicPatch::default()
        };
        assert!(matches!(
            service.update(topic.id, patch, &bob()).await,
            Err(WorkflowError::Unauthorized(_))
        ));
        assert!(matches!(
            service.delete(topic.id, &bob()).await,
            Err(WorkflowError::Unauthorized(_))
        ));
        assert!(matches!(
            service.submit(topic.id, &bob()).await,
            Err(WorkflowError::Unauthorized(_))
        ));

        assert_eq!(service.get(topic.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn reject_requires_comment() {
        let service = service();
        let topic = service.create(submitted("A"), &alice()).await.unwrap();

        assert!(matches!(
            service.reject(topic.id, &chief(), None).await,
            Err(WorkflowError::ValidationError(_))
        ));
        assert_eq!(service.history(topic.id).await.unwrap().len(), 1);

        let details = service
            .reject(topic.id, &chief(), Some("needs sources".to_string()))
            .await
            .unwrap();
        assert_eq!(details.topic.status, TopicStatus::Rejected);
        assert_eq!(actions(&details), vec![ApprovalAction::Submit, ApprovalAction::Reject]);
    }

    #[tokio::test]
    async fn staff_cannot_approve_even_their_own_topic() {
        let service = service();
        let topic = service.create(submitted("A"), &alice()).await.unwrap();

        assert!(matches!(
            service.approve(topic.id, &alice(), None).await,
            Err(WorkflowError::Unauthorized(_))
        ));
        assert_eq!(
            service.get(topic.id).await.unwrap().topic.status,
            TopicStatus::Pending
        );
    }

    #[tokio::test]
    async fn revision_round_trip() {
        let service = service();
        let topic = service.create(submitted("A"), &alice()).await.unwrap();

        let details = service
            .request_revision(topic.id, &chief(), Some("add a source".to_string()))
            .await
            .unwrap();
        assert_eq!(details.topic.status, TopicStatus::RevisionRequired);

        let patch = TopicPatch {
            outline: Some("now with sources".to_string()),
            ..TopicPatch::default()
        };
        let updated = service.update(topic.id, patch, &alice()).await.unwrap();
        assert_eq!(updated.outline, "now with sources");
        assert_eq!(updated.status, TopicStatus::RevisionRequired);

        let resubmitted = service.submit(topic.id, &alice()).await.unwrap();
        assert_eq!(resubmitted.status, TopicStatus::Pending);

        let history = service.history(topic.id).await.unwrap();
        let actions: Vec<_> = history.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                ApprovalAction::Submit,
                ApprovalAction::RequestRevision,
                ApprovalAction::Submit
            ]
        );
    }

    #[tokio::test]
    async fn pending_topics_are_frozen_for_the_owner() {
        let service = service();
        let topic = service.create(submitted("A"), &alice()).await.unwrap();

        let patch = TopicPatch {
            outline: Some("late change".to_string()),
            ..TopicPatch::default()
        };
        assert!(matches!(
            service.update(topic.id, patch, &alice()).await,
            Err(WorkflowError::InvalidStateForOperation { operation: Operation::Edit, .. })
        ));
        assert!(matches!(
            service.delete(topic.id, &alice()).await,
            Err(WorkflowError::InvalidStateForOperation { operation: Operation::Delete, .. })
        ));
    }

    #[tokio::test]
    async fn owner_deletes_draft() {
        let service = service();
        let topic = service.create(draft("A"), &alice()).await.unwrap();

        service.delete(topic.id, &alice()).await.unwrap();
        assert!(matches!(
            service.get(topic.id).await,
            Err(WorkflowError::NotFound(id)) if id == topic.id
        ));
    }

    #[tokio::test]
    async fn unknown_topic_is_not_found() {
        let service = service();
        let id = TopicId::generate();
        assert!(matches!(service.get(id).await, Err(WorkflowError::NotFound(_))));
        assert!(matches!(service.submit(id, &alice()).await, Err(WorkflowError::NotFound(_))));
        assert!(matches!(service.history(id).await, Err(WorkflowError::NotFound(_))));
    }

    #[tokio::test]
    async fn updated_at_is_refreshed_but_created_by_is_kept() {
        let service = service();
        let topic = service.create(draft("A"), &alice()).await.unwrap();

        let submitted = service.submit(topic.id, &alice()).await.unwrap();
        assert!(submitted.updated_at >= topic.updated_at);
        assert_eq!(submitted.created_at, topic.created_at);
        assert_eq!(submitted.created_by, "alice");
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let service = service();
        let first = service.create(draft("first"), &alice()).await.unwrap();
        let second = service.create(submitted("second"), &alice()).await.unwrap();
        let third = service.create(submitted("third"), &bob()).await.unwrap();

        let all = service.list(TopicQuery::new()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let alices_pending = service
            .list(TopicQuery::new().owned_by("alice").with_status(TopicStatus::Pending))
            .await
            .unwrap();
        assert_eq!(alices_pending.len(), 1);
        assert_eq!(alices_pending[0].id, second.id);

        let print = service
            .list(TopicQuery::new().with_content_type(ContentType::Print))
            .await
            .unwrap();
        assert!(print.is_empty());
    }

    #[tokio::test]
    async fn comments_append_without_moving_the_topic() {
        let service = service();
        let topic = service.create(submitted("A"), &alice()).await.unwrap();

        let event = service
            .comment(topic.id, &chief(), "  looking at it  ".to_string())
            .await
            .unwrap();
        assert_eq!(event.action, ApprovalAction::Comment);
        assert_eq!(event.comment.as_deref(), Some("looking at it"));

        let details = service.get(topic.id).await.unwrap();
        assert_eq!(details.topic.status, TopicStatus::Pending);
        assert_eq!(actions(&details), vec![ApprovalAction::Submit, ApprovalAction::Comment]);
    }

    #[tokio::test]
    async fn concurrent_submits_only_one_wins() {
        let repository = ScriptedRepository {
            yield_after_load: true,
            ..ScriptedRepository::default()
        };
        let conflicts = repository.conflicts.clone();
        let service = Arc::new(WorkflowService::new(repository));
        let topic = service.create(draft("A"), &alice()).await.unwrap();

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.submit(topic.id, &alice()).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.submit(topic.id, &alice()).await }
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts.load(Ordering::SeqCst), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(WorkflowError::InvalidStateTransition {
                from: TopicStatus::Pending,
                trigger: Trigger::Submit
            })
        )));
        assert_eq!(service.history(topic.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn committed_review_is_reported_even_if_ledger_goes_away() {
        let repository = ScriptedRepository {
            ledger_fails_after_transition: true,
            ..ScriptedRepository::default()
        };
        let inner = repository.inner.clone();
        let service = WorkflowService::new(repository);
        let topic = service.create(submitted("A"), &alice()).await.unwrap();

        let details = service.approve(topic.id, &chief(), None).await.unwrap();
        assert_eq!(details.topic.status, TopicStatus::Approved);
        assert_eq!(actions(&details), vec![ApprovalAction::Submit, ApprovalAction::Approve]);

        let stored = inner.find_by_id(topic.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TopicStatus::Approved);
        assert_eq!(inner.events_for(topic.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn events_stay_in_order_when_the_clock_steps_back() {
        let service = service();
        let topic = service.create(submitted("A"), &alice()).await.unwrap();
        let future = Utc::now() + chrono::Duration::hours(1);
        let early_comment = ApprovalEvent::record(
            topic.id,
            &chief(),
            ApprovalAction::Comment,
            Some("from a fast clock".to_string()),
            future,
        );
        service.repository.append_event(early_comment).await.unwrap();

        let details = service.approve(topic.id, &chief(), None).await.unwrap();
        let approval = details.approval_history.last().unwrap();
        assert_eq!(approval.action, ApprovalAction::Approve);
        assert!(approval.created_at >= future);

        let comment = service
            .comment(topic.id, &chief(), "after".to_string())
            .await
            .unwrap();
        assert!(comment.created_at >= approval.created_at);

        let history = service.history(topic.id).await.unwrap();
        let actions: Vec<_> = history.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                ApprovalAction::Submit,
                ApprovalAction::Comment,
                ApprovalAction::Approve,
                ApprovalAction::Comment
            ]
        );
    }

    #[tokio::test]
    async fn stats_on_empty_store() {
        let stats = service().stats(Utc::now()).await.unwrap();
        assert_eq!(stats.total.count, 0);
        assert_eq!(stats.success_rate.count, 0);
        assert_eq!(stats.success_rate.trend, 0.0);
    }

    #[tokio::test]
    async fn stats_count_current_month_by_creation() {
        let service = service();
        let pending = service.create(submitted("A"), &alice()).await.unwrap();
        let approved = service.create(submitted("B"), &alice()).await.unwrap();
        service.create(draft("C"), &alice()).await.unwrap();
        service.approve(approved.id, &chief(), None).await.unwrap();

        let stats = service.stats(Utc::now()).await.unwrap();
        assert_eq!(stats.total.count, 3);
        assert_eq!(stats.total.trend, 100.0);
        assert_eq!(stats.pending.count, 1);
        assert_eq!(stats.approved.count, 1);
        assert_eq!(stats.success_rate.count, 33);
        assert_eq!(pending.status, TopicStatus::Pending);
    }
}
