//! Authorization checks.
//!
//! Pure functions over the actor and the topic as currently stored. They run
//! before the state machine; a caller failing here never reaches it.

use std::fmt;

use crate::domain::{
    actor::Actor,
    topic::{Topic, TopicStatus, error::WorkflowError, lifecycle::Trigger},
};

/// Operation an actor attempts on a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Edit,
    Delete,
    Submit,
    Approve,
    Reject,
    RequestRevision,
    Comment,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Edit => "edit",
            Operation::Delete => "delete",
            Operation::Submit => "submit",
            Operation::Approve => "approve",
            Operation::Reject => "reject",
            Operation::RequestRevision => "request revision for",
            Operation::Comment => "comment on",
        };
        f.write_str(name)
    }
}

impl From<Trigger> for Operation {
    fn from(value: Trigger) -> Self {
        match value {
            Trigger::Submit => Operation::Submit,
            Trigger::Approve => Operation::Approve,
            Trigger::Reject => Operation::Reject,
            Trigger::RequestRevision => Operation::RequestRevision,
        }
    }
}

fn is_owner(actor: &Actor, topic: &Topic) -> bool {
    actor.id == topic.created_by
}

fn require_owner(actor: &Actor, topic: &Topic, operation: Operation) -> Result<(), WorkflowError> {
    if is_owner(actor, topic) {
        Ok(())
    } else {
        Err(WorkflowError::Unauthorized(format!(
            "only the owner may {} this topic",
            operation
        )))
    }
}

/// Owner only, while the topic is a draft or sent back for revision
pub fn can_edit(actor: &Actor, topic: &Topic) -> Result<(), WorkflowError> {
    require_owner(actor, topic, Operation::Edit)?;
    if !topic.status.is_editable() {
        return Err(WorkflowError::InvalidStateForOperation {
            operation: Operation::Edit,
            status: topic.status,
        });
    }
    Ok(())
}

/// Owner only, and only drafts
pub fn can_delete(actor: &Actor, topic: &Topic) -> Result<(), WorkflowError> {
    require_owner(actor, topic, Operation::Delete)?;
    if topic.status != TopicStatus::Draft {
        return Err(WorkflowError::InvalidStateForOperation {
            operation: Operation::Delete,
            status: topic.status,
        });
    }
    Ok(())
}

/// Owner only. The status side is left to the state machine so that an
/// illegal submit reports `InvalidStateTransition`.
pub fn can_submit(actor: &Actor, topic: &Topic) -> Result<(), WorkflowError> {
    require_owner(actor, topic, Operation::Submit)
}

/// Admin or leadership on a pending topic; reject and request-revision
/// need a non-empty comment
pub fn can_review(
    actor: &Actor,
    topic: &Topic,
    trigger: Trigger,
    comment: Option<&str>,
) -> Result<(), WorkflowError> {
    let operation = Operation::from(trigger);
    if !actor.role.is_reviewer() {
        return Err(WorkflowError::Unauthorized(format!(
            "role {} may not {} topics",
            actor.role, operation
        )));
    }
    if topic.status != TopicStatus::Pending {
        return Err(WorkflowError::InvalidStateTransition {
            from: topic.status,
            trigger,
        });
    }
    if matches!(trigger, Trigger::Reject | Trigger::RequestRevision) && is_blank(comment) {
        return Err(WorkflowError::ValidationError(format!(
            "a comment is required to {} a topic",
            operation
        )));
    }
    Ok(())
}

/// Owner or reviewer, once the topic has left draft
pub fn can_comment(actor: &Actor, topic: &Topic, comment: Option<&str>) -> Result<(), WorkflowError> {
    if !is_owner(actor, topic) && !actor.role.is_reviewer() {
        return Err(WorkflowError::Unauthorized(
            "only the owner or a reviewer may comment on this topic".to_string(),
        ));
    }
    if topic.status == TopicStatus::Draft {
        return Err(WorkflowError::InvalidStateForOperation {
            operation: Operation::Comment,
            status: topic.status,
        });
    }
    if is_blank(comment) {
        return Err(WorkflowError::ValidationError(
            "comment must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn is_blank(comment: Option<&str>) -> bool {
    comment.is_none_or(|c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::{
        actor::Role,
        topic::{ContentType, NewTopic},
    };

    use super::*;

    fn owner() -> Actor {
        Actor::new("owner", "Owner", Role::Staff)
    }

    fn stranger() -> Actor {
        Actor::new("stranger", "Stranger", Role::Staff)
    }

    fn reviewer() -> Actor {
        Actor::new("chief", "Chief", Role::Leadership)
    }

    fn topic_in(status: TopicStatus) -> Topic {
        let mut topic = NewTopic::titled("A", ContentType::Broadcast)
            .into_topic(&owner(), Utc::now())
            .unwrap();
        topic.status = status;
        topic
    }

    #[test]
    fn edit_requires_owner_and_editable_status() {
        assert!(can_edit(&owner(), &topic_in(TopicStatus::Draft)).is_ok());
        assert!(can_edit(&owner(), &topic_in(TopicStatus::RevisionRequired)).is_ok());
        assert!(matches!(
            can_edit(&stranger(), &topic_in(TopicStatus::Draft)),
            Err(WorkflowError::Unauthorized(_))
        ));
        assert!(matches!(
            can_edit(&owner(), &topic_in(TopicStatus::Pending)),
            Err(WorkflowError::InvalidStateForOperation { operation: Operation::Edit, .. })
        ));
    }

    #[test]
    fn reviewers_cannot_edit_someone_elses_topic() {
        assert!(matches!(
            can_edit(&reviewer(), &topic_in(TopicStatus::Draft)),
            Err(WorkflowError::Unauthorized(_))
        ));
    }

    #[test]
    fn delete_only_drafts() {
        assert!(can_delete(&owner(), &topic_in(TopicStatus::Draft)).is_ok());
        assert!(matches!(
            can_delete(&owner(), &topic_in(TopicStatus::RevisionRequired)),
            Err(WorkflowError::InvalidStateForOperation { .. })
        ));
        assert!(matches!(
            can_delete(&stranger(), &topic_in(TopicStatus::Draft)),
            Err(WorkflowError::Unauthorized(_))
        ));
    }

    #[test]
    fn submit_checks_ownership_only() {
        assert!(can_submit(&owner(), &topic_in(TopicStatus::Approved)).is_ok());
        assert!(matches!(
            can_submit(&stranger(), &topic_in(TopicStatus::Draft)),
            Err(WorkflowError::Unauthorized(_))
        ));
    }

    #[test]
    fn staff_cannot_review() {
        let result = can_review(
            &owner(),
            &topic_in(TopicStatus::Pending),
            Trigger::Approve,
            None,
        );
        assert!(matches!(result, Err(WorkflowError::Unauthorized(_))));
    }

    #[test]
    fn review_needs_pending_topic() {
        let result = can_review(
            &reviewer(),
            &topic_in(TopicStatus::Draft),
            Trigger::Approve,
            None,
        );
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidStateTransition { from: TopicStatus::Draft, .. })
        ));
    }

    #[test]
    fn reject_and_revision_need_a_comment() {
        let pending = topic_in(TopicStatus::Pending);
        for trigger in [Trigger::Reject, Trigger::RequestRevision] {
            for comment in [None, Some(""), Some("   ")] {
                assert!(matches!(
                    can_review(&reviewer(), &pending, trigger, comment),
                    Err(WorkflowError::ValidationError(_))
                ));
            }
            assert!(can_review(&reviewer(), &pending, trigger, Some("needs sources")).is_ok());
        }
        assert!(can_review(&reviewer(), &pending, Trigger::Approve, None).is_ok());
    }

    #[test]
    fn comments_from_owner_or_reviewer_after_submission() {
        let pending = topic_in(TopicStatus::Pending);
        assert!(can_comment(&owner(), &pending, Some("ping")).is_ok());
        assert!(can_comment(&reviewer(), &pending, Some("noted")).is_ok());
        assert!(matches!(
            can_comment(&stranger(), &pending, Some("hi")),
            Err(WorkflowError::Unauthorized(_))
        ));
        assert!(matches!(
            can_comment(&owner(), &topic_in(TopicStatus::Draft), Some("hi")),
            Err(WorkflowError::InvalidStateForOperation { .. })
        ));
        assert!(matches!(
            can_comment(&owner(), &pending, Some(" ")),
            Err(WorkflowError::ValidationError(_))
        ));
    }
}
