use crate::domain::{
    guard::Operation,
    repository::RepositoryError,
    topic::{TopicId, TopicStatus, lifecycle::Trigger},
};

/// Failures of the workflow operations.
///
/// Nothing here is retried or downgraded: callers see every kind as-is.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("topic {0} not found")]
    NotFound(TopicId),

    #[error("{0}")]
    Unauthorized(String),

    #[error("cannot {trigger} a topic that is {from}")]
    InvalidStateTransition { from: TopicStatus, trigger: Trigger },

    #[error("cannot {operation} a topic that is {status}")]
    InvalidStateForOperation {
        operation: Operation,
        status: TopicStatus,
    },

    #[error("{0}")]
    ValidationError(String),

    #[error("storage failure: {0}")]
    StorageError(String),
}

impl WorkflowError {
    /// Wraps a store failure with the operation it interrupted.
    ///
    /// `Conflict` and `NotFound` are resolved by the caller, which knows the
    /// status it expected; anything reaching here is a storage problem.
    pub fn storage(ctx: &str, err: RepositoryError) -> Self {
        WorkflowError::StorageError(format!("{}: {}", ctx, err))
    }
}
