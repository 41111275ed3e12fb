pub mod actor;
pub mod guard;
pub mod ledger;
pub mod repository;
pub mod stats;
pub mod topic;
pub mod workflow;

use crate::domain::{repository::TopicRepository, workflow::WorkflowService};

//// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type R: TopicRepository;
    fn workflow(&self) -> &WorkflowService<Self::R>;
}
