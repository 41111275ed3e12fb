use std::sync::Arc;

use crate::domain::{AppState, repository::TopicRepository, workflow::WorkflowService};

pub mod http;
pub mod memory;
pub mod persistence;
pub mod settings;

#[derive(Clone)]
pub struct AppStateImpl<R: TopicRepository> {
    workflow: Arc<WorkflowService<R>>,
}

impl<R: TopicRepository> AppStateImpl<R> {
    pub fn new(repository: R) -> Self {
        Self {
            workflow: Arc::new(WorkflowService::new(repository)),
        }
    }
}

impl<R: TopicRepository> AppState for AppStateImpl<R> {
    type R = R;

    fn workflow(&self) -> &WorkflowService<Self::R> {
        &self.workflow
    }
}
