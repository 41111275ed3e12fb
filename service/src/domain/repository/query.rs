use crate::domain::{
    repository::CreatedWindow,
    topic::{ContentType, Topic, TopicStatus},
};

/// Query for listing topics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicQuery {
    pub status: Option<TopicStatus>,
    pub content_type: Option<ContentType>,
    pub created_by: Option<String>,
}

impl TopicQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only topics currently in this status
    pub fn with_status(mut self, status: TopicStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only topics of this content type
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Only topics owned by this actor
    pub fn owned_by(mut self, actor_id: impl Into<String>) -> Self {
        self.created_by = Some(actor_id.into());
        self
    }

    pub fn matches(&self, topic: &Topic) -> bool {
        self.status.is_none_or(|status| topic.status == status)
            && self
                .content_type
                .is_none_or(|content_type| topic.content_type == content_type)
            && self
                .created_by
                .as_deref()
                .is_none_or(|owner| topic.created_by == owner)
    }
}

/// Filter for counting topics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountFilter {
    pub status: Option<TopicStatus>,
    pub created: Option<CreatedWindow>,
}

impl CountFilter {
    /// Every topic ever created
    pub fn all() -> Self {
        Self::default()
    }

    /// Topics created inside `window`
    pub fn created_within(window: CreatedWindow) -> Self {
        Self {
            status: None,
            created: Some(window),
        }
    }

    /// Narrow to topics whose current status is `status`
    pub fn with_status(mut self, status: TopicStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, topic: &Topic) -> bool {
        self.status.is_none_or(|status| topic.status == status)
            && self
                .created
                .is_none_or(|window| window.contains(topic.created_at))
    }
}
