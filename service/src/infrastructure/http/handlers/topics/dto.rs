use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    actor::Role,
    ledger::{ApprovalAction, ApprovalEvent},
    topic::{Attachment, ContentType, NewTopic, TeamMember, Topic, TopicPatch, TopicStatus},
    workflow::TopicDetails,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub title: String,
    #[serde(default)]
    pub outline: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub estimated_days: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub approver: Option<String>,
    pub department_id: Option<String>,
    pub department_name: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
}

impl From<CreateTopicRequest> for NewTopic {
    fn from(value: CreateTopicRequest) -> Self {
        NewTopic {
            title: value.title,
            outline: value.outline,
            content_type: value.content_type,
            category: value.category,
            team_members: value.team_members,
            attachments: value.attachments,
            estimated_days: value.estimated_days,
            start_date: value.start_date,
            deadline: value.deadline,
            approver: value.approver,
            department_id: value.department_id,
            department_name: value.department_name,
            is_draft: value.is_draft,
        }
    }
}

/// Absent members leave the stored value untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicRequest {
    pub title: Option<String>,
    pub outline: Option<String>,
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
    pub team_members: Option<Vec<TeamMember>>,
    pub attachments: Option<Vec<Attachment>>,
    pub estimated_days: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub approver: Option<String>,
}

impl From<UpdateTopicRequest> for TopicPatch {
    fn from(value: UpdateTopicRequest) -> Self {
        TopicPatch {
            title: value.title,
            outline: value.outline,
            content_type: value.content_type,
            category: value.category,
            team_members: value.team_members,
            attachments: value.attachments,
            estimated_days: value.estimated_days,
            start_date: value.start_date,
            deadline: value.deadline,
            approver: value.approver,
        }
    }
}

/// Body of submit / approve / reject / request-revision; may be empty
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub comment: String,
}

/// Raw list filters; parsed by the handler so bad values get a clear message
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTopicsParams {
    pub status: Option<String>,
    pub content_type: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    id: String,
    title: String,
    outline: String,
    content_type: ContentType,
    category: String,
    team_members: Vec<TeamMember>,
    attachments: Vec<Attachment>,
    estimated_days: i32,
    start_date: Option<NaiveDate>,
    deadline: Option<NaiveDate>,
    approver: Option<String>,
    created_by: String,
    created_by_name: String,
    department_id: Option<String>,
    department_name: Option<String>,
    status: TopicStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval_history: Option<Vec<ApprovalEventResponse>>,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id.to_string(),
            title: topic.title.to_string(),
            outline: topic.outline,
            content_type: topic.content_type,
            category: topic.category,
            team_members: topic.team_members,
            attachments: topic.attachments,
            estimated_days: topic.estimated_days,
            start_date: topic.start_date,
            deadline: topic.deadline,
            approver: topic.approver,
            created_by: topic.created_by,
            created_by_name: topic.created_by_name,
            department_id: topic.department_id,
            department_name: topic.department_name,
            status: topic.status,
            created_at: topic.created_at,
            updated_at: topic.updated_at,
            approval_history: None,
        }
    }
}

impl From<TopicDetails> for TopicResponse {
    fn from(details: TopicDetails) -> Self {
        let history = details
            .approval_history
            .into_iter()
            .map(ApprovalEventResponse::from)
            .collect();
        Self {
            approval_history: Some(history),
            ..Self::from(details.topic)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalEventResponse {
    id: String,
    topic_id: String,
    user_id: String,
    user_name: String,
    user_role: Role,
    action: ApprovalAction,
    level: Option<i32>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ApprovalEvent> for ApprovalEventResponse {
    fn from(event: ApprovalEvent) -> Self {
        Self {
            id: event.id.to_string(),
            topic_id: event.topic_id.to_string(),
            user_id: event.user_id,
            user_name: event.user_name,
            user_role: event.user_role,
            action: event.action,
            level: event.level,
            comment: event.comment,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicListResponse {
    topics: Vec<TopicResponse>,
    total: usize,
}

impl From<Vec<Topic>> for TopicListResponse {
    fn from(topics: Vec<Topic>) -> Self {
        let topics: Vec<TopicResponse> = topics.into_iter().map(TopicResponse::from).collect();
        Self {
            total: topics.len(),
            topics,
        }
    }
}
