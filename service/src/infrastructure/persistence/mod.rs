use chrono::{DateTime, NaiveDate, Utc};
use editorial_common::{
    ACTION_FIELD_NAME, APPROVER_FIELD_NAME, ATTACHMENTS_FIELD_NAME, CATEGORY_FIELD_NAME,
    COMMENT_FIELD_NAME, CONTENT_TYPE_FIELD_NAME, CREATED_BY_FIELD_NAME,
    CREATED_BY_NAME_FIELD_NAME, CREATED_FIELD_NAME, DEADLINE_FIELD_NAME,
    DEPARTMENT_ID_FIELD_NAME, DEPARTMENT_NAME_FIELD_NAME, ESTIMATED_DAYS_FIELD_NAME,
    ID_FIELD_NAME, LEVEL_FIELD_NAME, OUTLINE_FIELD_NAME, START_DATE_FIELD_NAME,
    STATUS_FIELD_NAME, TEAM_MEMBERS_FIELD_NAME, TITLE_FIELD_NAME, TOPIC_ID_FIELD_NAME,
    UPDATED_FIELD_NAME, USER_ID_FIELD_NAME, USER_NAME_FIELD_NAME, USER_ROLE_FIELD_NAME,
};
use sqlx::{Row, postgres::PgRow, types::Json};
use uuid::Uuid;

use crate::domain::{
    actor::Role,
    ledger::ApprovalEvent,
    topic::{Attachment, TeamMember, Topic, TopicTitle},
};

pub mod query;
pub mod repository;
pub mod schema;

/// Topic columns in the order they are selected and inserted
pub const TOPIC_FIELDS: [&str; 18] = [
    ID_FIELD_NAME,
    TITLE_FIELD_NAME,
    OUTLINE_FIELD_NAME,
    CONTENT_TYPE_FIELD_NAME,
    CATEGORY_FIELD_NAME,
    TEAM_MEMBERS_FIELD_NAME,
    ATTACHMENTS_FIELD_NAME,
    ESTIMATED_DAYS_FIELD_NAME,
    START_DATE_FIELD_NAME,
    DEADLINE_FIELD_NAME,
    APPROVER_FIELD_NAME,
    CREATED_BY_FIELD_NAME,
    CREATED_BY_NAME_FIELD_NAME,
    DEPARTMENT_ID_FIELD_NAME,
    DEPARTMENT_NAME_FIELD_NAME,
    STATUS_FIELD_NAME,
    CREATED_FIELD_NAME,
    UPDATED_FIELD_NAME,
];

/// Approval event columns in the order they are selected and inserted
pub const EVENT_FIELDS: [&str; 9] = [
    ID_FIELD_NAME,
    TOPIC_ID_FIELD_NAME,
    USER_ID_FIELD_NAME,
    USER_NAME_FIELD_NAME,
    USER_ROLE_FIELD_NAME,
    ACTION_FIELD_NAME,
    LEVEL_FIELD_NAME,
    COMMENT_FIELD_NAME,
    CREATED_FIELD_NAME,
];

impl TryFrom<&PgRow> for Topic {
    type Error = anyhow::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        let id: Uuid = row.try_get(ID_FIELD_NAME)?;
        let title: String = row.try_get(TITLE_FIELD_NAME)?;
        let content_type: String = row.try_get(CONTENT_TYPE_FIELD_NAME)?;
        let team_members: Json<Vec<TeamMember>> = row.try_get(TEAM_MEMBERS_FIELD_NAME)?;
        let attachments: Json<Vec<Attachment>> = row.try_get(ATTACHMENTS_FIELD_NAME)?;
        let start_date: Option<NaiveDate> = row.try_get(START_DATE_FIELD_NAME)?;
        let deadline: Option<NaiveDate> = row.try_get(DEADLINE_FIELD_NAME)?;
        let status: String = row.try_get(STATUS_FIELD_NAME)?;
        let created_at: DateTime<Utc> = row.try_get(CREATED_FIELD_NAME)?;
        let updated_at: DateTime<Utc> = row.try_get(UPDATED_FIELD_NAME)?;

        Ok(Topic {
            id: id.into(),
            title: TopicTitle::try_new(title)?,
            outline: row.try_get(OUTLINE_FIELD_NAME)?,
            content_type: content_type.parse()?,
            category: row.try_get(CATEGORY_FIELD_NAME)?,
            team_members: team_members.0,
            attachments: attachments.0,
            estimated_days: row.try_get(ESTIMATED_DAYS_FIELD_NAME)?,
            start_date,
            deadline,
            approver: row.try_get(APPROVER_FIELD_NAME)?,
            created_by: row.try_get(CREATED_BY_FIELD_NAME)?,
            created_by_name: row.try_get(CREATED_BY_NAME_FIELD_NAME)?,
            department_id: row.try_get(DEPARTMENT_ID_FIELD_NAME)?,
            department_name: row.try_get(DEPARTMENT_NAME_FIELD_NAME)?,
            status: status.parse()?,
            created_at,
            updated_at,
        })
    }
}

impl TryFrom<&PgRow> for ApprovalEvent {
    type Error = anyhow::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        let topic_id: Uuid = row.try_get(TOPIC_ID_FIELD_NAME)?;
        let user_role: String = row.try_get(USER_ROLE_FIELD_NAME)?;
        let action: String = row.try_get(ACTION_FIELD_NAME)?;

        Ok(ApprovalEvent {
            id: row.try_get(ID_FIELD_NAME)?,
            topic_id: topic_id.into(),
            user_id: row.try_get(USER_ID_FIELD_NAME)?,
            user_name: row.try_get(USER_NAME_FIELD_NAME)?,
            user_role: user_role.parse::<Role>()?,
            action: action.parse()?,
            level: row.try_get(LEVEL_FIELD_NAME)?,
            comment: row.try_get(COMMENT_FIELD_NAME)?,
            created_at: row.try_get(CREATED_FIELD_NAME)?,
        })
    }
}
