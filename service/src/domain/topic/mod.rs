pub mod error;
pub mod lifecycle;

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{actor::Actor, topic::error::WorkflowError};

/// Estimated effort assumed when the proposer leaves it out
pub const DEFAULT_ESTIMATED_DAYS: i32 = 1;

/// A content proposal moving through the approval workflow
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    /// Unique, never reassigned
    pub id: TopicId,

    pub title: TopicTitle,
    pub outline: String,
    pub content_type: ContentType,
    pub category: String,
    pub team_members: Vec<TeamMember>,
    pub attachments: Vec<Attachment>,
    pub estimated_days: i32,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,

    /// Routing hint: which approval path the proposer asked for
    pub approver: Option<String>,

    /// Owner; fixed at creation
    pub created_by: String,
    /// Owner's display name as it was at creation
    pub created_by_name: String,
    pub department_id: Option<String>,
    pub department_name: Option<String>,

    pub status: TopicStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wrapper to prevent ID confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicId(pub Uuid);

impl TopicId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TopicId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl TryFrom<&str> for TopicId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(value)?;
        Ok(Self(uuid))
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 200),
    derive(Clone, Debug, Display, AsRef, PartialEq, Eq, Serialize)
)]
pub struct TopicTitle(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Draft,
    Pending,
    RevisionRequired,
    Approved,
    Rejected,
}

impl TopicStatus {
    pub const ALL: [TopicStatus; 5] = [
        TopicStatus::Draft,
        TopicStatus::Pending,
        TopicStatus::RevisionRequired,
        TopicStatus::Approved,
        TopicStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::Draft => "draft",
            TopicStatus::Pending => "pending",
            TopicStatus::RevisionRequired => "revision_required",
            TopicStatus::Approved => "approved",
            TopicStatus::Rejected => "rejected",
        }
    }

    /// Owner may still change the content
    pub fn is_editable(&self) -> bool {
        matches!(self, TopicStatus::Draft | TopicStatus::RevisionRequired)
    }

    /// No trigger leads anywhere from here
    pub fn is_terminal(&self) -> bool {
        matches!(self, TopicStatus::Approved | TopicStatus::Rejected)
    }
}

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopicStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TopicStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("unknown topic status '{}'", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Broadcast,
    Print,
    Digital,
    Social,
    Combo,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Broadcast,
        ContentType::Print,
        ContentType::Digital,
        ContentType::Social,
        ContentType::Combo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Broadcast => "broadcast",
            ContentType::Print => "print",
            ContentType::Digital => "digital",
            ContentType::Social => "social",
            ContentType::Combo => "combo",
        }
    }
}

impl FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|content_type| content_type.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("unknown content type '{}'", value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Reference to an already uploaded file; storage is handled elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Everything the proposer supplies when creating a topic
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub title: String,
    pub outline: String,
    pub content_type: ContentType,
    pub category: String,
    pub team_members: Vec<TeamMember>,
    pub attachments: Vec<Attachment>,
    pub estimated_days: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub approver: Option<String>,
    pub department_id: Option<String>,
    pub department_name: Option<String>,
    /// Keep as draft instead of submitting right away
    pub is_draft: bool,
}

impl NewTopic {
    /// Minimal proposal, mostly useful in tests and scripts
    pub fn titled(title: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            title: title.into(),
            outline: String::new(),
            content_type,
            category: String::new(),
            team_members: Vec::new(),
            attachments: Vec::new(),
            estimated_days: None,
            start_date: None,
            deadline: None,
            approver: None,
            department_id: None,
            department_name: None,
            is_draft: true,
        }
    }

    /// Builds the topic owned by `owner`, validating every field
    pub fn into_topic(self, owner: &Actor, now: DateTime<Utc>) -> Result<Topic, WorkflowError> {
        let title = parse_title(self.title)?;
        let estimated_days = self.estimated_days.unwrap_or(DEFAULT_ESTIMATED_DAYS);
        validate_estimated_days(estimated_days)?;
        validate_schedule(self.start_date, self.deadline)?;

        let status = if self.is_draft {
            TopicStatus::Draft
        } else {
            TopicStatus::Pending
        };

        Ok(Topic {
            id: TopicId::generate(),
            title,
            outline: self.outline,
            content_type: self.content_type,
            category: self.category,
            team_members: self.team_members,
            attachments: self.attachments,
            estimated_days,
            start_date: self.start_date,
            deadline: self.deadline,
            approver: self.approver,
            created_by: owner.id.clone(),
            created_by_name: owner.name.clone(),
            department_id: self.department_id,
            department_name: self.department_name,
            status,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of the content fields; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct TopicPatch {
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

impl TopicPatch {
    /// Returns the patched copy. Status, ownership and creation time are never touched.
    pub fn apply_to(self, topic: &Topic, now: DateTime<Utc>) -> Result<Topic, WorkflowError> {
        let mut patched = topic.clone();

        if let Some(title) = self.title {
            patched.title = parse_title(title)?;
        }
        if let Some(outline) = self.outline {
            patched.outline = outline;
        }
        if let Some(content_type) = self.content_type {
            patched.content_type = content_type;
        }
        if let Some(category) = self.category {
            patched.category = category;
        }
        if let Some(team_members) = self.team_members {
            patched.team_members = team_members;
        }
        if let Some(attachments) = self.attachments {
            patched.attachments = attachments;
        }
        if let Some(estimated_days) = self.estimated_days {
            validate_estimated_days(estimated_days)?;
            patched.estimated_days = estimated_days;
        }
        if let Some(start_date) = self.start_date {
            patched.start_date = Some(start_date);
        }
        if let Some(deadline) = self.deadline {
            patched.deadline = Some(deadline);
        }
        if let Some(approver) = self.approver {
            patched.approver = Some(approver);
        }
        validate_schedule(patched.start_date, patched.deadline)?;

        patched.updated_at = refreshed(topic.updated_at, now);
        Ok(patched)
    }
}

/// `updated_at` never moves backwards, even if the clock does
pub fn refreshed(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    previous.max(now)
}

fn parse_title(title: String) -> Result<TopicTitle, WorkflowError> {
    TopicTitle::try_new(title)
        .map_err(|err| WorkflowError::ValidationError(format!("invalid title: {}", err)))
}

fn validate_estimated_days(days: i32) -> Result<(), WorkflowError> {
    if days < 1 {
        return Err(WorkflowError::ValidationError(format!(
            "estimated days must be at least 1, got {}",
            days
        )));
    }
    Ok(())
}

fn validate_schedule(
    start_date: Option<NaiveDate>,
    deadline: Option<NaiveDate>,
) -> Result<(), WorkflowError> {
    match (start_date, deadline) {
        (Some(start), Some(end)) if end < start => Err(WorkflowError::ValidationError(format!(
            "deadline {} precedes start date {}",
            end, start
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::domain::actor::Role;

    use super::*;

    fn owner() -> Actor {
        Actor::new("u-1", "Ada", Role::Staff)
    }

    #[test]
    fn draft_flag_picks_initial_status() {
        let now = Utc::now();
        let draft = NewTopic::titled("A", ContentType::Print)
            .into_topic(&owner(), now)
            .unwrap();
        assert_eq!(draft.status, TopicStatus::Draft);

        let mut submitted = NewTopic::titled("B", ContentType::Print);
        submitted.is_draft = false;
        let submitted = submitted.into_topic(&owner(), now).unwrap();
        assert_eq!(submitted.status, TopicStatus::Pending);
    }

    #[test]
    fn estimated_days_defaults_to_one() {
        let topic = NewTopic::titled("A", ContentType::Digital)
            .into_topic(&owner(), Utc::now())
            .unwrap();
        assert_eq!(topic.estimated_days, DEFAULT_ESTIMATED_DAYS);
        assert_eq!(topic.created_by, "u-1");
        assert_eq!(topic.created_by_name, "Ada");
    }

    #[test]
    fn blank_title_is_rejected() {
        let result = NewTopic::titled("   ", ContentType::Social).into_topic(&owner(), Utc::now());
        assert!(matches!(result, Err(WorkflowError::ValidationError(_))));
    }

    #[test]
    fn deadline_before_start_is_rejected() {
        let mut new_topic = NewTopic::titled("A", ContentType::Combo);
        new_topic.start_date = NaiveDate::from_ymd_opt(2024, 5, 10);
        new_topic.deadline = NaiveDate::from_ymd_opt(2024, 5, 1);
        let result = new_topic.into_topic(&owner(), Utc::now());
        assert!(matches!(result, Err(WorkflowError::ValidationError(_))));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let topic = NewTopic::titled("Original", ContentType::Print)
            .into_topic(&owner(), created)
            .unwrap();

        let patch = TopicPatch {
            outline: Some("new outline".to_string()),
            ..TopicPatch::default()
        };
        let later = created + chrono::Duration::hours(1);
        let patched = patch.apply_to(&topic, later).unwrap();

        assert_eq!(patched.title.as_ref(), "Original");
        assert_eq!(patched.outline, "new outline");
        assert_eq!(patched.status, topic.status);
        assert_eq!(patched.created_by, topic.created_by);
        assert_eq!(patched.updated_at, later);
    }

    #[test]
    fn updated_at_never_goes_backwards() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let earlier = now - chrono::Duration::minutes(5);
        assert_eq!(refreshed(now, earlier), now);
    }

    #[test]
    fn status_round_trips_through_its_literal() {
        for status in TopicStatus::ALL {
            assert_eq!(status.as_str().parse::<TopicStatus>().unwrap(), status);
        }
        assert!("archived".parse::<TopicStatus>().is_err());
    }
}
