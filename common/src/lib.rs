pub mod database;
pub mod schema;

// Persisted workflow table names

pub const TOPICS_TABLE: &str = "topics";
pub const APPROVAL_EVENTS_TABLE: &str = "approval_events";

// Persisted topic field names

pub const ID_FIELD_NAME: &str = "id";
pub const TITLE_FIELD_NAME: &str = "title";
pub const OUTLINE_FIELD_NAME: &str = "outline";
pub const CONTENT_TYPE_FIELD_NAME: &str = "content_type";
pub const CATEGORY_FIELD_NAME: &str = "category";
pub const TEAM_MEMBERS_FIELD_NAME: &str = "team_members";
pub const ATTACHMENTS_FIELD_NAME: &str = "attachments";
pub const ESTIMATED_DAYS_FIELD_NAME: &str = "estimated_days";
pub const START_DATE_FIELD_NAME: &str = "start_date";
pub const DEADLINE_FIELD_NAME: &str = "deadline";
pub const APPROVER_FIELD_NAME: &str = "approver";
pub const CREATED_BY_FIELD_NAME: &str = "created_by";
pub const CREATED_BY_NAME_FIELD_NAME: &str = "created_by_name";
pub const DEPARTMENT_ID_FIELD_NAME: &str = "department_id";
pub const DEPARTMENT_NAME_FIELD_NAME: &str = "department_name";
pub const STATUS_FIELD_NAME: &str = "status";

pub const CREATED_FIELD_NAME: &str = "created_at";
pub const UPDATED_FIELD_NAME: &str = "updated_at";

// Persisted approval event field names

pub const SEQUENCE_FIELD_NAME: &str = "seq";
pub const TOPIC_ID_FIELD_NAME: &str = "topic_id";
pub const USER_ID_FIELD_NAME: &str = "user_id";
pub const USER_NAME_FIELD_NAME: &str = "user_name";
pub const USER_ROLE_FIELD_NAME: &str = "user_role";
pub const ACTION_FIELD_NAME: &str = "action";
pub const LEVEL_FIELD_NAME: &str = "level";
pub const COMMENT_FIELD_NAME: &str = "comment";

// Literal values accepted by the status column

pub const TOPIC_STATUSES: [&str; 5] = ["draft", "pending", "revision_required", "approved", "rejected"];
pub const APPROVAL_ACTIONS: [&str; 5] = ["submit", "approve", "reject", "request_revision", "comment"];
