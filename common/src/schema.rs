use std::fmt;

use crate::{
    ACTION_FIELD_NAME, APPROVAL_ACTIONS, APPROVAL_EVENTS_TABLE, APPROVER_FIELD_NAME,
    ATTACHMENTS_FIELD_NAME, CATEGORY_FIELD_NAME, COMMENT_FIELD_NAME, CONTENT_TYPE_FIELD_NAME,
    CREATED_BY_FIELD_NAME, CREATED_BY_NAME_FIELD_NAME, CREATED_FIELD_NAME, DEADLINE_FIELD_NAME,
    DEPARTMENT_ID_FIELD_NAME, DEPARTMENT_NAME_FIELD_NAME, ESTIMATED_DAYS_FIELD_NAME,
    ID_FIELD_NAME, LEVEL_FIELD_NAME, OUTLINE_FIELD_NAME, SEQUENCE_FIELD_NAME,
    START_DATE_FIELD_NAME, STATUS_FIELD_NAME, TEAM_MEMBERS_FIELD_NAME, TITLE_FIELD_NAME,
    TOPIC_ID_FIELD_NAME, TOPIC_STATUSES, TOPICS_TABLE, UPDATED_FIELD_NAME, USER_ID_FIELD_NAME,
    USER_NAME_FIELD_NAME, USER_ROLE_FIELD_NAME,
};

/// Represents table in a database, used for ddl generation
#[derive(Debug)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
    pub indexes: Vec<Index>,
}

/// Represents one column in the database table
#[derive(Debug)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub column_length: Option<usize>,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
    /// Allowed literal values, rendered as a CHECK constraint
    pub allowed_values: Option<Vec<String>>,
}

/// Represents Column types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigSerial,
    Uuid,
    Text,
    Varchar,
    Integer,
    Date,
    TimestampTZ,
    Jsonb,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::BigSerial => "BIGSERIAL",
            ColumnType::Uuid => "UUID",
            ColumnType::Text => "TEXT",
            ColumnType::Varchar => "VARCHAR",
            ColumnType::Integer => "INTEGER",
            ColumnType::Date => "DATE",
            ColumnType::TimestampTZ => "TIMESTAMPTZ",
            ColumnType::Jsonb => "JSONB",
        };
        f.write_str(name)
    }
}

/// Represents foreign key constraint in the database table
#[derive(Debug)]
pub struct ForeignKeyConstraint {
    pub table_name: String,
    pub column_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
}

/// Represents an index in the database table
#[derive(Debug)]
pub struct Index {
    pub table_name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Table {
    pub fn new(
        name: String,
        columns: Vec<Column>,
        foreign_keys: Vec<ForeignKeyConstraint>,
        indexes: Vec<Index>,
    ) -> Self {
        Self {
            name,
            columns,
            foreign_keys,
            indexes,
        }
    }
}

impl Column {
    pub fn new<T: Into<String>>(
        name: T,
        column_type: ColumnType,
        column_length: Option<usize>,
        not_null: bool,
        unique: bool,
        default_value: Option<T>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            column_length,
            not_null,
            unique,
            primary_key: false,
            default_value: default_value.map(T::into),
            allowed_values: None,
        }
    }

    pub fn primary_key<T: Into<String>>(name: T, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            column_length: None,
            not_null: true,
            unique: false,
            primary_key: true,
            default_value: None,
            allowed_values: None,
        }
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }
}

impl ForeignKeyConstraint {
    pub fn new<T: Into<String>>(
        table_name: T,
        column_name: T,
        referenced_table_name: T,
        referenced_column_name: T,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            referenced_table_name: referenced_table_name.into(),
            referenced_column_name: referenced_column_name.into(),
        }
    }
}

impl Index {
    pub fn new<T: Into<String>>(table_name: T, columns: Vec<T>, unique: bool) -> Self {
        Self {
            table_name: table_name.into(),
            columns: columns.into_iter().map(T::into).collect(),
            unique,
        }
    }
}

/// Tables backing the record store, parents first.
pub fn workflow_tables() -> Vec<Table> {
    vec![topics_table(), approval_events_table()]
}

fn topics_table() -> Table {
    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, ColumnType::Uuid),
        Column::new(TITLE_FIELD_NAME, ColumnType::Text, None, true, false, None),
        Column::new(OUTLINE_FIELD_NAME, ColumnType::Text, None, true, false, Some("''")),
        Column::new(CONTENT_TYPE_FIELD_NAME, ColumnType::Varchar, Some(16), true, false, None)
            .one_of(&["broadcast", "print", "digital", "social", "combo"]),
        Column::new(CATEGORY_FIELD_NAME, ColumnType::Text, None, true, false, Some("''")),
        Column::new(TEAM_MEMBERS_FIELD_NAME, ColumnType::Jsonb, None, true, false, Some("'[]'::jsonb")),
        Column::new(ATTACHMENTS_FIELD_NAME, ColumnType::Jsonb, None, true, false, Some("'[]'::jsonb")),
        Column::new(ESTIMATED_DAYS_FIELD_NAME, ColumnType::Integer, None, true, false, Some("1")),
        Column::new(START_DATE_FIELD_NAME, ColumnType::Date, None, false, false, None),
        Column::new(DEADLINE_FIELD_NAME, ColumnType::Date, None, false, false, None),
        Column::new(APPROVER_FIELD_NAME, ColumnType::Text, None, false, false, None),
        Column::new(CREATED_BY_FIELD_NAME, ColumnType::Text, None, true, false, None),
        Column::new(CREATED_BY_NAME_FIELD_NAME, ColumnType::Text, None, true, false, None),
        Column::new(DEPARTMENT_ID_FIELD_NAME, ColumnType::Text, None, false, false, None),
        Column::new(DEPARTMENT_NAME_FIELD_NAME, ColumnType::Text, None, false, false, None),
        Column::new(STATUS_FIELD_NAME, ColumnType::Varchar, Some(32), true, false, None)
            .one_of(&TOPIC_STATUSES),
        Column::new(CREATED_FIELD_NAME, ColumnType::TimestampTZ, None, true, false, Some("now()")),
        Column::new(UPDATED_FIELD_NAME, ColumnType::TimestampTZ, None, true, false, Some("now()")),
    ];

    let indexes = vec![
        Index::new(TOPICS_TABLE, vec![CREATED_BY_FIELD_NAME], false),
        Index::new(TOPICS_TABLE, vec![STATUS_FIELD_NAME], false),
        Index::new(TOPICS_TABLE, vec![CREATED_FIELD_NAME], false),
    ];

    Table::new(TOPICS_TABLE.to_string(), columns, Vec::new(), indexes)
}

fn approval_events_table() -> Table {
    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, ColumnType::Uuid),
        Column::new(SEQUENCE_FIELD_NAME, ColumnType::BigSerial, None, true, true, None),
        Column::new(TOPIC_ID_FIELD_NAME, ColumnType::Uuid, None, true, false, None),
        Column::new(USER_ID_FIELD_NAME, ColumnType::Text, None, true, false, None),
        Column::new(USER_NAME_FIELD_NAME, ColumnType::Text, None, true, false, None),
        Column::new(USER_ROLE_FIELD_NAME, ColumnType::Varchar, Some(16), true, false, None),
        Column::new(ACTION_FIELD_NAME, ColumnType::Varchar, Some(32), true, false, None)
            .one_of(&APPROVAL_ACTIONS),
        Column::new(LEVEL_FIELD_NAME, ColumnType::Integer, None, false, false, None),
        Column::new(COMMENT_FIELD_NAME, ColumnType::Text, None, false, false, None),
        Column::new(CREATED_FIELD_NAME, ColumnType::TimestampTZ, None, true, false, Some("now()")),
    ];

    // drafts never carry events, so the cascade can only fire on event-free topics
    let foreign_keys = vec![ForeignKeyConstraint::new(
        APPROVAL_EVENTS_TABLE,
        TOPIC_ID_FIELD_NAME,
        TOPICS_TABLE,
        ID_FIELD_NAME,
    )];

    let indexes = vec![Index::new(
        APPROVAL_EVENTS_TABLE,
        vec![TOPIC_ID_FIELD_NAME, CREATED_FIELD_NAME],
        false,
    )];

    Table::new(APPROVAL_EVENTS_TABLE.to_string(), columns, foreign_keys, indexes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_come_before_their_events() {
        let tables = workflow_tables();
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![TOPICS_TABLE, APPROVAL_EVENTS_TABLE]);
    }

    #[test]
    fn status_column_only_accepts_known_statuses() {
        let topics = topics_table();
        let status = topics
            .columns
            .iter()
            .find(|c| c.name == STATUS_FIELD_NAME)
            .unwrap();
        assert!(status.not_null);
        assert_eq!(status.allowed_values.as_ref().unwrap().len(), 5);
    }

    #[test]
    fn events_reference_topics() {
        let events = approval_events_table();
        assert_eq!(events.foreign_keys.len(), 1);
        assert_eq!(events.foreign_keys[0].referenced_table_name, TOPICS_TABLE);
    }
}
