use std::borrow::Cow;

use editorial_common::{
    APPROVAL_EVENTS_TABLE, APPROVER_FIELD_NAME, ATTACHMENTS_FIELD_NAME, CATEGORY_FIELD_NAME,
    CONTENT_TYPE_FIELD_NAME, CREATED_BY_FIELD_NAME, CREATED_FIELD_NAME, DEADLINE_FIELD_NAME,
    ESTIMATED_DAYS_FIELD_NAME, ID_FIELD_NAME, OUTLINE_FIELD_NAME, SEQUENCE_FIELD_NAME,
    START_DATE_FIELD_NAME, STATUS_FIELD_NAME, TEAM_MEMBERS_FIELD_NAME, TITLE_FIELD_NAME,
    TOPIC_ID_FIELD_NAME, TOPICS_TABLE, UPDATED_FIELD_NAME, database::Database,
};
use itertools::Itertools;
use sqlx::{PgConnection, Row, types::Json};

use crate::{
    domain::{
        ledger::ApprovalEvent,
        repository::{
            RepositoryError, TopicRepository,
            query::{CountFilter, TopicQuery},
        },
        topic::{Topic, TopicId, TopicStatus},
    },
    infrastructure::persistence::{
        EVENT_FIELDS, TOPIC_FIELDS,
        query::{Condition, ConditionValue, QueryBuilder, SortDirection},
        schema::{Column, Table, columns_of},
    },
};

const TOPICS: Table<'static> = Table {
    name: TOPICS_TABLE,
    alias: "t",
};
const EVENTS: Table<'static> = Table {
    name: APPROVAL_EVENTS_TABLE,
    alias: "e",
};

const TOPIC_ID_COLUMN: Column<'static> = Column {
    qualifier: "t",
    name: ID_FIELD_NAME,
};
const TOPIC_STATUS_COLUMN: Column<'static> = Column {
    qualifier: "t",
    name: STATUS_FIELD_NAME,
};
const TOPIC_CONTENT_TYPE_COLUMN: Column<'static> = Column {
    qualifier: "t",
    name: CONTENT_TYPE_FIELD_NAME,
};
const TOPIC_OWNER_COLUMN: Column<'static> = Column {
    qualifier: "t",
    name: CREATED_BY_FIELD_NAME,
};
const TOPIC_CREATED_COLUMN: Column<'static> = Column {
    qualifier: "t",
    name: CREATED_FIELD_NAME,
};

const EVENT_TOPIC_COLUMN: Column<'static> = Column {
    qualifier: "e",
    name: TOPIC_ID_FIELD_NAME,
};
const EVENT_CREATED_COLUMN: Column<'static> = Column {
    qualifier: "e",
    name: CREATED_FIELD_NAME,
};
const EVENT_SEQUENCE_COLUMN: Column<'static> = Column {
    qualifier: "e",
    name: SEQUENCE_FIELD_NAME,
};

/// Fields an owner may change; bound in this order by `update_content`
const CONTENT_FIELDS: [&str; 11] = [
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
    UPDATED_FIELD_NAME,
];

/// Fields written by a status transition
const TRANSITION_FIELDS: [&str; 2] = [STATUS_FIELD_NAME, UPDATED_FIELD_NAME];

#[derive(Clone)]
pub struct PostgresTopicRepository {
    database: Database,
}

impl PostgresTopicRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    async fn fetch_topics(&self, builder: QueryBuilder<'_>) -> Result<Vec<Topic>, RepositoryError> {
        let (sql, params) = builder.build();
        tracing::debug!(%sql, "selecting topics");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = param.bind_to_query(query);
        }

        let rows = query
            .fetch_all(self.database.database_pool())
            .await
            .map_err(database_error)?;

        rows.iter()
            .map(|row| Topic::try_from(row).map_err(mapping_error))
            .collect()
    }

    /// Explains why a conditional write touched no row
    async fn missed(&self, id: TopicId) -> RepositoryError {
        match self.find_by_id(id).await {
            Ok(Some(_)) => RepositoryError::Conflict,
            Ok(None) => RepositoryError::NotFound,
            Err(err) => err,
        }
    }
}

impl TopicRepository for PostgresTopicRepository {
    async fn insert(
        &self,
        topic: Topic,
        initial_event: Option<ApprovalEvent>,
    ) -> Result<Topic, RepositoryError> {
        let mut transaction = self
            .database
            .database_pool()
            .begin()
            .await
            .map_err(database_error)?;

        let stored = insert_topic(&mut transaction, &topic).await?;
        if let Some(event) = &initial_event {
            insert_event(&mut transaction, event).await?;
        }

        transaction.commit().await.map_err(database_error)?;
        Ok(stored)
    }

    async fn find(&self, query: TopicQuery) -> Result<Vec<Topic>, RepositoryError> {
        let builder = QueryBuilder::from(TOPICS)
            .select(columns_of(&TOPICS, &TOPIC_FIELDS))
            .where_optional(query.status.map(|status| Condition::Equals {
                column: Cow::Borrowed(&TOPIC_STATUS_COLUMN),
                value: ConditionValue::Text(status.as_str().to_string()),
            }))
            .where_optional(query.content_type.map(|content_type| Condition::Equals {
                column: Cow::Borrowed(&TOPIC_CONTENT_TYPE_COLUMN),
                value: ConditionValue::Text(content_type.as_str().to_string()),
            }))
            .where_optional(query.created_by.map(|owner| Condition::Equals {
                column: Cow::Borrowed(&TOPIC_OWNER_COLUMN),
                value: ConditionValue::Text(owner),
            }))
            .order_by(Cow::Borrowed(&TOPIC_CREATED_COLUMN), SortDirection::Descending)
            .order_by(Cow::Borrowed(&TOPIC_ID_COLUMN), SortDirection::Descending);

        self.fetch_topics(builder).await
    }

    async fn find_by_id(&self, id: TopicId) -> Result<Option<Topic>, RepositoryError> {
        let builder = QueryBuilder::from(TOPICS)
            .select(columns_of(&TOPICS, &TOPIC_FIELDS))
            .where_condition(Condition::Equals {
                column: Cow::Borrowed(&TOPIC_ID_COLUMN),
                value: ConditionValue::Uuid(id.0),
            });

        let topics = self.fetch_topics(builder).await?;
        Ok(topics.into_iter().next())
    }

    async fn update_content(
        &self,
        topic: Topic,
        expected_status: TopicStatus,
    ) -> Result<Topic, RepositoryError> {
        let sql = conditional_update_sql(&CONTENT_FIELDS);
        tracing::debug!(%sql, topic_id = %topic.id, "updating topic content");

        let row = sqlx::query(&sql)
            .bind(topic.title.to_string())
            .bind(&topic.outline)
            .bind(topic.content_type.as_str())
            .bind(&topic.category)
            .bind(Json(&topic.team_members))
            .bind(Json(&topic.attachments))
            .bind(topic.estimated_days)
            .bind(topic.start_date)
            .bind(topic.deadline)
            .bind(&topic.approver)
            .bind(topic.updated_at)
            .bind(topic.id.0)
            .bind(expected_status.as_str())
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        match row {
            Some(row) => Topic::try_from(&row).map_err(mapping_error),
            None => Err(self.missed(topic.id).await),
        }
    }

    async fn delete(&self, id: TopicId, expected_status: TopicStatus) -> Result<(), RepositoryError> {
        let sql = format!(
            "DELETE FROM \"{}\" WHERE \"{}\" = $1 AND \"{}\" = $2",
            TOPICS_TABLE, ID_FIELD_NAME, STATUS_FIELD_NAME
        );

        // approval events go with the topic through ON DELETE CASCADE
        let result = sqlx::query(&sql)
            .bind(id.0)
            .bind(expected_status.as_str())
            .execute(self.database.database_pool())
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(self.missed(id).await);
        }
        Ok(())
    }

    async fn transition(
        &self,
        topic: Topic,
        from: TopicStatus,
        event: ApprovalEvent,
    ) -> Result<Topic, RepositoryError> {
        let sql = conditional_update_sql(&TRANSITION_FIELDS);
        tracing::debug!(%sql, topic_id = %topic.id, %from, to = %topic.status, "transitioning topic");

        let mut transaction = self
            .database
            .database_pool()
            .begin()
            .await
            .map_err(database_error)?;

        let row = sqlx::query(&sql)
            .bind(topic.status.as_str())
            .bind(topic.updated_at)
            .bind(topic.id.0)
            .bind(from.as_str())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(database_error)?;

        let Some(row) = row else {
            transaction.rollback().await.map_err(database_error)?;
            return Err(self.missed(topic.id).await);
        };
        let stored = Topic::try_from(&row).map_err(mapping_error)?;

        insert_event(&mut transaction, &event).await?;
        transaction.commit().await.map_err(database_error)?;

        Ok(stored)
    }

    async fn append_event(&self, event: ApprovalEvent) -> Result<ApprovalEvent, RepositoryError> {
        let mut connection = self
            .database
            .database_pool()
            .acquire()
            .await
            .map_err(database_error)?;

        insert_event(&mut connection, &event).await?;
        Ok(event)
    }

    async fn events_for(&self, topic_id: TopicId) -> Result<Vec<ApprovalEvent>, RepositoryError> {
        let (sql, params) = QueryBuilder::from(EVENTS)
            .select(columns_of(&EVENTS, &EVENT_FIELDS))
            .where_condition(Condition::Equals {
                column: Cow::Borrowed(&EVENT_TOPIC_COLUMN),
                value: ConditionValue::Uuid(topic_id.0),
            })
            .order_by(Cow::Borrowed(&EVENT_CREATED_COLUMN), SortDirection::Ascending)
            .order_by(Cow::Borrowed(&EVENT_SEQUENCE_COLUMN), SortDirection::Ascending)
            .build();
        tracing::debug!(%sql, "selecting approval events");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = param.bind_to_query(query);
        }

        let rows = query
            .fetch_all(self.database.database_pool())
            .await
            .map_err(database_error)?;

        rows.iter()
            .map(|row| ApprovalEvent::try_from(row).map_err(mapping_error))
            .collect()
    }

    async fn count(&self, filter: CountFilter) -> Result<u64, RepositoryError> {
        let (start, end) = match filter.created {
            Some(window) => (
                Some(Condition::GreaterThanOrEqual {
                    column: Cow::Borrowed(&TOPIC_CREATED_COLUMN),
                    value: ConditionValue::Timestamp(window.start),
                }),
                Some(Condition::LessThan {
                    column: Cow::Borrowed(&TOPIC_CREATED_COLUMN),
                    value: ConditionValue::Timestamp(window.end),
                }),
            ),
            None => (None, None),
        };

        let (sql, params) = QueryBuilder::from(TOPICS)
            .count()
            .where_optional(filter.status.map(|status| Condition::Equals {
                column: Cow::Borrowed(&TOPIC_STATUS_COLUMN),
                value: ConditionValue::Text(status.as_str().to_string()),
            }))
            .where_optional(start)
            .where_optional(end)
            .build();

        let mut query = sqlx::query(&sql);
        for param in params {
            query = param.bind_to_query(query);
        }

        let row = query
            .fetch_one(self.database.database_pool())
            .await
            .map_err(database_error)?;
        let count: i64 = row.try_get(0).map_err(database_error)?;

        u64::try_from(count).map_err(|err| RepositoryError::DatabaseError(err.to_string()))
    }
}

async fn insert_topic(connection: &mut PgConnection, topic: &Topic) -> Result<Topic, RepositoryError> {
    let sql = insert_sql(TOPICS_TABLE, &TOPIC_FIELDS, true);

    let row = sqlx::query(&sql)
        .bind(topic.id.0)
        .bind(topic.title.to_string())
        .bind(&topic.outline)
        .bind(topic.content_type.as_str())
        .bind(&topic.category)
        .bind(Json(&topic.team_members))
        .bind(Json(&topic.attachments))
        .bind(topic.estimated_days)
        .bind(topic.start_date)
        .bind(topic.deadline)
        .bind(&topic.approver)
        .bind(&topic.created_by)
        .bind(&topic.created_by_name)
        .bind(&topic.department_id)
        .bind(&topic.department_name)
        .bind(topic.status.as_str())
        .bind(topic.created_at)
        .bind(topic.updated_at)
        .fetch_one(connection)
        .await
        .map_err(database_error)?;

    Topic::try_from(&row).map_err(mapping_error)
}

async fn insert_event(
    connection: &mut PgConnection,
    event: &ApprovalEvent,
) -> Result<(), RepositoryError> {
    let sql = insert_sql(APPROVAL_EVENTS_TABLE, &EVENT_FIELDS, false);

    sqlx::query(&sql)
        .bind(event.id)
        .bind(event.topic_id.0)
        .bind(&event.user_id)
        .bind(&event.user_name)
        .bind(event.user_role.as_str())
        .bind(event.action.as_str())
        .bind(event.level)
        .bind(&event.comment)
        .bind(event.created_at)
        .execute(connection)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => RepositoryError::NotFound,
            _ => database_error(err),
        })?;

    Ok(())
}

fn quoted(fields: &[&str]) -> String {
    fields.iter().map(|field| format!("\"{}\"", field)).join(", ")
}

fn insert_sql(table: &str, fields: &[&str], returning: bool) -> String {
    let placeholders = (1..=fields.len()).map(|n| format!("${}", n)).join(", ");
    let mut sql = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        table,
        quoted(fields),
        placeholders
    );
    if returning {
        sql.push_str(&format!(" RETURNING {}", quoted(&TOPIC_FIELDS)));
    }
    sql
}

/// `UPDATE topics SET fields... WHERE id = $n AND status = $n+1 RETURNING *`
fn conditional_update_sql(fields: &[&str]) -> String {
    let assignments = fields
        .iter()
        .enumerate()
        .map(|(index, field)| format!("\"{}\" = ${}", field, index + 1))
        .join(", ");
    let id_param = fields.len() + 1;

    format!(
        "UPDATE \"{}\" SET {} WHERE \"{}\" = ${} AND \"{}\" = ${} RETURNING {}",
        TOPICS_TABLE,
        assignments,
        ID_FIELD_NAME,
        id_param,
        STATUS_FIELD_NAME,
        id_param + 1,
        quoted(&TOPIC_FIELDS)
    )
}

fn database_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(err.to_string())
}

fn mapping_error(err: anyhow::Error) -> RepositoryError {
    RepositoryError::DatabaseError(format!("malformed row: {}", err))
}
