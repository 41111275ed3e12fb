use chrono::{DateTime, Utc};
use sqlx::{Postgres, postgres::PgArguments, query::Query};
use uuid::Uuid;

use crate::infrastructure::persistence::schema::{ColumnRef, Table};

/// High-level, composable query builder
/// Similar to jOOQ, but with Rust's type system
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    from_table: Table<'a>,
    projection: Projection<'a>,
    where_conditions: Vec<Condition<'a>>,
    order_by: Vec<OrderBy<'a>>,
}

#[derive(Debug, Clone)]
enum Projection<'a> {
    Columns(Vec<ColumnRef<'a>>),
    Count,
}

/// A where condition that will be AND'ed together
#[derive(Debug, Clone)]
pub enum Condition<'a> {
    /// field = value
    Equals {
        column: ColumnRef<'a>,
        value: ConditionValue,
    },

    /// field >= value
    GreaterThanOrEqual {
        column: ColumnRef<'a>,
        value: ConditionValue,
    },

    /// field < value
    LessThan {
        column: ColumnRef<'a>,
        value: ConditionValue,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone)]
pub struct OrderBy<'a> {
    pub column: ColumnRef<'a>,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl<'a> From<Table<'a>> for QueryBuilder<'a> {
    fn from(value: Table<'a>) -> Self {
        QueryBuilder {
            from_table: value,
            projection: Projection::Columns(vec![]),
            where_conditions: vec![],
            order_by: vec![],
        }
    }
}

impl<'a> QueryBuilder<'a> {
    /// Select specified columns
    pub fn select(mut self, columns: Vec<ColumnRef<'a>>) -> Self {
        self.projection = Projection::Columns(columns);
        self
    }

    /// Select the number of matching rows instead of columns
    pub fn count(mut self) -> Self {
        self.projection = Projection::Count;
        self
    }

    /// Add where condition
    pub fn where_condition(mut self, condition: Condition<'a>) -> Self {
        self.where_conditions.push(condition);
        self
    }

    /// Add where condition when there is one
    pub fn where_optional(self, condition: Option<Condition<'a>>) -> Self {
        match condition {
            Some(condition) => self.where_condition(condition),
            None => self,
        }
    }

    /// Add order by clause
    pub fn order_by(mut self, column: ColumnRef<'a>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy { column, direction });
        self
    }

    /// Build the SQL query string
    pub fn build(self) -> (String, Vec<SqlParameter>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut param_counter = 1;

        // SELECT clause
        sql.push_str("SELECT ");
        match &self.projection {
            Projection::Columns(columns) => {
                let columns: Vec<String> = columns.iter().map(|c| c.qualified()).collect();
                sql.push_str(&columns.join(", "));
            }
            Projection::Count => sql.push_str("COUNT(*)"),
        }

        // FROM clause
        sql.push_str(&format!("\nFROM {}", self.from_table.qualified()));

        // WHERE clause
        if !self.where_conditions.is_empty() {
            sql.push_str("\nWHERE ");
            let mut where_sql = Vec::new();
            for condition in &self.where_conditions {
                let (cond_sql, cond_params) = condition.to_sql(&mut param_counter);
                where_sql.push(cond_sql);
                params.extend(cond_params);
            }
            sql.push_str(&where_sql.join(" AND "));
        }

        // ORDER BY clause
        if !self.order_by.is_empty() {
            sql.push_str("\nORDER BY ");
            let order_clauses: Vec<String> = self
                .order_by
                .iter()
                .map(|ob| {
                    let direction = match ob.direction {
                        SortDirection::Ascending => "ASC",
                        SortDirection::Descending => "DESC",
                    };
                    format!("{} {}", ob.column.qualified(), direction)
                })
                .collect();
            sql.push_str(&order_clauses.join(", "));
        }

        (sql, params)
    }
}

impl Condition<'_> {
    pub fn to_sql(&self, param_counter: &mut usize) -> (String, Vec<SqlParameter>) {
        let (column, operator, value) = match self {
            Condition::Equals { column, value } => (column, "=", value),
            Condition::GreaterThanOrEqual { column, value } => (column, ">=", value),
            Condition::LessThan { column, value } => (column, "<", value),
        };
        let sql = format!("{} {} ${}", column.qualified(), operator, param_counter);
        *param_counter += 1;
        (sql, vec![value.into()])
    }
}

impl From<&ConditionValue> for SqlParameter {
    fn from(value: &ConditionValue) -> Self {
        match value {
            ConditionValue::Text(s) => SqlParameter::Text(s.clone()),
            ConditionValue::Uuid(u) => SqlParameter::Uuid(*u),
            ConditionValue::Timestamp(t) => SqlParameter::Timestamp(*t),
        }
    }
}

// SQL parameter that will be bound to query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParameter {
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl SqlParameter {
    /// Bind to sqlx query
    pub fn bind_to_query<'q>(
        self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlParameter::Text(s) => query.bind(s),
            SqlParameter::Uuid(u) => query.bind(u),
            SqlParameter::Timestamp(t) => query.bind(t),
        }
    }
}
