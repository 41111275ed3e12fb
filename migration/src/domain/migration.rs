use std::collections::HashSet;

use editorial_common::{
    database::Database,
    schema::{Column, ForeignKeyConstraint, Index, Table, workflow_tables},
};

use crate::domain::tables::Tables;

pub trait Migration: Send + Sync + Clone + 'static {
    type T: Tables;

    fn migrate(&self) -> impl Future<Output = Result<(), anyhow::Error>>;
}

pub trait MigrationStep {
    fn ctx(&self) -> &'static str;
    fn ddls(self) -> Vec<String>;
}

#[derive(Debug)]
pub struct CreateTableStep {
    ddls: Vec<String>,
}

impl CreateTableStep {
    fn new(database_schema: &str, table: &Table) -> Self {
        let ddls = create_table_ddl(database_schema, table);
        Self { ddls }
    }
}

impl MigrationStep for CreateTableStep {
    fn ctx(&self) -> &'static str {
        "CREATE TABLE"
    }

    fn ddls(self) -> Vec<String> {
        self.ddls
    }
}

pub async fn migration_steps(
    database_schema: &str,
    tables: &impl Tables,
) -> Result<Vec<CreateTableStep>, anyhow::Error> {
    let actual_schema = tables.load().await?;
    Ok(plan_steps(database_schema, &workflow_tables(), &actual_schema))
}

/// One step per missing table, in the order the tables are declared.
pub fn plan_steps(
    database_schema: &str,
    needed_schema: &[Table],
    actual_schema: &HashSet<String>,
) -> Vec<CreateTableStep> {
    needed_schema
        .iter()
        .filter(|table| !actual_schema.contains(&table.name))
        .map(|table| CreateTableStep::new(database_schema, table))
        .collect()
}

pub async fn apply_migration_steps(
    steps: Vec<impl MigrationStep>,
    database: &Database,
) -> Result<(), anyhow::Error> {
    use futures::stream::{self, StreamExt};

    let mut stream = stream::iter(steps);
    while let Some(step) = stream.next().await {
        let ctx = step.ctx();
        let ddls = step.ddls();
        database.execute_in_transaction(ddls, ctx).await?;
    }

    Ok(())
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(&column.name as &str);
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(",");

    let table_ddl = format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    let mut ddls = vec![table_ddl];

    for fk in table.foreign_keys.iter() {
        ddls.push(create_fk_ddl(schema, fk));
    }

    for index in table.indexes.iter() {
        ddls.push(create_index_ddl(schema, index));
    }

    ddls
}

fn column_ddl(column: &Column) -> String {
    let mut sql = match column.column_length {
        Some(length) => format!("\"{}\" {}({})", column.name, column.column_type, length),
        None => format!("\"{}\" {}", column.name, column.column_type),
    };
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(format!(" DEFAULT {}", default_value).as_str());
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(values) = &column.allowed_values {
        let literals = values
            .iter()
            .map(|v| format!("'{}'", v))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(format!(" CHECK (\"{}\" IN ({}))", column.name, literals).as_str());
    }
    sql
}

fn create_fk_ddl(schema: &str, fk: &ForeignKeyConstraint) -> String {
    format!(
        "ALTER TABLE \"{}\".\"{}\" ADD CONSTRAINT \"{}_{}_fkey\" FOREIGN KEY (\"{}\") REFERENCES \"{}\".\"{}\" (\"{}\") ON DELETE CASCADE",
        schema,
        fk.table_name,
        fk.table_name,
        fk.column_name,
        fk.column_name,
        schema,
        fk.referenced_table_name,
        fk.referenced_column_name
    )
}

fn create_index_ddl(schema: &str, index: &Index) -> String {
    let columns_sql = index
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE {}INDEX \"{}_{}_idx\" ON \"{}\".\"{}\" ({})",
        if index.unique { "UNIQUE " } else { "" },
        index.table_name,
        index.columns.join("_"),
        schema,
        index.table_name,
        columns_sql
    )
}

#[cfg(test)]
mod tests {
    use editorial_common::{APPROVAL_EVENTS_TABLE, TOPICS_TABLE};

    use super::*;

    #[test]
    fn plans_every_table_on_empty_schema() {
        let steps = plan_steps("public", &workflow_tables(), &HashSet::new());
        assert_eq!(steps.len(), 2);

        let ddls = steps.into_iter().next().unwrap().ddls();
        assert!(ddls[0].starts_with("CREATE TABLE \"public\".\"topics\""));
        assert!(ddls[0].contains("PRIMARY KEY(id)"));
    }

    #[test]
    fn skips_existing_tables() {
        let existing = HashSet::from([TOPICS_TABLE.to_string()]);
        let steps = plan_steps("editorial", &workflow_tables(), &existing);
        assert_eq!(steps.len(), 1);

        let ddls = steps.into_iter().next().unwrap().ddls();
        assert!(ddls[0].contains(APPROVAL_EVENTS_TABLE));
        assert!(ddls.iter().any(|ddl| ddl.contains("FOREIGN KEY (\"topic_id\")")));
    }

    #[test]
    fn nothing_to_do_when_schema_is_complete() {
        let existing = HashSet::from([
            TOPICS_TABLE.to_string(),
            APPROVAL_EVENTS_TABLE.to_string(),
        ]);
        assert!(plan_steps("public", &workflow_tables(), &existing).is_empty());
    }

    #[test]
    fn status_column_carries_check_constraint() {
        let tables = workflow_tables();
        let ddl = &create_table_ddl("public", &tables[0])[0];
        assert!(ddl.contains("\"status\" VARCHAR(32) NOT NULL CHECK (\"status\" IN ('draft', 'pending', 'revision_required', 'approved', 'rejected'))"));
    }

    #[test]
    fn non_unique_index_has_single_space() {
        let index = Index::new("topics", vec!["status"], false);
        assert_eq!(
            create_index_ddl("public", &index),
            "CREATE INDEX \"topics_status_idx\" ON \"public\".\"topics\" (\"status\")"
        );
    }
}
