use editorial_common::database::Database;

use crate::{
    domain::migration::{Migration, apply_migration_steps, migration_steps},
    infrastructure::tables::TablesAdapter,
};

#[derive(Clone)]
pub struct MigrationAdapter {
    tables: TablesAdapter,
    database: Database,
}

impl MigrationAdapter {
    pub fn new(tables: TablesAdapter, database: Database) -> Self {
        Self { tables, database }
    }
}

impl Migration for MigrationAdapter {
    type T = TablesAdapter;

    async fn migrate(&self) -> Result<(), anyhow::Error> {
        let database_schema = self.database.database_schema();
        let steps = migration_steps(database_schema, &self.tables).await?;
        if steps.is_empty() {
            tracing::info!(schema = database_schema, "workflow schema is up to date");
        }
        apply_migration_steps(steps, &self.database).await?;
        Ok(())
    }
}
