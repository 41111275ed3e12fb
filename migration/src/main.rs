use crate::{
    domain::migration::Migration,
    infrastructure::{migration::MigrationAdapter, settings::Settings, tables::TablesAdapter},
};
use editorial_common::database::Database;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod domain;
pub mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = Database::connect(&settings.database).await?;
    let tables = TablesAdapter::new(database.clone());

    // create whatever part of the workflow schema is missing
    let migration = MigrationAdapter::new(tables, database);
    migration.migrate().await?;
    tracing::info!("workflow schema migrated");

    Ok(())
}
