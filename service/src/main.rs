use std::time::Duration;

use editorial_common::database::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::AppState;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::memory::InMemoryTopicRepository;
use crate::infrastructure::persistence::repository::PostgresTopicRepository;
use crate::infrastructure::settings::{Settings, Storage};

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(storage = ?settings.storage, "configuration loaded");

    match settings.storage {
        Storage::Postgres => {
            let database = Database::connect(&settings.database).await?;
            let state = AppStateImpl::new(PostgresTopicRepository::new(database));
            serve(state, &settings).await
        }
        Storage::Memory => {
            tracing::warn!("using in-memory storage, topics are lost on restart");
            let state = AppStateImpl::new(InMemoryTopicRepository::new());
            serve(state, &settings).await
        }
    }
}

async fn serve(state: impl AppState, settings: &Settings) -> anyhow::Result<()> {
    let server_config = HttpServerConfig {
        port: &settings.server_port,
        request_timeout: Duration::from_secs(settings.request_timeout_seconds),
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
