use std::sync::Arc;

use kanban_api::KanbanStore;
use kanban_core::AppConfig;
use kanban_persistence::{InMemoryStore, SqliteStore};

use crate::cli::ServeArgs;

pub async fn handle(mut config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(database) = args.database {
        config.database.path = database;
    }

    let store: Arc<dyn KanbanStore> = if args.in_memory {
        tracing::info!("Using in-memory store");
        Arc::new(InMemoryStore::new())
    } else {
        Arc::new(SqliteStore::connect(&config.database).await?)
    };

    kanban_api::serve(&config.server, store).await?;
    Ok(())
}
