use std::future::Future;
use std::sync::Arc;

use axum::Router;
use kanban_core::{KanbanError, KanbanResult, ServerConfig};
use kanban_persistence::KanbanStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::api_router;
use crate::state::{AppState, SharedState};

/// Build the application router. With `permissive_cors` any origin may call
/// the API, which browser clients served from another port need.
pub fn build_router(state: SharedState, permissive_cors: bool) -> Router {
    let app = api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind to the configured address and serve until Ctrl+C.
pub async fn serve(config: &ServerConfig, store: Arc<dyn KanbanStore>) -> KanbanResult<()> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| KanbanError::Connection(format!("Failed to bind to {}: {}", addr, e)))?;

    serve_with_shutdown(listener, store, config.permissive_cors, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves, then close
/// the store.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    store: Arc<dyn KanbanStore>,
    permissive_cors: bool,
    shutdown: F,
) -> KanbanResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    let app = build_router(AppState::new(store.clone()), permissive_cors);

    tracing::info!("Kanban API listening on http://{}", local_addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    store.close().await;
    tracing::info!("Server shut down gracefully");
    result.map_err(KanbanError::Io)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
