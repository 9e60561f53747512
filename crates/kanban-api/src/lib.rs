//! HTTP surface of the kanban board manager.
//!
//! The router is built around an injected [`KanbanStore`], so the same
//! handlers run against SQLite in production and an in-memory store in tests.

pub mod error;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;

pub use error::ApiError;
pub use server::{build_router, serve, serve_with_shutdown};
pub use service::KanbanService;
pub use state::{AppState, SharedState};

pub use kanban_persistence::KanbanStore;
