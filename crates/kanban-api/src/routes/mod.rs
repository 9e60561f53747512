mod boards;
mod tasks;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::error::ApiError;
use crate::state::SharedState;

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/boards",
            get(boards::list_boards).post(boards::create_board),
        )
        .route(
            "/api/boards/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/api/tasks", axum::routing::post(tasks::create_task))
        .route("/api/tasks/board/{board_id}", get(tasks::list_tasks_by_board))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/health", get(health_check))
        .fallback(route_not_found)
}

fn deleted(message: &'static str) -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "message": message })))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
