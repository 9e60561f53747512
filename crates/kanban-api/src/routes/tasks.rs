use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kanban_domain::{CreateTaskInput, UpdateTaskInput};

use super::deleted;
use crate::error::ApiError;
use crate::state::SharedState;

pub(super) async fn list_tasks_by_board(
    State(state): State<SharedState>,
    Path(board_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state
        .service
        .list_tasks_by_board(&board_id)
        .await
        .map_err(ApiError::context("Failed to fetch tasks"))?;
    Ok(Json(tasks))
}

pub(super) async fn get_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state
        .service
        .get_task(&id)
        .await
        .map_err(ApiError::context("Failed to fetch task"))?;
    Ok(Json(task))
}

pub(super) async fn create_task(
    State(state): State<SharedState>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let task = state
        .service
        .create_task(input)
        .await
        .map_err(ApiError::context("Failed to create task"))?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub(super) async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let task = state
        .service
        .update_task(&id, input)
        .await
        .map_err(ApiError::context("Failed to update task"))?;
    Ok(Json(task))
}

pub(super) async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .service
        .delete_task(&id)
        .await
        .map_err(ApiError::context("Failed to delete task"))?;
    Ok(deleted("Task deleted successfully"))
}
