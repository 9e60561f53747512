use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kanban_domain::{CreateBoardInput, UpdateBoardInput};

use super::deleted;
use crate::error::ApiError;
use crate::state::SharedState;

pub(super) async fn list_boards(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let boards = state
        .service
        .list_boards()
        .await
        .map_err(ApiError::context("Failed to fetch boards"))?;
    Ok(Json(boards))
}

pub(super) async fn get_board(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let board = state
        .service
        .get_board(&id)
        .await
        .map_err(ApiError::context("Failed to fetch board"))?;
    Ok(Json(board))
}

pub(super) async fn create_board(
    State(state): State<SharedState>,
    payload: Result<Json<CreateBoardInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let board = state
        .service
        .create_board(input)
        .await
        .map_err(ApiError::context("Failed to create board"))?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub(super) async fn update_board(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBoardInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let board = state
        .service
        .update_board(&id, input)
        .await
        .map_err(ApiError::context("Failed to update board"))?;
    Ok(Json(board))
}

pub(super) async fn delete_board(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .service
        .delete_board(&id)
        .await
        .map_err(ApiError::context("Failed to delete board"))?;
    Ok(deleted("Board deleted successfully"))
}
