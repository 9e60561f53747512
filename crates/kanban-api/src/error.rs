use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kanban_core::KanbanError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    /// Map a service error for one operation. Caller mistakes keep their
    /// message; anything else is logged and replaced by `operation`.
    pub fn from_kanban(err: KanbanError, operation: &'static str) -> Self {
        match err {
            KanbanError::Validation(msg) => ApiError::BadRequest(msg),
            KanbanError::NotFound(msg) => ApiError::NotFound(msg),
            other => {
                tracing::error!(error = %other, "{}", operation);
                ApiError::Internal(operation.to_string())
            }
        }
    }

    /// `map_err` adapter: `.map_err(ApiError::context("Failed to fetch boards"))`.
    pub fn context(operation: &'static str) -> impl FnOnce(KanbanError) -> ApiError {
        move |err| ApiError::from_kanban(err, operation)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => msg,
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_message() {
        match ApiError::from_kanban(KanbanError::validation("Board name is required"), "x") {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Board name is required"),
            other => panic!("unexpected {:?}", other),
        }
        let err = ApiError::from_kanban(KanbanError::not_found("Task not found"), "x");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_errors_are_masked() {
        let err = ApiError::from_kanban(
            KanbanError::Database("no such table: boards".into()),
            "Failed to fetch boards",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match err {
            ApiError::Internal(msg) => assert_eq!(msg, "Failed to fetch boards"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
