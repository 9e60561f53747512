use async_trait::async_trait;
use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{CreateBoardInput, CreateTaskInput, UpdateBoardInput, UpdateTaskInput};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::model::{BoardDetail, BoardInfo, TaskCard, TaskDetail};

/// Typed access to the kanban REST API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KanbanApi: Send + Sync {
    async fn list_boards(&self) -> KanbanResult<Vec<BoardInfo>>;

    async fn get_board(&self, id: &str) -> KanbanResult<BoardDetail>;

    async fn create_board(&self, input: &CreateBoardInput) -> KanbanResult<BoardInfo>;

    async fn update_board(&self, id: &str, input: &UpdateBoardInput) -> KanbanResult<BoardInfo>;

    async fn delete_board(&self, id: &str) -> KanbanResult<()>;

    async fn list_tasks(&self, board_id: &str) -> KanbanResult<Vec<TaskCard>>;

    async fn get_task(&self, id: &str) -> KanbanResult<TaskDetail>;

    async fn create_task(&self, input: &CreateTaskInput) -> KanbanResult<TaskCard>;

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> KanbanResult<TaskCard>;

    async fn delete_task(&self, id: &str) -> KanbanResult<()>;
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// [`KanbanApi`] over HTTP.
///
/// Transport failures and server errors surface as
/// [`KanbanError::Connection`] with a generic per-operation message. A 400 or
/// 404 keeps the message the server sent, since that one is meant for users.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base URL, escaping each one so an id can
    /// never reach another route.
    fn url(&self, segments: &[&str]) -> KanbanResult<reqwest::Url> {
        let invalid = || KanbanError::Config(format!("invalid API URL: {}", self.base_url));
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> KanbanResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, "{}", operation);
            KanbanError::Connection(operation.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<MessageBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| operation.to_string());
        tracing::debug!(%status, %message, "{}", operation);

        Err(match status {
            StatusCode::BAD_REQUEST => KanbanError::Validation(message),
            StatusCode::NOT_FOUND => KanbanError::NotFound(message),
            _ => KanbanError::Connection(operation.to_string()),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> KanbanResult<T> {
        self.execute(request, operation)
            .await?
            .json::<T>()
            .await
            .map_err(|e| KanbanError::Serialization(format!("{}: {}", operation, e)))
    }
}

#[async_trait]
impl KanbanApi for HttpClient {
    async fn list_boards(&self) -> KanbanResult<Vec<BoardInfo>> {
        self.fetch(self.client.get(self.url(&["api", "boards"])?), "Failed to fetch boards")
            .await
    }

    async fn get_board(&self, id: &str) -> KanbanResult<BoardDetail> {
        self.fetch(
            self.client.get(self.url(&["api", "boards", id])?),
            "Failed to fetch board",
        )
        .await
    }

    async fn create_board(&self, input: &CreateBoardInput) -> KanbanResult<BoardInfo> {
        self.fetch(
            self.client.post(self.url(&["api", "boards"])?).json(input),
            "Failed to create board",
        )
        .await
    }

    async fn update_board(&self, id: &str, input: &UpdateBoardInput) -> KanbanResult<BoardInfo> {
        self.fetch(
            self.client
                .put(self.url(&["api", "boards", id])?)
                .json(input),
            "Failed to update board",
        )
        .await
    }

    async fn delete_board(&self, id: &str) -> KanbanResult<()> {
        self.execute(
            self.client.delete(self.url(&["api", "boards", id])?),
            "Failed to delete board",
        )
        .await
        .map(|_| ())
    }

    async fn list_tasks(&self, board_id: &str) -> KanbanResult<Vec<TaskCard>> {
        self.fetch(
            self.client
                .get(self.url(&["api", "tasks", "board", board_id])?),
            "Failed to fetch tasks",
        )
        .await
    }

    async fn get_task(&self, id: &str) -> KanbanResult<TaskDetail> {
        self.fetch(
            self.client.get(self.url(&["api", "tasks", id])?),
            "Failed to fetch task",
        )
        .await
    }

    async fn create_task(&self, input: &CreateTaskInput) -> KanbanResult<TaskCard> {
        self.fetch(
            self.client.post(self.url(&["api", "tasks"])?).json(input),
            "Failed to create task",
        )
        .await
    }

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> KanbanResult<TaskCard> {
        self.fetch(
            self.client
                .put(self.url(&["api", "tasks", id])?)
                .json(input),
            "Failed to update task",
        )
        .await
    }

    async fn delete_task(&self, id: &str) -> KanbanResult<()> {
        self.execute(
            self.client.delete(self.url(&["api", "tasks", id])?),
            "Failed to delete task",
        )
        .await
        .map(|_| ())
    }
}
