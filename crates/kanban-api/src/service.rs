use std::sync::Arc;

use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::validation::{
    validate_create_board, validate_create_task, validate_update_board, validate_update_task,
};
use kanban_domain::{
    Board, BoardId, BoardSummary, BoardWithTasks, CreateBoardInput, CreateTaskInput, Task,
    TaskWithBoard, UpdateBoardInput, UpdateTaskInput,
};
use kanban_persistence::KanbanStore;
use uuid::Uuid;

const BOARD_NOT_FOUND: &str = "Board not found";
const TASK_NOT_FOUND: &str = "Task not found";

/// Board and task operations on top of a [`KanbanStore`].
///
/// Ids arrive as raw path or body strings. Anything that is not a UUID cannot
/// name a stored row, so it is reported as not found.
#[derive(Clone)]
pub struct KanbanService {
    store: Arc<dyn KanbanStore>,
}

fn parse_id(raw: &str, not_found: &'static str) -> KanbanResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| KanbanError::not_found(not_found))
}

impl KanbanService {
    pub fn new(store: Arc<dyn KanbanStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KanbanStore> {
        &self.store
    }

    pub async fn list_boards(&self) -> KanbanResult<Vec<BoardSummary>> {
        self.store.list_boards().await
    }

    pub async fn get_board(&self, id: &str) -> KanbanResult<BoardWithTasks> {
        let id = parse_id(id, BOARD_NOT_FOUND)?;
        let board = self
            .store
            .find_board(id)
            .await?
            .ok_or_else(|| KanbanError::not_found(BOARD_NOT_FOUND))?;
        let tasks = self.store.list_tasks_by_board(id).await?;
        Ok(BoardWithTasks { board, tasks })
    }

    pub async fn create_board(&self, input: CreateBoardInput) -> KanbanResult<Board> {
        let board = validate_create_board(input)?;
        self.store.insert_board(&board).await?;
        tracing::info!(board_id = %board.id, name = %board.name, "Created board");
        Ok(board)
    }

    pub async fn update_board(&self, id: &str, input: UpdateBoardInput) -> KanbanResult<Board> {
        let update = validate_update_board(input)?;
        let id = parse_id(id, BOARD_NOT_FOUND)?;
        let mut board = self
            .store
            .find_board(id)
            .await?
            .ok_or_else(|| KanbanError::not_found(BOARD_NOT_FOUND))?;

        board.update(update);
        if !self.store.update_board(&board).await? {
            return Err(KanbanError::not_found(BOARD_NOT_FOUND));
        }
        Ok(board)
    }

    pub async fn delete_board(&self, id: &str) -> KanbanResult<()> {
        let id = parse_id(id, BOARD_NOT_FOUND)?;
        if !self.store.delete_board(id).await? {
            return Err(KanbanError::not_found(BOARD_NOT_FOUND));
        }
        tracing::info!(board_id = %id, "Deleted board");
        Ok(())
    }

    /// Tasks of a board. An unknown board simply has no tasks.
    pub async fn list_tasks_by_board(&self, board_id: &str) -> KanbanResult<Vec<Task>> {
        match Uuid::parse_str(board_id.trim()) {
            Ok(id) => self.store.list_tasks_by_board(id).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    pub async fn get_task(&self, id: &str) -> KanbanResult<TaskWithBoard> {
        let id = parse_id(id, TASK_NOT_FOUND)?;
        let task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| KanbanError::not_found(TASK_NOT_FOUND))?;
        let board = self.store.find_board(task.board_id).await?.ok_or_else(|| {
            KanbanError::Internal(format!("task {} references a missing board", task.id))
        })?;
        Ok(TaskWithBoard { task, board })
    }

    pub async fn create_task(&self, input: CreateTaskInput) -> KanbanResult<Task> {
        let new_task = validate_create_task(input)?;
        let board_id = self.resolve_board(&new_task.board_ref).await?;
        let task = new_task.into_task(board_id);
        self.store.insert_task(&task).await?;
        tracing::info!(task_id = %task.id, board_id = %board_id, "Created task");
        Ok(task)
    }

    pub async fn update_task(&self, id: &str, input: UpdateTaskInput) -> KanbanResult<Task> {
        let changes = validate_update_task(input)?;
        let board_id = match changes.board_ref.as_deref() {
            Some(board_ref) => Some(self.resolve_board(board_ref).await?),
            None => None,
        };

        let id = parse_id(id, TASK_NOT_FOUND)?;
        let mut task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| KanbanError::not_found(TASK_NOT_FOUND))?;

        task.update(changes.into_update(board_id));
        if !self.store.update_task(&task).await? {
            return Err(KanbanError::not_found(TASK_NOT_FOUND));
        }
        tracing::debug!(task_id = %task.id, status = %task.status, "Updated task");
        Ok(task)
    }

    pub async fn delete_task(&self, id: &str) -> KanbanResult<()> {
        let id = parse_id(id, TASK_NOT_FOUND)?;
        if !self.store.delete_task(id).await? {
            return Err(KanbanError::not_found(TASK_NOT_FOUND));
        }
        Ok(())
    }

    async fn resolve_board(&self, raw: &str) -> KanbanResult<BoardId> {
        let id = parse_id(raw, BOARD_NOT_FOUND)?;
        if !self.store.board_exists(id).await? {
            return Err(KanbanError::not_found(BOARD_NOT_FOUND));
        }
        Ok(id)
    }
}
