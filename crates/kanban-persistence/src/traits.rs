use async_trait::async_trait;
use kanban_core::KanbanResult;
use kanban_domain::{Board, BoardId, BoardSummary, Task, TaskId};

/// Row-level access to boards and tasks.
///
/// Implementations must keep `Task::board_id` pointing at an existing board:
/// inserting or re-pointing a task at a missing board fails, and deleting a
/// board deletes its tasks. Listings are ordered most recently updated first.
#[async_trait]
pub trait KanbanStore: Send + Sync {
    /// All boards with their task counts
    async fn list_boards(&self) -> KanbanResult<Vec<BoardSummary>>;

    async fn find_board(&self, id: BoardId) -> KanbanResult<Option<Board>>;

    async fn board_exists(&self, id: BoardId) -> KanbanResult<bool>;

    async fn insert_board(&self, board: &Board) -> KanbanResult<()>;

    /// Overwrite a stored board. Returns false when no row has that id.
    async fn update_board(&self, board: &Board) -> KanbanResult<bool>;

    /// Delete a board and, transitively, its tasks. Returns false when absent.
    async fn delete_board(&self, id: BoardId) -> KanbanResult<bool>;

    async fn list_tasks_by_board(&self, board_id: BoardId) -> KanbanResult<Vec<Task>>;

    async fn find_task(&self, id: TaskId) -> KanbanResult<Option<Task>>;

    async fn insert_task(&self, task: &Task) -> KanbanResult<()>;

    /// Overwrite a stored task. Returns false when no row has that id.
    async fn update_task(&self, task: &Task) -> KanbanResult<bool>;

    async fn delete_task(&self, id: TaskId) -> KanbanResult<bool>;

    /// Release connections. The store must not be used afterwards.
    async fn close(&self);
}
