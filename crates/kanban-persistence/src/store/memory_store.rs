use crate::traits::KanbanStore;
use async_trait::async_trait;
use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{Board, BoardId, BoardSummary, Task, TaskId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store with the same referential rules as the
/// SQLite store. Meant for tests and throwaway servers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    boards: HashMap<BoardId, Board>,
    tasks: HashMap<TaskId, Task>,
}

fn foreign_key_violation() -> KanbanError {
    KanbanError::Database("FOREIGN KEY constraint failed".to_string())
}

fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (chrono::DateTime<chrono::Utc>, uuid::Uuid),
{
    items.sort_by(|a, b| {
        let (a_updated, a_id) = key(a);
        let (b_updated, b_id) = key(b);
        b_updated.cmp(&a_updated).then(a_id.cmp(&b_id))
    });
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> KanbanResult<RwLockReadGuard<'_, InMemoryState>> {
        self.state
            .read()
            .map_err(|e| KanbanError::Internal(e.to_string()))
    }

    fn write(&self) -> KanbanResult<RwLockWriteGuard<'_, InMemoryState>> {
        self.state
            .write()
            .map_err(|e| KanbanError::Internal(e.to_string()))
    }
}

#[async_trait]
impl KanbanStore for InMemoryStore {
    async fn list_boards(&self) -> KanbanResult<Vec<BoardSummary>> {
        let state = self.read()?;
        let mut counts: HashMap<BoardId, u64> = HashMap::new();
        for task in state.tasks.values() {
            *counts.entry(task.board_id).or_default() += 1;
        }

        let mut summaries: Vec<BoardSummary> = state
            .boards
            .values()
            .map(|board| BoardSummary {
                board: board.clone(),
                task_count: counts.get(&board.id).copied().unwrap_or_default(),
            })
            .collect();
        newest_first(&mut summaries, |s| (s.board.updated_at, s.board.id));
        Ok(summaries)
    }

    async fn find_board(&self, id: BoardId) -> KanbanResult<Option<Board>> {
        Ok(self.read()?.boards.get(&id).cloned())
    }

    async fn board_exists(&self, id: BoardId) -> KanbanResult<bool> {
        Ok(self.read()?.boards.contains_key(&id))
    }

    async fn insert_board(&self, board: &Board) -> KanbanResult<()> {
        let mut state = self.write()?;
        if state.boards.contains_key(&board.id) {
            return Err(KanbanError::Database(format!(
                "UNIQUE constraint failed: boards.id ({})",
                board.id
            )));
        }
        state.boards.insert(board.id, board.clone());
        Ok(())
    }

    async fn update_board(&self, board: &Board) -> KanbanResult<bool> {
        let mut state = self.write()?;
        match state.boards.get_mut(&board.id) {
            Some(existing) => {
                *existing = board.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_board(&self, id: BoardId) -> KanbanResult<bool> {
        let mut state = self.write()?;
        if state.boards.remove(&id).is_none() {
            return Ok(false);
        }
        state.tasks.retain(|_, task| task.board_id != id);
        Ok(true)
    }

    async fn list_tasks_by_board(&self, board_id: BoardId) -> KanbanResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .read()?
            .tasks
            .values()
            .filter(|task| task.board_id == board_id)
            .cloned()
            .collect();
        newest_first(&mut tasks, |t| (t.updated_at, t.id));
        Ok(tasks)
    }

    async fn find_task(&self, id: TaskId) -> KanbanResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> KanbanResult<()> {
        let mut state = self.write()?;
        if !state.boards.contains_key(&task.board_id) {
            return Err(foreign_key_violation());
        }
        if state.tasks.contains_key(&task.id) {
            return Err(KanbanError::Database(format!(
                "UNIQUE constraint failed: tasks.id ({})",
                task.id
            )));
        }
        state.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> KanbanResult<bool> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id) {
            return Ok(false);
        }
        if !state.boards.contains_key(&task.board_id) {
            return Err(foreign_key_violation());
        }
        state.tasks.insert(task.id, task.clone());
        Ok(true)
    }

    async fn delete_task(&self, id: TaskId) -> KanbanResult<bool> {
        Ok(self.write()?.tasks.remove(&id).is_some())
    }

    async fn close(&self) {}
}
