//! Client-side state of one board: its columns, its tasks and any
//! optimistic moves that are still waiting for the server.

use std::collections::HashMap;

use kanban_domain::TaskStatus;
use serde::Serialize;

use crate::model::{BoardDetail, BoardInfo, ColumnInfo, TaskCard};
use crate::status::{parse_status, StatusResolution};

/// Columns used when a board does not define its own.
pub fn default_columns() -> Vec<ColumnInfo> {
    [
        (TaskStatus::Todo, "To Do"),
        (TaskStatus::InProgress, "In Progress"),
        (TaskStatus::Done, "Done"),
    ]
    .into_iter()
    .map(|(status, title)| ColumnInfo {
        id: status.as_str().to_string(),
        title: title.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnBucket {
    pub column: ColumnInfo,
    pub tasks: Vec<TaskCard>,
}

/// Tasks grouped by column, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub buckets: Vec<ColumnBucket>,
    /// Ids of tasks whose status matched no column. They sit in the first
    /// bucket.
    pub misplaced: Vec<String>,
}

impl Partition {
    pub fn bucket(&self, column_id: &str) -> Option<&[TaskCard]> {
        self.buckets
            .iter()
            .find(|bucket| bucket.column.id == column_id)
            .map(|bucket| bucket.tasks.as_slice())
    }

    /// Column and index a task currently occupies.
    pub fn locate(&self, task_id: &str) -> Option<DropLocation> {
        self.buckets.iter().find_map(|bucket| {
            bucket
                .tasks
                .iter()
                .position(|task| task.id == task_id)
                .map(|index| DropLocation {
                    column_id: bucket.column.id.clone(),
                    index,
                })
        })
    }
}

/// Place every task in the column keyed by its status, or in the first
/// column when no such key exists. No task is ever dropped.
pub fn partition(columns: &[ColumnInfo], tasks: &[TaskCard]) -> Partition {
    let columns = if columns.is_empty() {
        default_columns()
    } else {
        columns.to_vec()
    };

    let mut buckets: Vec<ColumnBucket> = columns
        .into_iter()
        .map(|column| ColumnBucket {
            column,
            tasks: Vec::new(),
        })
        .collect();
    let mut misplaced = Vec::new();

    for task in tasks {
        let slot = match buckets.iter().position(|b| b.column.id == task.status) {
            Some(slot) => slot,
            None => {
                misplaced.push(task.id.clone());
                0
            }
        };
        buckets[slot].tasks.push(task.clone());
    }

    Partition { buckets, misplaced }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropLocation {
    pub column_id: String,
    pub index: usize,
}

/// What a drag library reports when a card is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub task_id: String,
    pub source: DropLocation,
    /// `None` when the drag was cancelled or released outside any column.
    pub destination: Option<DropLocation>,
}

/// An optimistic status change not yet confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub task_id: String,
    pub previous_status: String,
    pub status: TaskStatus,
    pub resolution: StatusResolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Cancelled,
    Unchanged,
    UnknownTask,
    Moved(PendingMove),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    board: BoardInfo,
    columns: Vec<ColumnInfo>,
    tasks: Vec<TaskCard>,
    pending: HashMap<String, PendingMove>,
}

impl BoardView {
    pub fn new(detail: BoardDetail) -> Self {
        let columns = if detail.columns.is_empty() {
            default_columns()
        } else {
            detail.columns
        };
        Self {
            board: detail.board,
            columns,
            tasks: detail.tasks,
            pending: HashMap::new(),
        }
    }

    pub fn board(&self) -> &BoardInfo {
        &self.board
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn tasks(&self) -> &[TaskCard] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&TaskCard> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn partition(&self) -> Partition {
        partition(&self.columns, &self.tasks)
    }

    pub fn pending(&self, task_id: &str) -> Option<&PendingMove> {
        self.pending.get(task_id)
    }

    /// Build the drop event for moving a task to the top of `column_id`.
    pub fn drop_event_for(&self, task_id: &str, column_id: &str) -> Option<DropEvent> {
        let source = self.partition().locate(task_id)?;
        Some(DropEvent {
            task_id: task_id.to_string(),
            source,
            destination: Some(DropLocation {
                column_id: column_id.to_string(),
                index: 0,
            }),
        })
    }

    /// Apply a drop locally. A move changes the task's status immediately
    /// and records the previous one so the change can be undone.
    pub fn apply_drop(&mut self, event: &DropEvent) -> DragOutcome {
        let Some(destination) = &event.destination else {
            return DragOutcome::Cancelled;
        };
        if destination == &event.source {
            return DragOutcome::Unchanged;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == event.task_id) else {
            return DragOutcome::UnknownTask;
        };

        let resolution = parse_status(&destination.column_id);
        let status = resolution.status();
        let previous_status = std::mem::replace(&mut task.status, status.as_str().to_string());

        let pending = PendingMove {
            task_id: event.task_id.clone(),
            previous_status,
            status,
            resolution,
        };
        self.pending.insert(event.task_id.clone(), pending.clone());
        DragOutcome::Moved(pending)
    }

    /// The server accepted the move: adopt its copy of the task.
    pub fn confirm(&mut self, server_copy: TaskCard) {
        self.pending.remove(&server_copy.id);
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == server_copy.id) {
            *task = server_copy;
        }
    }

    /// Undo an optimistic move. Returns false when nothing was pending.
    pub fn revert(&mut self, task_id: &str) -> bool {
        let Some(pending) = self.pending.remove(task_id) else {
            return false;
        };
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.status = pending.previous_status;
        }
        true
    }

    /// Forget the pending marker but leave the optimistic status in place.
    pub fn abandon(&mut self, task_id: &str) {
        self.pending.remove(task_id);
    }

    /// A newly created task goes to the front of the list.
    pub fn add_task(&mut self, task: TaskCard) {
        self.tasks.insert(0, task);
    }
}

/// Lifecycle of a board screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Loading,
    Ready(BoardView),
}
