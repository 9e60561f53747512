//! Input rules for boards and tasks.
//!
//! Validation happens before anything touches the store. Foreign keys are
//! only checked for shape here; whether the referenced board exists is the
//! caller's job, since that needs the store.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use kanban_core::{KanbanError, KanbanResult};

use crate::board::{Board, BoardId, BoardUpdate};
use crate::field_update::FieldUpdate;
use crate::input::{CreateBoardInput, CreateTaskInput, UpdateBoardInput, UpdateTaskInput};
use crate::task::{Task, TaskPriority, TaskStatus, TaskUpdate};

pub const MAX_NAME_LENGTH: usize = 255;

/// A validated task creation request. The board reference is still the raw
/// string from the request until the caller resolves it against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub board_ref: String,
}

/// A validated partial task update, pending resolution of `board_ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub update: TaskUpdate,
    pub board_ref: Option<String>,
}

impl NewTask {
    pub fn into_task(self, board_id: BoardId) -> Task {
        let mut task = Task::new(board_id, self.title);
        task.description = self.description;
        task.status = self.status;
        task.priority = self.priority;
        task.due_date = self.due_date;
        task
    }
}

impl TaskChanges {
    pub fn into_update(self, board_id: Option<BoardId>) -> TaskUpdate {
        TaskUpdate {
            board_id,
            ..self.update
        }
    }
}

fn check_board_name(name: Option<String>) -> KanbanResult<String> {
    let name = name.unwrap_or_default();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(KanbanError::validation("Board name is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(KanbanError::validation(
            "Board name must be less than 255 characters",
        ));
    }
    Ok(trimmed.to_string())
}

fn check_title_length(title: &str) -> KanbanResult<()> {
    if title.chars().count() > MAX_NAME_LENGTH {
        return Err(KanbanError::validation(
            "Task title must be less than 255 characters",
        ));
    }
    Ok(())
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
/// An empty string means "no due date".
pub fn parse_due_date(raw: &str) -> KanbanResult<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(datetime.with_timezone(&Utc).trunc_subsecs(6)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| KanbanError::validation("Invalid due date"))
}

/// An empty status or priority counts as not supplied.
fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|raw| !raw.is_empty())
}

pub fn validate_create_board(input: CreateBoardInput) -> KanbanResult<Board> {
    let name = check_board_name(input.name)?;
    Ok(Board::new(name, input.description))
}

pub fn validate_update_board(input: UpdateBoardInput) -> KanbanResult<BoardUpdate> {
    let name = check_board_name(input.name)?;
    Ok(BoardUpdate {
        name,
        description: input.description,
    })
}

pub fn validate_create_task(input: CreateTaskInput) -> KanbanResult<NewTask> {
    let title = input.title.unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return Err(KanbanError::validation("Task title is required"));
    }
    check_title_length(&title)?;

    let board_ref = input.board_id.unwrap_or_default().trim().to_string();
    if board_ref.is_empty() {
        return Err(KanbanError::validation("Board ID is required"));
    }

    let status = supplied(&input.status)
        .map(str::parse::<TaskStatus>)
        .transpose()?
        .unwrap_or_default();
    let priority = supplied(&input.priority)
        .map(str::parse::<TaskPriority>)
        .transpose()?
        .unwrap_or_default();
    let due_date = match input.due_date.as_deref() {
        Some(raw) => parse_due_date(raw)?,
        None => None,
    };

    Ok(NewTask {
        title,
        description: input.description,
        status,
        priority,
        due_date,
        board_ref,
    })
}

pub fn validate_update_task(input: UpdateTaskInput) -> KanbanResult<TaskChanges> {
    let title = match input.title {
        Some(title) => {
            let trimmed = title.trim().to_string();
            if trimmed.is_empty() {
                return Err(KanbanError::validation("Task title cannot be empty"));
            }
            check_title_length(&trimmed)?;
            Some(trimmed)
        }
        None => None,
    };

    let status = supplied(&input.status)
        .map(str::parse::<TaskStatus>)
        .transpose()?;
    let priority = supplied(&input.priority)
        .map(str::parse::<TaskPriority>)
        .transpose()?;
    let due_date = input.due_date.try_map(|raw| {
        parse_due_date(&raw).map(|parsed| match parsed {
            Some(date) => FieldUpdate::Set(date),
            None => FieldUpdate::Clear,
        })
    })?;

    Ok(TaskChanges {
        update: TaskUpdate {
            title,
            description: input.description,
            status,
            priority,
            due_date,
            board_id: None,
        },
        board_ref: input.board_id,
    })
}
