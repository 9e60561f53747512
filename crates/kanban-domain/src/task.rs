use chrono::{DateTime, Utc};
use kanban_core::KanbanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::board::{Board, BoardId};
use crate::field_update::FieldUpdate;

pub type TaskId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Strict parse: only the exact canonical spelling is accepted.
impl FromStr for TaskStatus {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| KanbanError::validation("Invalid status value"))
    }
}

impl FromStr for TaskPriority {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| KanbanError::validation("Invalid priority value"))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task together with the board it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithBoard {
    #[serde(flatten)]
    pub task: Task,
    pub board: Board,
}

/// Partial task update. `None` / `NoChange` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: FieldUpdate<DateTime<Utc>>,
    pub board_id: Option<BoardId>,
}

impl Task {
    pub fn new(board_id: BoardId, title: String) -> Self {
        let now = crate::timestamp();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            board_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        update.description.apply_to(&mut self.description);
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        update.due_date.apply_to(&mut self.due_date);
        if let Some(board_id) = update.board_id {
            self.board_id = board_id;
        }
        self.updated_at = crate::timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_defaults() {
        let board_id = Uuid::new_v4();
        let task = Task::new(board_id, "Draft release notes".to_string());
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.board_id, board_id);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_status_parse_is_exact() {
        assert_eq!("TODO".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!(
            "IN_PROGRESS".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Done);

        for bad in ["done", "Done", "ARCHIVED", "", " DONE"] {
            let err = bad.parse::<TaskStatus>().unwrap_err();
            assert_eq!(err.message(), "Invalid status value");
        }
    }

    #[test]
    fn test_priority_parse_is_exact() {
        assert_eq!("LOW".parse::<TaskPriority>().unwrap(), TaskPriority::Low);
        assert_eq!("HIGH".parse::<TaskPriority>().unwrap(), TaskPriority::High);

        let err = "URGENT".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.message(), "Invalid priority value");
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<TaskPriority>("\"LOW\"").unwrap(),
            TaskPriority::Low
        );
    }

    #[test]
    fn test_update_status_only_leaves_other_fields() {
        let mut task = Task::new(Uuid::new_v4(), "Draft release notes".to_string());
        task.description = Some("draft the data model".to_string());
        task.priority = TaskPriority::High;

        task.update(TaskUpdate {
            status: Some(TaskStatus::Done),
            ..Default::default()
        });

        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, "Draft release notes");
        assert_eq!(task.description, Some("draft the data model".to_string()));
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn test_update_clears_due_date() {
        let mut task = Task::new(Uuid::new_v4(), "Ship".to_string());
        task.due_date = Some(Utc::now());

        task.update(TaskUpdate {
            due_date: FieldUpdate::Clear,
            ..Default::default()
        });

        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let task = Task::new(Uuid::new_v4(), "Draft release notes".to_string());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["boardId"], task.board_id.to_string());
        assert_eq!(json["status"], "TODO");
        assert_eq!(json["priority"], "MEDIUM");
        assert!(json["dueDate"].is_null());
    }
}
