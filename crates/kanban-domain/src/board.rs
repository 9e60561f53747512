use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field_update::FieldUpdate;
use crate::task::Task;

pub type BoardId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-field board update: the name is always rewritten, the description
/// only when the caller said something about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUpdate {
    pub name: String,
    pub description: FieldUpdate<String>,
}

/// A board as it appears in the board listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    #[serde(flatten)]
    pub board: Board,
    pub task_count: u64,
}

/// A board together with every task it owns, most recently updated first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardWithTasks {
    #[serde(flatten)]
    pub board: Board,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Board {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = crate::timestamp();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(&mut self, update: BoardUpdate) {
        self.name = update.name;
        update.description.apply_to(&mut self.description);
        self.updated_at = crate::timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_timestamps_match() {
        let board = Board::new("Sprint 1".to_string(), None);
        assert_eq!(board.created_at, board.updated_at);
        assert_eq!(board.description, None);
    }

    #[test]
    fn test_update_keeps_description_on_no_change() {
        let mut board = Board::new("Sprint 1".to_string(), Some("first".to_string()));
        let created = board.created_at;

        board.update(BoardUpdate {
            name: "Sprint 2".to_string(),
            description: FieldUpdate::NoChange,
        });

        assert_eq!(board.name, "Sprint 2");
        assert_eq!(board.description, Some("first".to_string()));
        assert_eq!(board.created_at, created);
        assert!(board.updated_at >= created);
    }

    #[test]
    fn test_update_clears_description() {
        let mut board = Board::new("Sprint 1".to_string(), Some("first".to_string()));
        board.update(BoardUpdate {
            name: "Sprint 1".to_string(),
            description: FieldUpdate::Clear,
        });
        assert_eq!(board.description, None);
    }

    #[test]
    fn test_summary_serializes_flat_camel_case() {
        let board = Board::new("Sprint 1".to_string(), None);
        let summary = BoardSummary {
            board: board.clone(),
            task_count: 3,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], board.id.to_string());
        assert_eq!(json["name"], "Sprint 1");
        assert_eq!(json["taskCount"], 3);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("board").is_none());
    }
}
