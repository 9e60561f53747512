//! Behaviour every `KanbanStore` must share, run against both implementations.

use chrono::Duration;
use kanban_domain::{Board, Task};
use kanban_persistence::{InMemoryStore, KanbanStore, SqliteStore};

async fn stores() -> Vec<(&'static str, Box<dyn KanbanStore>)> {
    vec![
        (
            "memory",
            Box::new(InMemoryStore::new()) as Box<dyn KanbanStore>,
        ),
        (
            "sqlite",
            Box::new(SqliteStore::in_memory().await.unwrap()) as Box<dyn KanbanStore>,
        ),
    ]
}

#[tokio::test]
async fn test_boards_listed_newest_first_with_counts() {
    for (name, store) in stores().await {
        let mut old = Board::new("Old".to_string(), None);
        old.updated_at = old.updated_at - Duration::hours(1);
        let new = Board::new("New".to_string(), None);
        store.insert_board(&old).await.unwrap();
        store.insert_board(&new).await.unwrap();
        for title in ["a", "b"] {
            store
                .insert_task(&Task::new(old.id, title.to_string()))
                .await
                .unwrap();
        }

        let boards = store.list_boards().await.unwrap();
        let names: Vec<_> = boards.iter().map(|s| s.board.name.as_str()).collect();
        assert_eq!(names, ["New", "Old"], "{name}");
        assert_eq!(boards[0].task_count, 0, "{name}");
        assert_eq!(boards[1].task_count, 2, "{name}");
    }
}

#[tokio::test]
async fn test_tasks_listed_newest_first() {
    for (name, store) in stores().await {
        let board = Board::new("Board".to_string(), None);
        store.insert_board(&board).await.unwrap();

        let mut stale = Task::new(board.id, "stale".to_string());
        stale.updated_at = stale.updated_at - Duration::minutes(5);
        let fresh = Task::new(board.id, "fresh".to_string());
        store.insert_task(&stale).await.unwrap();
        store.insert_task(&fresh).await.unwrap();

        let titles: Vec<_> = store
            .list_tasks_by_board(board.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["fresh", "stale"], "{name}");
    }
}

#[tokio::test]
async fn test_delete_board_removes_only_its_tasks() {
    for (name, store) in stores().await {
        let keep = Board::new("Keep".to_string(), None);
        let drop = Board::new("Drop".to_string(), None);
        store.insert_board(&keep).await.unwrap();
        store.insert_board(&drop).await.unwrap();
        let survivor = Task::new(keep.id, "stays".to_string());
        let victim = Task::new(drop.id, "goes".to_string());
        store.insert_task(&survivor).await.unwrap();
        store.insert_task(&victim).await.unwrap();

        assert!(store.delete_board(drop.id).await.unwrap(), "{name}");
        assert!(store.find_task(victim.id).await.unwrap().is_none(), "{name}");
        assert_eq!(
            store.find_task(survivor.id).await.unwrap(),
            Some(survivor.clone()),
            "{name}"
        );
        assert!(!store.board_exists(drop.id).await.unwrap(), "{name}");
    }
}

#[tokio::test]
async fn test_update_rewrites_row() {
    for (name, store) in stores().await {
        let mut board = Board::new("Before".to_string(), Some("desc".to_string()));
        store.insert_board(&board).await.unwrap();
        board.name = "After".to_string();
        board.description = None;
        assert!(store.update_board(&board).await.unwrap(), "{name}");
        assert_eq!(
            store.find_board(board.id).await.unwrap(),
            Some(board.clone()),
            "{name}"
        );
    }
}

#[tokio::test]
async fn test_orphan_task_rejected() {
    for (name, store) in stores().await {
        let task = Task::new(uuid::Uuid::new_v4(), "orphan".to_string());
        assert!(store.insert_task(&task).await.is_err(), "{name}");
        assert!(store.find_task(task.id).await.unwrap().is_none(), "{name}");
    }
}
