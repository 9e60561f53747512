use crate::traits::KanbanStore;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use kanban_core::{DatabaseConfig, KanbanError, KanbanResult};
use kanban_domain::{Board, BoardId, BoardSummary, Task, TaskId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

const SCHEMA: &str = include_str!("../schema.sql");

const BOARD_COLUMNS: &str = "id, name, description, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, board_id, created_at, updated_at";

fn db_error(e: sqlx::Error) -> KanbanError {
    KanbanError::Database(e.to_string())
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> KanbanResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| KanbanError::Serialization(e.to_string()))
}

fn parse_uuid(raw: &str) -> KanbanResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| KanbanError::Serialization(e.to_string()))
}

/// SQLite-backed store. Foreign keys are switched on for every connection so
/// `ON DELETE CASCADE` removes a board's tasks together with the board.
pub struct SqliteStore {
    location: PathBuf,
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> KanbanResult<Self> {
        let options = SqliteConnectOptions::from_str(&format!(
            "sqlite://{}?mode=rwc",
            config.path.display()
        ))
        .map_err(db_error)?
        .create_if_missing(true)
        .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| KanbanError::Connection(e.to_string()))?;

        Self::initialize(config.path.clone(), pool).await
    }

    pub async fn open(path: impl AsRef<Path>) -> KanbanResult<Self> {
        let config = DatabaseConfig {
            path: path.as_ref().to_path_buf(),
            ..DatabaseConfig::default()
        };
        Self::connect(&config).await
    }

    /// A private database living in a single pooled connection.
    pub async fn in_memory() -> KanbanResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db_error)?
            .foreign_keys(true);

        // Every new connection would see its own empty database, so pin one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| KanbanError::Connection(e.to_string()))?;

        Self::initialize(PathBuf::from(":memory:"), pool).await
    }

    async fn initialize(location: PathBuf, pool: Pool<Sqlite>) -> KanbanResult<Self> {
        sqlx::raw_sql(SCHEMA).execute(&pool).await.map_err(db_error)?;
        tracing::info!("Opened SQLite database at {}", location.display());
        Ok(Self { location, pool })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    fn row_to_board(row: &SqliteRow) -> KanbanResult<Board> {
        Ok(Board {
            id: parse_uuid(&row.try_get::<String, _>("id").map_err(db_error)?)?,
            name: row.try_get("name").map_err(db_error)?,
            description: row.try_get("description").map_err(db_error)?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(db_error)?)?,
            updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at").map_err(db_error)?)?,
        })
    }

    fn row_to_task(row: &SqliteRow) -> KanbanResult<Task> {
        let status: String = row.try_get("status").map_err(db_error)?;
        let priority: String = row.try_get("priority").map_err(db_error)?;
        let due_date: Option<String> = row.try_get("due_date").map_err(db_error)?;

        Ok(Task {
            id: parse_uuid(&row.try_get::<String, _>("id").map_err(db_error)?)?,
            title: row.try_get("title").map_err(db_error)?,
            description: row.try_get("description").map_err(db_error)?,
            status: status
                .parse()
                .map_err(|_| KanbanError::Serialization(format!("unknown status {status}")))?,
            priority: priority
                .parse()
                .map_err(|_| KanbanError::Serialization(format!("unknown priority {priority}")))?,
            due_date: due_date.as_deref().map(parse_timestamp).transpose()?,
            board_id: parse_uuid(&row.try_get::<String, _>("board_id").map_err(db_error)?)?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(db_error)?)?,
            updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at").map_err(db_error)?)?,
        })
    }
}

#[async_trait]
impl KanbanStore for SqliteStore {
    async fn list_boards(&self) -> KanbanResult<Vec<BoardSummary>> {
        sqlx::query(
            "SELECT b.id, b.name, b.description, b.created_at, b.updated_at,
                    COUNT(t.id) AS task_count
             FROM boards b
             LEFT JOIN tasks t ON t.board_id = b.id
             GROUP BY b.id
             ORDER BY b.updated_at DESC, b.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?
        .iter()
        .map(|row| {
            let task_count: i64 = row.try_get("task_count").map_err(db_error)?;
            Ok(BoardSummary {
                board: Self::row_to_board(row)?,
                task_count: u64::try_from(task_count).unwrap_or_default(),
            })
        })
        .collect()
    }

    async fn find_board(&self, id: BoardId) -> KanbanResult<Option<Board>> {
        sqlx::query(&format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .as_ref()
            .map(Self::row_to_board)
            .transpose()
    }

    async fn board_exists(&self, id: BoardId) -> KanbanResult<bool> {
        let row = sqlx::query("SELECT 1 FROM boards WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(row.is_some())
    }

    async fn insert_board(&self, board: &Board) -> KanbanResult<()> {
        sqlx::query(&format!(
            "INSERT INTO boards ({BOARD_COLUMNS}) VALUES (?, ?, ?, ?, ?)"
        ))
        .bind(board.id.to_string())
        .bind(&board.name)
        .bind(&board.description)
        .bind(format_timestamp(&board.created_at))
        .bind(format_timestamp(&board.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        tracing::debug!(board_id = %board.id, "Inserted board");
        Ok(())
    }

    async fn update_board(&self, board: &Board) -> KanbanResult<bool> {
        let result = sqlx::query(
            "UPDATE boards SET name = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&board.name)
        .bind(&board.description)
        .bind(format_timestamp(&board.updated_at))
        .bind(board.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_board(&self, id: BoardId) -> KanbanResult<bool> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(board_id = %id, "Deleted board and its tasks");
        }
        Ok(deleted)
    }

    async fn list_tasks_by_board(&self, board_id: BoardId) -> KanbanResult<Vec<Task>> {
        sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE board_id = ? ORDER BY updated_at DESC, id"
        ))
        .bind(board_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?
        .iter()
        .map(Self::row_to_task)
        .collect()
    }

    async fn find_task(&self, id: TaskId) -> KanbanResult<Option<Task>> {
        sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .as_ref()
            .map(Self::row_to_task)
            .transpose()
    }

    async fn insert_task(&self, task: &Task) -> KanbanResult<()> {
        sqlx::query(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date.as_ref().map(format_timestamp))
        .bind(task.board_id.to_string())
        .bind(format_timestamp(&task.created_at))
        .bind(format_timestamp(&task.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        tracing::debug!(task_id = %task.id, board_id = %task.board_id, "Inserted task");
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> KanbanResult<bool> {
        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, status = ?, priority = ?,
                due_date = ?, board_id = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date.as_ref().map(format_timestamp))
        .bind(task.board_id.to_string())
        .bind(format_timestamp(&task.updated_at))
        .bind(task.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_task(&self, id: TaskId) -> KanbanResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Closed SQLite database at {}", self.location.display());
    }
}
