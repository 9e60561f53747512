pub mod board;
pub mod field_update;
pub mod input;
pub mod task;
pub mod validation;

pub use board::{Board, BoardId, BoardSummary, BoardUpdate, BoardWithTasks};
pub use field_update::FieldUpdate;
pub use input::{CreateBoardInput, CreateTaskInput, UpdateBoardInput, UpdateTaskInput};
pub use task::{Task, TaskId, TaskPriority, TaskStatus, TaskUpdate, TaskWithBoard};
pub use validation::{NewTask, TaskChanges, MAX_NAME_LENGTH};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the precision the store keeps, so an entity
/// compares equal before and after a round trip through persistence.
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
