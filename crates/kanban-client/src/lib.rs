pub mod api;
pub mod board_view;
pub mod controller;
pub mod model;
pub mod status;

pub use api::{HttpClient, KanbanApi};
pub use board_view::{
    default_columns, partition, BoardView, ColumnBucket, DragOutcome, DropEvent, DropLocation,
    Partition, PendingMove, ViewState,
};
pub use controller::{BoardController, ReconcilePolicy};
pub use model::{BoardDetail, BoardInfo, ColumnInfo, TaskCard, TaskDetail};
pub use status::{parse_status, StatusResolution};
