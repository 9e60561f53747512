use std::sync::Arc;

use kanban_persistence::KanbanStore;

use crate::service::KanbanService;

pub struct AppState {
    pub service: KanbanService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Arc<dyn KanbanStore>) -> SharedState {
        Arc::new(Self {
            service: KanbanService::new(store),
        })
    }
}
