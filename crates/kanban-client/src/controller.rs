use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::UpdateTaskInput;

use crate::api::KanbanApi;
use crate::board_view::{BoardView, DragOutcome, DropEvent, ViewState};
use crate::model::TaskCard;
use crate::status::StatusResolution;

/// What to do with an optimistic move the server refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePolicy {
    /// Leave the local change in place even though the server never saw it.
    Keep,
    /// Retry the write, then put the task back where it was.
    RetryThenRevert { retries: u32 },
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        ReconcilePolicy::RetryThenRevert { retries: 1 }
    }
}

/// Drives one board screen: loading, drag-and-drop and task creation.
pub struct BoardController<A: KanbanApi> {
    api: A,
    policy: ReconcilePolicy,
    state: ViewState,
}

impl<A: KanbanApi> BoardController<A> {
    pub fn new(api: A, policy: ReconcilePolicy) -> Self {
        Self {
            api,
            policy,
            state: ViewState::Loading,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> Option<&BoardView> {
        match &self.state {
            ViewState::Ready(view) => Some(view),
            ViewState::Loading => None,
        }
    }

    pub async fn load(&mut self, board_id: &str) -> KanbanResult<&BoardView> {
        self.state = ViewState::Loading;
        let detail = self.api.get_board(board_id).await?;
        let view = BoardView::new(detail);

        let partition = view.partition();
        for task_id in &partition.misplaced {
            tracing::warn!(
                board_id = %view.board().id,
                task_id = %task_id,
                "Task status matches no column; showing it in the first column"
            );
        }

        self.state = ViewState::Ready(view);
        self.view()
            .ok_or_else(|| KanbanError::Internal("Board view did not load".into()))
    }

    /// Handle the end of a drag. The local state changes before the server
    /// is asked; a refused write is reconciled according to the policy and
    /// its error returned.
    pub async fn on_drag_end(&mut self, event: DropEvent) -> KanbanResult<DragOutcome> {
        let Self { api, policy, state } = self;
        let ViewState::Ready(view) = state else {
            return Err(KanbanError::Internal("Board view is not loaded".into()));
        };

        let outcome = view.apply_drop(&event);
        let DragOutcome::Moved(pending) = &outcome else {
            tracing::debug!(task_id = %event.task_id, ?outcome, "Ignoring drop");
            return Ok(outcome);
        };

        if let StatusResolution::Fallback { input } = &pending.resolution {
            tracing::warn!(
                task_id = %pending.task_id,
                column = %input,
                "Unknown column status, moving task to TODO"
            );
        }

        let body = UpdateTaskInput::status_only(pending.status.as_str());
        let attempts = match policy {
            ReconcilePolicy::Keep => 1,
            ReconcilePolicy::RetryThenRevert { retries } => retries.saturating_add(1),
        };

        let mut attempt = 0;
        let error = loop {
            attempt += 1;
            match api.update_task(&pending.task_id, &body).await {
                Ok(server_copy) => {
                    view.confirm(server_copy);
                    return Ok(outcome);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(task_id = %pending.task_id, attempt, error = %e, "Retrying move");
                }
                Err(e) => break e,
            }
        };

        match policy {
            ReconcilePolicy::Keep => {
                view.abandon(&pending.task_id);
                tracing::error!(
                    task_id = %pending.task_id,
                    error = %error,
                    "Move was not saved; local board now differs from the server"
                );
            }
            ReconcilePolicy::RetryThenRevert { .. } => {
                view.revert(&pending.task_id);
                tracing::warn!(
                    task_id = %pending.task_id,
                    status = %pending.previous_status,
                    error = %error,
                    "Move was not saved; reverted"
                );
            }
        }
        Err(error)
    }

    /// Show a task that was just created elsewhere at the top of the board.
    pub fn on_task_added(&mut self, task: TaskCard) {
        if let ViewState::Ready(view) = &mut self.state {
            view.add_task(task);
        }
    }
}
