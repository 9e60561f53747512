use kanban_client::{BoardController, DragOutcome, KanbanApi, TaskCard};
use kanban_core::KanbanError;
use kanban_domain::{CreateTaskInput, FieldUpdate, UpdateTaskInput};
use serde::Serialize;

use crate::cli::{TaskAction, TaskCreateArgs, TaskUpdateArgs};
use crate::context::CliContext;
use crate::output;

/// Result of `task move`.
#[derive(Debug, Serialize)]
pub struct MoveReport {
    pub outcome: &'static str,
    /// The destination column matched no status and the task went to TODO.
    pub normalized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    pub task: TaskCard,
}

pub async fn handle(ctx: &CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::List { board } => {
            let tasks = ctx.client.list_tasks(&board).await?;
            output::output_list(tasks)
        }
        TaskAction::Get { id } => {
            let task = ctx.client.get_task(&id).await?;
            output::output_success(&task)
        }
        TaskAction::Create(args) => {
            let task = ctx.client.create_task(&build_create(args)).await?;
            output::output_success(&task)
        }
        TaskAction::Update(args) => {
            let id = args.id.clone();
            let task = ctx.client.update_task(&id, &build_update(args)).await?;
            output::output_success(&task)
        }
        TaskAction::Move { id, column } => {
            let report = move_task(ctx, &id, &column).await?;
            output::output_success(&report)
        }
        TaskAction::Delete { id } => {
            ctx.client.delete_task(&id).await?;
            output::output_deleted(&id)
        }
    }
}

/// Load the task's board and replay a drop of the task onto `column`.
async fn move_task(ctx: &CliContext, id: &str, column: &str) -> anyhow::Result<MoveReport> {
    let task = ctx.client.get_task(id).await?;
    // The board lists tasks under the server's spelling of the id.
    let id = task.task.id.as_str();
    let mut controller = BoardController::new(ctx.client.clone(), ctx.reconcile_policy());
    let view = controller.load(&task.task.board_id).await?;

    let event = view
        .drop_event_for(id, column)
        .ok_or_else(|| KanbanError::not_found("Task not found"))?;
    let outcome = controller.on_drag_end(event).await?;

    let current = controller
        .view()
        .and_then(|view| view.task(id))
        .cloned()
        .ok_or_else(|| KanbanError::not_found("Task not found"))?;

    let report = match outcome {
        DragOutcome::Moved(pending) => MoveReport {
            outcome: "moved",
            normalized: pending.resolution.is_fallback(),
            previous_status: Some(pending.previous_status),
            task: current,
        },
        DragOutcome::Unchanged => MoveReport {
            outcome: "unchanged",
            normalized: false,
            previous_status: None,
            task: current,
        },
        DragOutcome::Cancelled | DragOutcome::UnknownTask => {
            return Err(KanbanError::not_found("Task not found").into())
        }
    };
    Ok(report)
}

fn build_create(args: TaskCreateArgs) -> CreateTaskInput {
    CreateTaskInput {
        title: Some(args.title),
        description: args.description,
        status: args.status,
        priority: args.priority,
        due_date: args.due_date,
        board_id: Some(args.board),
    }
}

fn clearable(value: Option<String>, clear: bool) -> FieldUpdate<String> {
    match (value, clear) {
        (Some(value), _) => FieldUpdate::Set(value),
        (None, true) => FieldUpdate::Clear,
        (None, false) => FieldUpdate::NoChange,
    }
}

fn build_update(args: TaskUpdateArgs) -> UpdateTaskInput {
    UpdateTaskInput {
        title: args.title,
        description: clearable(args.description, args.clear_description),
        status: args.status,
        priority: args.priority,
        due_date: clearable(args.due_date, args.clear_due_date),
        board_id: args.board,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_args(id: &str) -> TaskUpdateArgs {
        TaskUpdateArgs {
            id: id.to_string(),
            title: None,
            description: None,
            clear_description: false,
            status: None,
            priority: None,
            due_date: None,
            clear_due_date: false,
            board: None,
        }
    }

    #[test]
    fn test_update_sends_only_given_fields() {
        let args = TaskUpdateArgs {
            status: Some("DONE".to_string()),
            ..update_args("t1")
        };
        assert_eq!(
            serde_json::to_value(build_update(args)).unwrap(),
            serde_json::json!({ "status": "DONE" })
        );
    }

    #[test]
    fn test_clear_due_date_sends_null() {
        let args = TaskUpdateArgs {
            clear_due_date: true,
            ..update_args("t1")
        };
        assert_eq!(
            serde_json::to_value(build_update(args)).unwrap(),
            serde_json::json!({ "dueDate": null })
        );
    }
}
