use kanban_client::KanbanApi;
use kanban_domain::{CreateBoardInput, FieldUpdate, UpdateBoardInput};

use crate::cli::{BoardAction, BoardUpdateArgs};
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::List => {
            let boards = ctx.client.list_boards().await?;
            output::output_list(boards)
        }
        BoardAction::Get { id } => {
            let board = ctx.client.get_board(&id).await?;
            output::output_success(&board)
        }
        BoardAction::Create { name, description } => {
            let input = CreateBoardInput {
                name: Some(name),
                description,
            };
            let board = ctx.client.create_board(&input).await?;
            output::output_success(&board)
        }
        BoardAction::Update(args) => {
            let id = args.id.clone();
            let board = ctx.client.update_board(&id, &build_update(args)).await?;
            output::output_success(&board)
        }
        BoardAction::Delete { id } => {
            ctx.client.delete_board(&id).await?;
            output::output_deleted(&id)
        }
    }
}

fn build_update(args: BoardUpdateArgs) -> UpdateBoardInput {
    let description = match (args.description, args.clear_description) {
        (Some(description), _) => FieldUpdate::Set(description),
        (None, true) => FieldUpdate::Clear,
        (None, false) => FieldUpdate::NoChange,
    };
    UpdateBoardInput {
        name: Some(args.name),
        description,
    }
}
