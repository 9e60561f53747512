mod cli;
mod context;
mod handlers;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::CliContext;
use kanban_core::KanbanError;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("KANBAN_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = CliContext::load(cli.config.as_deref(), cli.api_url)?;

    match cli.command {
        Commands::Serve(args) => handlers::serve::handle(ctx.config, args).await,
        Commands::Board(board_cmd) => handlers::board::handle(&ctx, board_cmd.action).await,
        Commands::Task(task_cmd) => handlers::task::handle(&ctx, task_cmd.action).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_tracing(default_level)?;

    if let Err(err) = run(cli).await {
        let message = match err.downcast_ref::<KanbanError>() {
            Some(kanban_err) => kanban_err.message(),
            None => format!("{:#}", err),
        };
        output::output_error(&message);
    }

    Ok(())
}
