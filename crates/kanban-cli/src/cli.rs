use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "A kanban board manager: REST API server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the kanban API (or set KANBAN_API_URL env var)
    #[arg(long, global = true, value_name = "URL", env = "KANBAN_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST API server
    Serve(ServeArgs),
    /// Board operations
    Board(BoardCommand),
    /// Task operations
    Task(TaskCommand),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, env = "KANBAN_HOST")]
    pub host: Option<String>,
    #[arg(long, env = "KANBAN_PORT")]
    pub port: Option<u16>,
    /// SQLite database file
    #[arg(long, value_name = "FILE", env = "KANBAN_DATABASE")]
    pub database: Option<PathBuf>,
    /// Keep everything in memory; data is lost on shutdown
    #[arg(long, conflicts_with = "database")]
    pub in_memory: bool,
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// List all boards with their task counts
    List,
    /// Get a board and its tasks
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a new board
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a board or change its description
    Update(BoardUpdateArgs),
    /// Delete a board and all of its tasks
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Args)]
pub struct BoardUpdateArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
}

// Task commands
#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List the tasks of a board
    List {
        #[arg(long)]
        board: String,
    },
    /// Get a task and its board
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a new task
    Create(TaskCreateArgs),
    /// Update fields of a task
    Update(TaskUpdateArgs),
    /// Move a task to another column, as a drag-and-drop would
    Move {
        #[arg(long)]
        id: String,
        /// Destination column, e.g. DONE or "in_progress"
        #[arg(long)]
        column: String,
    },
    /// Delete a task
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Args)]
pub struct TaskCreateArgs {
    #[arg(long)]
    pub board: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long)]
    pub due_date: Option<String>,
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long, conflicts_with = "clear_due_date")]
    pub due_date: Option<String>,
    #[arg(long)]
    pub clear_due_date: bool,
    /// Reassign the task to another board
    #[arg(long)]
    pub board: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_move() {
        let cli = Cli::try_parse_from([
            "kanban", "--api-url", "http://x", "task", "move", "--id", "t1", "--column", "done",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
        match cli.command {
            Commands::Task(TaskCommand {
                action: TaskAction::Move { id, column },
            }) => {
                assert_eq!(id, "t1");
                assert_eq!(column, "done");
            }
            _ => panic!("expected task move"),
        }
    }

    #[test]
    fn test_description_and_clear_conflict() {
        let result = Cli::try_parse_from([
            "kanban",
            "board",
            "update",
            "--id",
            "b1",
            "--name",
            "x",
            "--description",
            "y",
            "--clear-description",
        ]);
        assert!(result.is_err());
    }
}
