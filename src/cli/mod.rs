use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::board::Filter;
use crate::models::{Priority, RecordKind};

pub mod add;
pub mod board;
pub mod delete;
pub mod edit;
pub mod list;
pub mod ui;

pub use add::{run_add, AddOptions};
pub use board::run_board;
pub use delete::run_delete;
pub use edit::{run_done, run_due, run_edit, run_priority};
pub use list::run_list;

#[derive(Parser)]
#[command(name = "noteboard")]
#[command(about = "Sticky notes and reminders for the terminal")]
#[command(version)]
pub struct Cli {
    /// Database file (default: <config dir>/noteboard/board.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// Log level: error, warn, info, debug, trace or off
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes, or reminders with --reminders
    List(ListArgs),
    /// Add a note or a reminder
    Add(AddArgs),
    /// Change the title or body of a record
    Edit(EditArgs),
    /// Set a note's priority
    Priority(PriorityArgs),
    /// Set a reminder's due date
    Due(DueArgs),
    /// Toggle a record between open and completed
    Done(DoneArgs),
    /// Delete a record
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Show reminders instead of notes
    #[arg(short, long)]
    pub reminders: bool,
    /// Priority filter for notes: all, low, medium or high
    #[arg(short, long, default_value = "all")]
    pub filter: Filter,
}

#[derive(Args)]
pub struct AddArgs {
    /// Record type: note or reminder
    #[arg(default_value = "note")]
    pub kind: RecordKind,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub content: Option<String>,
    /// Note priority: low, medium or high
    #[arg(short, long)]
    pub priority: Option<Priority>,
    /// Reminder due date: YYYY-MM-DD, today or tomorrow
    #[arg(short, long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Record id or part of its title
    pub identifier: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub content: Option<String>,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Record id or part of its title
    pub identifier: String,
    /// low, medium or high
    pub priority: Priority,
}

#[derive(Args)]
pub struct DueArgs {
    /// Record id or part of its title
    pub identifier: String,
    /// YYYY-MM-DD, today or tomorrow
    pub date: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Record id or part of its title
    pub identifier: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Record id or part of its title
    pub identifier: String,
    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_reminder() {
        let cli = Cli::try_parse_from([
            "noteboard", "add", "reminder", "--title", "Dentist", "--due", "tomorrow",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.kind, RecordKind::Reminder);
                assert_eq!(args.title.as_deref(), Some("Dentist"));
                assert_eq!(args.due.as_deref(), Some("tomorrow"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_list_filter_and_global_db() {
        let cli = Cli::try_parse_from(["noteboard", "list", "--filter", "high", "--db", "/tmp/b.db"])
            .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/b.db")));
        match cli.command {
            Some(Commands::List(args)) => {
                assert!(!args.reminders);
                assert_eq!(args.filter, Filter::Only(Priority::High));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_priority() {
        assert!(Cli::try_parse_from(["noteboard", "priority", "1", "urgent"]).is_err());
    }

    #[test]
    fn test_no_subcommand_opens_board() {
        let cli = Cli::try_parse_from(["noteboard"]).unwrap();
        assert!(cli.command.is_none());
    }
}
