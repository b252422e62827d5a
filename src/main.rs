use clap::Parser;
use log::error;
use noteboard::cli::{
    run_add, run_board, run_delete, run_done, run_due, run_edit, run_list, run_priority,
    AddOptions, Cli, Commands,
};
use noteboard::config::Config;
use noteboard::logging::{active_log_dir, init_logging};
use noteboard::Store;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.db, cli.log_level)?;

    if let Err(e) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = run(cli.command, &config);
    if let Err(ref e) = result {
        error!("event=command_failed error={:#}", e);
        if let Some(dir) = active_log_dir() {
            eprintln!("Details logged to {}", dir.display());
        }
    }
    result
}

fn run(command: Option<Commands>, config: &Config) -> anyhow::Result<()> {
    let store = Store::open_at(config.db_path.clone())?;

    match command {
        None => {
            // No subcommand provided - open the interactive board
            run_board(&store)?;
        }
        Some(Commands::List(args)) => {
            run_list(&store, args.reminders, args.filter)?;
        }
        Some(Commands::Add(args)) => {
            let opts = AddOptions {
                title: args.title.as_deref(),
                content: args.content.as_deref(),
                priority: args.priority,
                due: args.due.as_deref(),
            };
            run_add(&store, args.kind, opts)?;
        }
        Some(Commands::Edit(args)) => {
            run_edit(
                &store,
                &args.identifier,
                args.title.as_deref(),
                args.content.as_deref(),
            )?;
        }
        Some(Commands::Priority(args)) => {
            run_priority(&store, &args.identifier, args.priority)?;
        }
        Some(Commands::Due(args)) => {
            run_due(&store, &args.identifier, &args.date)?;
        }
        Some(Commands::Done(args)) => {
            run_done(&store, &args.identifier)?;
        }
        Some(Commands::Delete(args)) => {
            run_delete(&store, &args.identifier, args.force)?;
        }
    }

    Ok(())
}
