use anyhow::Result;

use crate::board::{Board, Prompter};
use crate::cli::edit::resolve_record;
use crate::cli::ui::confirm;
use crate::models::{Field, Record};
use crate::render::{date_label, flatten};
use crate::store::Store;

/// Execute the delete command
pub fn run_delete(store: &Store, identifier: &str, force: bool) -> Result<()> {
    let mut board = Board::load(store)?;
    let Some(record) = resolve_record(&board, identifier)? else {
        return Ok(());
    };

    print_summary(&record);
    println!();

    let mut prompter = CliPrompter { force };
    if board.delete_record(&record.id, &mut prompter)? {
        println!("Deleted.");
    }
    Ok(())
}

fn print_summary(record: &Record) {
    println!("{}", flatten(record.display_field(Field::Title)));
    let content = flatten(record.display_field(Field::Content));
    if !content.is_empty() {
        println!("  {}", content);
    }
    match record.priority() {
        Some(p) => println!("  {} | {}", date_label(record), p.label()),
        None => println!("  {}", date_label(record)),
    }
}

/// Asks on the terminal unless `--force` was given
struct CliPrompter {
    force: bool,
}

impl Prompter for CliPrompter {
    fn confirm_delete(&mut self, record: &Record) -> Result<bool> {
        if self.force {
            return Ok(true);
        }
        confirm(&format!(
            "Delete \"{}\"?",
            flatten(record.display_field(Field::Title))
        ))
    }
}
