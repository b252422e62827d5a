use anyhow::Result;

use crate::board::{Board, Filter, View};
use crate::models::{Field, Record};
use crate::render::{date_label, flatten, is_overdue, truncate};
use crate::store::Store;

const TITLE_WIDTH: usize = 32;

/// Print the notes (or reminders) as a table, in board order
pub fn run_list(store: &Store, reminders: bool, filter: Filter) -> Result<()> {
    let mut board = Board::load(store)?;
    let view = if reminders { View::Reminders } else { View::Notes };
    board.switch_view(view);
    board.set_filter(filter);

    let today = board.today();
    let rows: Vec<String> = board
        .visible_records()
        .into_iter()
        .map(|r| format_row(r, is_overdue(r, today)))
        .collect();

    if rows.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    println!(
        "{:<14}  {:<3}  {:<title$}  {:<18}  {}",
        "ID",
        "",
        if reminders { "REMINDER" } else { "NOTE" },
        "DATE",
        if reminders { "" } else { "PRIORITY" },
        title = TITLE_WIDTH
    );
    for row in rows {
        println!("{}", row);
    }
    Ok(())
}

fn format_row(record: &Record, overdue: bool) -> String {
    let checkbox = if record.completed { "[x]" } else { "[ ]" };
    let title = truncate(&flatten(record.display_field(Field::Title)), TITLE_WIDTH);
    let trailing = match record.priority() {
        Some(p) => p.as_str().to_string(),
        None if overdue => "overdue".to_string(),
        None => String::new(),
    };
    format!(
        "{:<14}  {:<3}  {:<title$}  {:<18}  {}",
        record.id,
        checkbox,
        title,
        date_label(record),
        trailing,
        title = TITLE_WIDTH
    )
    .trim_end()
    .to_string()
}
