use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::board::Board;
use crate::models::{parse_date_input, Field, Priority, Record};
use crate::store::Store;

/// Find a record by exact id, or by a unique title match.
/// Prints a message and returns `None` when nothing (or too much) matches.
pub(crate) fn resolve_record(board: &Board, identifier: &str) -> Result<Option<Record>> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    if let Some(record) = board.get(identifier) {
        return Ok(Some(record.clone()));
    }

    let needle = identifier.to_lowercase();
    let matches: Vec<&Record> = board
        .notes()
        .iter()
        .chain(board.reminders())
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .collect();

    match matches.len() {
        0 => {
            println!("No matches.");
            Ok(None)
        }
        1 => Ok(Some(matches[0].clone())),
        n => {
            println!("{} records match \"{}\". Use the id instead:", n, identifier);
            for record in matches {
                println!("  {}  {}", record.id, record.display_field(Field::Title));
            }
            Ok(None)
        }
    }
}

/// Replace a field through the same focus/edit/blur cycle the board uses
pub(crate) fn set_text(board: &mut Board, id: &str, field: Field, value: &str) -> Result<()> {
    board.focus_field(id, field)?;
    board.edit_field(id, field, value)?;
    board.blur_field(id, field)?;
    Ok(())
}

/// Execute the edit command
pub fn run_edit(
    store: &Store,
    identifier: &str,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<()> {
    if title.is_none() && content.is_none() {
        return Err(anyhow!("Nothing to change. Pass --title or --content."));
    }

    let mut board = Board::load(store)?;
    let Some(record) = resolve_record(&board, identifier)? else {
        return Ok(());
    };

    if let Some(title) = title {
        set_text(&mut board, &record.id, Field::Title, title)?;
    }
    if let Some(content) = content {
        set_text(&mut board, &record.id, Field::Content, content)?;
    }
    println!("Saved.");
    Ok(())
}

/// Execute the priority command
pub fn run_priority(store: &Store, identifier: &str, priority: Priority) -> Result<()> {
    let mut board = Board::load(store)?;
    let Some(record) = resolve_record(&board, identifier)? else {
        return Ok(());
    };
    if !record.is_note() {
        return Err(anyhow!("Reminders have no priority."));
    }

    board.change_priority(&record.id, priority)?;
    println!("Priority: {}.", priority.label());
    Ok(())
}

/// Execute the due command
pub fn run_due(store: &Store, identifier: &str, date: &str) -> Result<()> {
    let mut board = Board::load(store)?;
    let Some(record) = resolve_record(&board, identifier)? else {
        return Ok(());
    };
    if record.is_note() {
        return Err(anyhow!("Notes have no due date."));
    }

    let date: NaiveDate = parse_date_input(date, board.today())?;
    board.change_due_date(&record.id, date)?;
    println!("Due {}.", crate::render::format_date(date));
    Ok(())
}

/// Execute the done command (toggles completion)
pub fn run_done(store: &Store, identifier: &str) -> Result<()> {
    let mut board = Board::load(store)?;
    let Some(record) = resolve_record(&board, identifier)? else {
        return Ok(());
    };

    let completed = board.toggle_complete(&record.id)?;
    println!("{}", if completed { "Completed." } else { "Reopened." });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordKind, NOTE_TITLE_PLACEHOLDER};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    fn seeded(store: &Store, title: &str, kind: RecordKind, id: &str) {
        let mut record = Record::new(kind, id.to_string(), today());
        record.title = title.to_string();
        store.put(&record).unwrap();
    }

    #[test]
    fn test_resolve_by_id_and_title() {
        let store = Store::open_memory().unwrap();
        seeded(&store, "Groceries", RecordKind::Note, "100");
        seeded(&store, "Dentist", RecordKind::Reminder, "200");
        let board = Board::load(&store).unwrap();

        assert_eq!(resolve_record(&board, "100").unwrap().unwrap().title, "Groceries");
        assert_eq!(resolve_record(&board, "dent").unwrap().unwrap().id, "200");
        assert!(resolve_record(&board, "nothing here").unwrap().is_none());
        assert!(resolve_record(&board, "   ").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_title() {
        let store = Store::open_memory().unwrap();
        seeded(&store, "Call mom", RecordKind::Note, "1");
        seeded(&store, "Call bank", RecordKind::Note, "2");
        let board = Board::load(&store).unwrap();
        assert!(resolve_record(&board, "call").unwrap().is_none());
    }

    #[test]
    fn test_run_edit_blank_title_becomes_placeholder() {
        let store = Store::open_memory().unwrap();
        seeded(&store, "Groceries", RecordKind::Note, "100");

        run_edit(&store, "100", Some("  "), Some("milk")).unwrap();
        let saved = store.get("100", today()).unwrap().unwrap();
        assert_eq!(saved.title, NOTE_TITLE_PLACEHOLDER);
        assert_eq!(saved.content, "milk");
    }

    #[test]
    fn test_run_edit_requires_a_change() {
        let store = Store::open_memory().unwrap();
        assert!(run_edit(&store, "1", None, None).is_err());
    }

    #[test]
    fn test_run_priority_rejects_reminders() {
        let store = Store::open_memory().unwrap();
        seeded(&store, "Dentist", RecordKind::Reminder, "200");
        seeded(&store, "Groceries", RecordKind::Note, "100");

        assert!(run_priority(&store, "200", Priority::High).is_err());
        run_priority(&store, "100", Priority::High).unwrap();
        let saved = store.get("100", today()).unwrap().unwrap();
        assert_eq!(saved.priority, Some(Priority::High));
    }

    #[test]
    fn test_run_due_and_done() {
        let store = Store::open_memory().unwrap();
        seeded(&store, "Dentist", RecordKind::Reminder, "200");
        seeded(&store, "Groceries", RecordKind::Note, "100");

        assert!(run_due(&store, "100", "2025-02-01").is_err());
        assert!(run_due(&store, "200", "next week").is_err());
        run_due(&store, "200", "2025-02-01").unwrap();
        run_done(&store, "200").unwrap();

        let saved = store.get("200", today()).unwrap().unwrap();
        assert_eq!(saved.date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert!(saved.completed);

        run_done(&store, "200").unwrap();
        assert!(!store.get("200", today()).unwrap().unwrap().completed);
    }
}
