use anyhow::{anyhow, Result};

use crate::board::Board;
use crate::cli::edit::set_text;
use crate::models::{parse_date_input, Field, Priority, RecordKind};
use crate::store::Store;

/// Options for a new note or reminder. Unset fields keep their defaults.
#[derive(Debug, Default)]
pub struct AddOptions<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub priority: Option<Priority>,
    pub due: Option<&'a str>,
}

/// Execute the add command. Prints the new record's id.
pub fn run_add(store: &Store, kind: RecordKind, opts: AddOptions) -> Result<()> {
    let id = add_record(store, kind, &opts)?;
    println!("{}", id);
    Ok(())
}

fn add_record(store: &Store, kind: RecordKind, opts: &AddOptions) -> Result<String> {
    match kind {
        RecordKind::Note if opts.due.is_some() => {
            return Err(anyhow!("Notes have no due date. Use 'add reminder'."));
        }
        RecordKind::Reminder if opts.priority.is_some() => {
            return Err(anyhow!("Reminders have no priority. Use 'add note'."));
        }
        _ => {}
    }

    let mut board = Board::load(store)?;
    // Validate before anything is written
    let due = opts
        .due
        .map(|input| parse_date_input(input, board.today()))
        .transpose()?;

    let id = board.add(kind)?;
    if let Some(title) = opts.title {
        set_text(&mut board, &id, Field::Title, title)?;
    }
    if let Some(content) = opts.content {
        set_text(&mut board, &id, Field::Content, content)?;
    }
    if let Some(priority) = opts.priority {
        board.change_priority(&id, priority)?;
    }
    if let Some(date) = due {
        board.change_due_date(&id, date)?;
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{REMINDER_CONTENT_PLACEHOLDER, REMINDER_TITLE_PLACEHOLDER};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_note_with_fields() {
        let store = Store::open_memory().unwrap();
        let opts = AddOptions {
            title: Some("Groceries"),
            content: Some("milk, eggs"),
            priority: Some(Priority::High),
            due: None,
        };
        let id = add_record(&store, RecordKind::Note, &opts).unwrap();

        let saved = store.get(&id, day(2025, 1, 5)).unwrap().unwrap();
        assert_eq!(saved.kind, RecordKind::Note);
        assert_eq!(saved.title, "Groceries");
        assert_eq!(saved.content, "milk, eggs");
        assert_eq!(saved.priority, Some(Priority::High));
    }

    #[test]
    fn test_add_reminder_defaults() {
        let store = Store::open_memory().unwrap();
        let id = add_record(&store, RecordKind::Reminder, &AddOptions::default()).unwrap();

        let saved = store.get(&id, day(2025, 1, 5)).unwrap().unwrap();
        assert_eq!(saved.kind, RecordKind::Reminder);
        assert_eq!(saved.title, REMINDER_TITLE_PLACEHOLDER);
        assert_eq!(saved.content, REMINDER_CONTENT_PLACEHOLDER);
        assert_eq!(saved.priority, None);
    }

    #[test]
    fn test_add_reminder_with_due() {
        let store = Store::open_memory().unwrap();
        let opts = AddOptions {
            due: Some("2025-03-01"),
            ..Default::default()
        };
        let id = add_record(&store, RecordKind::Reminder, &opts).unwrap();
        let saved = store.get(&id, day(2025, 1, 5)).unwrap().unwrap();
        assert_eq!(saved.date, day(2025, 3, 1));
    }

    #[test]
    fn test_add_rejects_mismatched_options() {
        let store = Store::open_memory().unwrap();
        let note_with_due = AddOptions {
            due: Some("2025-03-01"),
            ..Default::default()
        };
        assert!(add_record(&store, RecordKind::Note, &note_with_due).is_err());

        let reminder_with_priority = AddOptions {
            priority: Some(Priority::Low),
            ..Default::default()
        };
        assert!(add_record(&store, RecordKind::Reminder, &reminder_with_priority).is_err());
    }

    #[test]
    fn test_add_bad_date_writes_nothing() {
        let store = Store::open_memory().unwrap();
        let before = {
            Board::load(&store).unwrap();
            store.count().unwrap()
        };
        let opts = AddOptions {
            due: Some("someday"),
            ..Default::default()
        };
        assert!(add_record(&store, RecordKind::Reminder, &opts).is_err());
        assert_eq!(store.count().unwrap(), before);
    }
}
