//! Interactive board
//!
//! Keyboard-driven view over the notes and reminders. Each key maps to one
//! controller action; the screen is redrawn from the records afterwards.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use crossterm::{
    event::{KeyCode, KeyModifiers},
    queue,
    style::{Attribute, Print, SetAttribute},
};
use log::error;
use rand::rngs::ThreadRng;
use std::io::{self, IsTerminal, Write};
use std::thread;
use std::time::Duration;

use crate::board::{Board, Filter, Prompter, View};
use crate::cli::ui::{
    clear_screen, confirm, inline_edit, prompt_line, read_key, show_help, term_size, StatusBar,
};
use crate::models::{parse_date_input, Field, Priority, Record};
use crate::render::{draw_filter_bar, flatten, Card, Tilt, TiltCache};
use crate::store::Store;

/// Shown when a write to the store fails
const SAVE_FAILED: &str = "Could not save changes.";

const MAX_CARD_WIDTH: usize = 48;
const REMOVAL_FRAMES: u64 = 4;
const REMOVAL_FRAME_MS: u64 = 125;

enum Flow {
    Continue,
    Quit,
}

/// Run the interactive board until the user quits
pub fn run_board(store: &Store) -> Result<()> {
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive board requires a terminal. Use subcommands for non-interactive use:\n  \
            noteboard list\n  \
            noteboard add note --title <TITLE>\n  \
            Run 'noteboard --help' for all options."
        ));
    }

    let mut board = Board::load(store)?;
    let mut tilts = TiltCache::new();
    let mut rng = rand::thread_rng();
    let mut notice: Option<String> = None;

    loop {
        draw_screen(&board, &mut tilts, &mut rng, notice.take().as_deref())?;

        let Some(key) = read_key()? else {
            continue;
        };
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        match handle_key(&mut board, key.code, &mut tilts, &mut rng, &mut notice) {
            Ok(Flow::Quit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => {
                error!("event=action_failed error={:#}", e);
                notice = Some(notice_for(&e));
            }
        }
    }
}

fn handle_key(
    board: &mut Board,
    code: KeyCode,
    tilts: &mut TiltCache,
    rng: &mut ThreadRng,
    notice: &mut Option<String>,
) -> Result<Flow> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Quit),
        KeyCode::Char('?') => show_help()?,
        KeyCode::Down | KeyCode::Char('j') => board.select_next(),
        KeyCode::Up | KeyCode::Char('k') => board.select_prev(),
        KeyCode::Char('v') | KeyCode::Tab => {
            let view = board.session().view.toggled();
            board.switch_view(view);
        }
        KeyCode::Char('1') => board.set_filter(Filter::All),
        KeyCode::Char('2') => board.set_filter(Filter::Only(Priority::Low)),
        KeyCode::Char('3') => board.set_filter(Filter::Only(Priority::Medium)),
        KeyCode::Char('4') => board.set_filter(Filter::Only(Priority::High)),
        KeyCode::Char('n') => {
            let kind = board.session().view.kind();
            let id = board.add(kind)?;
            // Draw the new card before the title editor takes the bottom line
            draw_screen(board, tilts, rng, None)?;
            edit_field(board, &id, Field::Title)?;
        }
        KeyCode::Char('r') => {
            board.reload()?;
            *notice = Some("Reloaded.".to_string());
        }
        _ => {
            let Some(selected) = board.selected().cloned() else {
                return Ok(Flow::Continue);
            };
            match code {
                KeyCode::Char('e') => edit_field(board, &selected.id, Field::Title)?,
                KeyCode::Char('b') => edit_field(board, &selected.id, Field::Content)?,
                KeyCode::Char('c') | KeyCode::Char(' ') => {
                    board.toggle_complete(&selected.id)?;
                }
                KeyCode::Char('p') => {
                    if let Some(priority) = selected.priority() {
                        board.change_priority(&selected.id, priority.cycle())?;
                    }
                }
                KeyCode::Char('D') => {
                    if selected.priority().is_none() {
                        if let Some(msg) = edit_due_date(board, &selected)? {
                            *notice = Some(msg);
                        }
                    }
                }
                KeyCode::Char('d') => {
                    let width = card_width();
                    let tilt = tilts.tilt_for(&selected.id, rng);
                    let mut prompter = BoardPrompter {
                        width,
                        tilt,
                        today: board.today(),
                    };
                    if board.delete_record(&selected.id, &mut prompter)? {
                        tilts.forget(&selected.id);
                        *notice = Some("Deleted.".to_string());
                    }
                }
                _ => {}
            }
        }
    }
    Ok(Flow::Continue)
}

/// One-line message for a failed action. Storage failures get the generic
/// save notice; anything else (bad input, terminal errors) is shown as is.
fn notice_for(err: &anyhow::Error) -> String {
    let from_store = err.chain().any(|cause| {
        cause.is::<rusqlite::Error>() || cause.is::<serde_json::Error>()
    });
    if from_store {
        SAVE_FAILED.to_string()
    } else {
        err.to_string()
    }
}

/// Focus a field, save on every keystroke, then blur
fn edit_field(board: &mut Board, id: &str, field: Field) -> Result<()> {
    edit_with(board, id, field, |label, start, preselected, on_input| {
        inline_edit(label, start, preselected, on_input)
    })
}

/// Run `editor` between focus and blur. The field is blurred even when the
/// editor fails, so focus never outlives the edit.
fn edit_with<E>(board: &mut Board, id: &str, field: Field, editor: E) -> Result<()>
where
    E: FnOnce(&str, &str, bool, &mut dyn FnMut(&str) -> Result<()>) -> Result<String>,
{
    let start = board.focus_field(id, field)?;
    let preselected = board
        .session()
        .focus
        .as_ref()
        .map_or(false, |f| f.select_all);
    let label = match field {
        Field::Title => "title",
        Field::Content => "body",
    };

    let edited = editor(label, &start, preselected, &mut |text: &str| {
        board.edit_field(id, field, text)
    });
    let blurred = board.blur_field(id, field);
    edited?;
    blurred?;
    Ok(())
}

/// Prompt for a reminder's due date. Returns a notice for bad input.
fn edit_due_date(board: &mut Board, reminder: &Record) -> Result<Option<String>> {
    let current = reminder.date.format("%Y-%m-%d").to_string();
    let Some(input) = prompt_line("due (YYYY-MM-DD, today, tomorrow):", &current)? else {
        return Ok(None);
    };

    match parse_date_input(&input, board.today()) {
        Ok(date) => {
            board.change_due_date(&reminder.id, date)?;
            Ok(None)
        }
        Err(e) => Ok(Some(e.to_string())),
    }
}

fn card_width() -> usize {
    let (width, _) = term_size();
    width.saturating_sub(8).min(MAX_CARD_WIDTH)
}

fn draw_screen(
    board: &Board,
    tilts: &mut TiltCache,
    rng: &mut ThreadRng,
    notice: Option<&str>,
) -> Result<()> {
    clear_screen()?;
    let mut stdout = io::stdout();
    let session = board.session();
    let visible = board.visible_records();
    let today = board.today();

    // Header
    let other = match session.view {
        View::Notes => "reminders",
        View::Reminders => "notes",
    };
    queue!(
        stdout,
        SetAttribute(Attribute::Bold),
        Print(format!("{} ({})", session.view.label(), visible.len())),
        SetAttribute(Attribute::Reset),
        SetAttribute(Attribute::Dim),
        Print(format!("  [v] {}\n", other)),
        SetAttribute(Attribute::Reset)
    )?;
    draw_filter_bar(&mut stdout, session)?;
    queue!(stdout, Print("\n"))?;

    // Cards, scrolled so the selection stays on screen
    let width = card_width();
    let (_, height) = term_size();
    let fit = (height.saturating_sub(6) / Card::HEIGHT).max(1);
    let cursor = session.cursor();
    let start = cursor.saturating_sub(fit - 1);

    if visible.is_empty() {
        queue!(stdout, Print("  No cards match. Press [1] to show all.\n"))?;
    }
    for (idx, record) in visible.iter().enumerate().skip(start).take(fit) {
        let tilt = tilts.tilt_for(&record.id, rng);
        Card::new(record, today, tilt).draw(&mut stdout, width, idx == cursor)?;
    }

    // Status bar
    queue!(stdout, Print("\n"))?;
    if let Some(msg) = notice {
        queue!(stdout, Print(format!("{}\n", msg)))?;
    }
    let mut bar = StatusBar::new()
        .counter(if visible.is_empty() { 0 } else { cursor + 1 }, visible.len())
        .action("n", "ew")
        .action("e", "dit")
        .action("b", "ody")
        .action("c", "heck")
        .action("d", "el");
    bar = match session.view {
        View::Notes => bar.action("p", "riority").action("1-4", " filter"),
        View::Reminders => bar.action("D", "ue"),
    };
    let status = bar.separator().action("?", "").action("q", "uit").render();
    queue!(stdout, Print(format!("{}\n", status)))?;
    stdout.flush()?;
    Ok(())
}

/// Confirmation and removal effect for the interactive board
struct BoardPrompter {
    width: usize,
    tilt: Tilt,
    today: NaiveDate,
}

impl Prompter for BoardPrompter {
    fn confirm_delete(&mut self, record: &Record) -> Result<bool> {
        let _ = clear_screen();
        let title = flatten(record.display_field(Field::Title));
        let kind = if record.is_note() { "note" } else { "reminder" };
        confirm(&format!("Delete {} \"{}\"?", kind, title))
    }

    /// Shrink and fade the card over about half a second
    fn play_removal(&mut self, record: &Record) -> Result<()> {
        let card = Card::new(record, self.today, self.tilt);
        let mut stdout = io::stdout();

        for frame in 0..REMOVAL_FRAMES {
            clear_screen()?;
            let width = self.width * (REMOVAL_FRAMES - frame) as usize / REMOVAL_FRAMES as usize;
            let shift = (self.width - width) / 2;
            queue!(stdout, SetAttribute(Attribute::Dim))?;
            for line in card.plain_lines(width.max(12)) {
                queue!(stdout, Print(format!("{}{}\n", " ".repeat(shift), line)))?;
            }
            queue!(stdout, SetAttribute(Attribute::Reset))?;
            stdout.flush()?;
            thread::sleep(Duration::from_millis(REMOVAL_FRAME_MS));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOTE_TITLE_PLACEHOLDER;
    use anyhow::anyhow;

    #[test]
    fn test_notice_for_store_errors() {
        let err = anyhow::Error::from(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(notice_for(&err), SAVE_FAILED);

        let err = anyhow::Error::from(rusqlite::Error::QueryReturnedNoRows).context("saving note");
        assert_eq!(notice_for(&err), SAVE_FAILED);
    }

    #[test]
    fn test_notice_for_other_errors() {
        let err = anyhow!("Reminders have no priority");
        assert_eq!(notice_for(&err), "Reminders have no priority");

        let err = anyhow::Error::from(io::Error::new(io::ErrorKind::Other, "terminal gone"));
        assert_eq!(notice_for(&err), "terminal gone");
    }

    #[test]
    fn test_failed_edit_still_blurs() {
        let store = Store::open_memory().unwrap();
        let mut board = Board::load(&store).unwrap();
        let id = board.add_note().unwrap();

        let result = edit_with(&mut board, &id, Field::Title, |_, start, preselected, on_input| {
            assert_eq!(start, "");
            assert!(preselected);
            on_input("Half")?;
            on_input("")?;
            Err(anyhow!("terminal gone"))
        });

        assert!(result.is_err());
        assert!(board.session().focus.is_none());
        let saved = store.get(&id, board.today()).unwrap().unwrap();
        assert_eq!(saved.title, NOTE_TITLE_PLACEHOLDER);
    }

    #[test]
    fn test_edit_saves_every_keystroke() {
        let store = Store::open_memory().unwrap();
        let mut board = Board::load(&store).unwrap();
        let id = board.add_note().unwrap();

        edit_with(&mut board, &id, Field::Content, |_, _, _, on_input| {
            on_input("m")?;
            on_input("mi")?;
            on_input("milk")?;
            Ok("milk".to_string())
        })
        .unwrap();

        assert!(board.session().focus.is_none());
        assert_eq!(store.get(&id, board.today()).unwrap().unwrap().content, "milk");
    }
}
