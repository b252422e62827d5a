//! Shared UI primitives for noteboard
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `due: `
//! - Navigation hints: arrows in brackets: `[↑/↓]`
//! - Feedback: single short sentence: `Deleted.`

use anyhow::Result;
use crossterm::{
    cursor, queue,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    style::{Attribute, SetAttribute},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    ExecutableCommand,
};
use inquire::{
    ui::{RenderConfig, Styled},
    Confirm, InquireError, Text,
};
use std::io::{self, Write};

// ============================================================================
// Status Bar
// ============================================================================

enum Hint<'a> {
    Key(&'a str, &'a str),
    Separator,
}

/// Bottom line of the board: a position counter and key hints.
///
/// Example output: "2/5 [n]ew [e]dit | [q]uit". When the line does not fit,
/// labels are dropped and only the keys remain: "2/5 [n] [e] | [q]".
#[derive(Default)]
pub struct StatusBar<'a> {
    counter: Option<(usize, usize)>,
    hints: Vec<Hint<'a>>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position within the visible cards (1-based, 0 when empty)
    pub fn counter(mut self, current: usize, total: usize) -> Self {
        self.counter = Some((current, total));
        self
    }

    /// `.action("e", "dit")` renders as `[e]dit`
    pub fn action(mut self, key: &'a str, label: &'a str) -> Self {
        self.hints.push(Hint::Key(key, label));
        self
    }

    pub fn separator(mut self) -> Self {
        self.hints.push(Hint::Separator);
        self
    }

    /// Render for the current terminal width
    pub fn render(&self) -> String {
        let (width, _) = term_size();
        self.render_width(width)
    }

    pub fn render_width(&self, width: usize) -> String {
        let full = self.compose(true);
        if full.chars().count() <= width {
            full
        } else {
            self.compose(false)
        }
    }

    fn compose(&self, with_labels: bool) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some((current, total)) = self.counter {
            parts.push(format!("{}/{}", current, total));
        }
        for hint in &self.hints {
            match hint {
                Hint::Key(key, label) if with_labels => parts.push(format!("[{}]{}", key, label)),
                Hint::Key(key, _) => parts.push(format!("[{}]", key)),
                Hint::Separator => parts.push("|".to_string()),
            }
        }
        parts.join(" ")
    }
}

// ============================================================================
// Raw Mode Guard
// ============================================================================

/// RAII guard that ensures raw mode is disabled on drop
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Read one key press in raw mode. Non-key events yield `None`.
pub fn read_key() -> Result<Option<KeyEvent>> {
    let _guard = RawModeGuard::new()?;
    match event::read()? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Wait for any key press
pub fn wait_for_key() -> Result<()> {
    let _guard = RawModeGuard::new()?;
    loop {
        if let Event::Key(_) = event::read()? {
            break;
        }
    }
    Ok(())
}

/// Display the key reference for the board
pub fn show_help() -> Result<()> {
    clear_screen()?;

    let help_text = r#"
NAVIGATION

  j / ↓         Next card
  k / ↑         Previous card
  v / Tab       Switch between notes and reminders

CARDS

  n             New card in the current view
  e             Edit title
  b             Edit body
  p             Cycle priority (notes)
  D             Set due date (reminders)
  c / Space     Toggle complete
  d             Delete (with confirmation)

FILTER (notes)

  1 2 3 4       All / Low / Medium / High

OTHER

  r             Reload from disk
  q / Esc       Quit
  ?             This help screen
"#;

    println!("{}", help_text);
    println!("\nPress any key to return...");
    io::stdout().flush()?;

    wait_for_key()
}

/// Clear the terminal and home the cursor
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Terminal (columns, rows), 80x24 when unknown
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// inquire styling without the `?` prefixes
fn prompt_style() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new(""))
        .with_answered_prompt_prefix(Styled::new(""))
}

/// Esc and Ctrl+C end a prompt without an answer; other failures propagate
fn answered<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Yes/no question defaulting to no. Cancelling counts as no.
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(prompt_style())
        .with_default(false)
        .prompt();
    Ok(answered(result)?.unwrap_or(false))
}

/// One line of text, pre-filled with `initial` for editing.
/// `None` when cancelled.
pub fn prompt_line(prompt: &str, initial: &str) -> Result<Option<String>> {
    let result = Text::new(prompt)
        .with_render_config(prompt_style())
        .with_initial_value(initial)
        .prompt();
    answered(result)
}

// ============================================================================
// Inline Field Editor
// ============================================================================

/// Single-line editor that reports every change.
///
/// `on_input` runs after each keystroke that changes the text. With
/// `preselected`, the initial text is highlighted and the first typed
/// character replaces it. Enter, Tab, Esc or Ctrl+C leave the field.
/// Returns the final text.
pub fn inline_edit<F>(label: &str, initial: &str, preselected: bool, mut on_input: F) -> Result<String>
where
    F: FnMut(&str) -> Result<()>,
{
    let mut stdout = io::stdout();
    let mut buffer = initial.to_string();
    let mut selected = preselected && !buffer.is_empty();

    let _guard = RawModeGuard::new()?;
    draw_edit_line(&mut stdout, label, &buffer, selected)?;

    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        let changed = match code {
            KeyCode::Enter | KeyCode::Tab | KeyCode::Esc => break,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Char(c) => {
                if selected {
                    buffer.clear();
                }
                buffer.push(c);
                true
            }
            KeyCode::Backspace => {
                if selected {
                    buffer.clear();
                    true
                } else {
                    buffer.pop().is_some()
                }
            }
            _ => false,
        };

        selected = false;
        if changed {
            on_input(&buffer)?;
        }
        draw_edit_line(&mut stdout, label, &buffer, selected)?;
    }

    write!(stdout, "\r\n")?;
    stdout.flush()?;
    Ok(buffer)
}

fn draw_edit_line(stdout: &mut io::Stdout, label: &str, text: &str, selected: bool) -> Result<()> {
    write!(stdout, "\r")?;
    stdout.execute(Clear(ClearType::CurrentLine))?;
    write!(stdout, "{}: ", label)?;
    if selected {
        stdout.execute(SetAttribute(Attribute::Reverse))?;
        write!(stdout, "{}", text)?;
        stdout.execute(SetAttribute(Attribute::Reset))?;
    } else {
        write!(stdout, "{}", text)?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_style() {
        let _ = prompt_style();
    }

    #[test]
    fn test_answered_treats_cancel_as_no_answer() {
        assert_eq!(answered(Ok(true)).unwrap(), Some(true));
        assert_eq!(answered::<bool>(Err(InquireError::OperationCanceled)).unwrap(), None);
        assert_eq!(answered::<bool>(Err(InquireError::OperationInterrupted)).unwrap(), None);
        assert!(answered::<bool>(Err(InquireError::NotTTY)).is_err());
    }

    #[test]
    fn test_status_bar_empty() {
        assert_eq!(StatusBar::new().render_width(80), "");
    }

    #[test]
    fn test_status_bar_counter_and_actions() {
        let bar = StatusBar::new()
            .counter(3, 15)
            .action("n", "ew")
            .action("e", "dit")
            .separator()
            .action("?", "")
            .action("q", "uit");
        assert_eq!(bar.render_width(80), "3/15 [n]ew [e]dit | [?] [q]uit");
    }

    #[test]
    fn test_status_bar_drops_labels_when_narrow() {
        let bar = StatusBar::new()
            .counter(1, 2)
            .action("p", "riority")
            .action("1-4", " filter")
            .separator()
            .action("q", "uit");
        assert_eq!(bar.render_width(20), "1/2 [p] [1-4] | [q]");
    }
}
