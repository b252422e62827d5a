use std::fmt;
use std::str::FromStr;

use crate::models::{Field, ParseError, Priority, Record, RecordKind};

/// Which list is on screen. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Notes,
    Reminders,
}

impl View {
    pub fn kind(self) -> RecordKind {
        match self {
            Self::Notes => RecordKind::Note,
            Self::Reminders => RecordKind::Reminder,
        }
    }

    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Note => Self::Notes,
            RecordKind::Reminder => Self::Reminders,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Notes => Self::Reminders,
            Self::Reminders => Self::Notes,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Notes => "NOTES",
            Self::Reminders => "REMINDERS",
        }
    }

    /// The priority filter bar only exists alongside the notes
    pub fn shows_filter(self) -> bool {
        self == Self::Notes
    }
}

/// Priority filter applied to note cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Priority),
}

impl Filter {
    pub const ALL: [Filter; 4] = [
        Filter::All,
        Filter::Only(Priority::Low),
        Filter::Only(Priority::Medium),
        Filter::Only(Priority::High),
    ];

    /// Whether a card passes the filter. Reminders always pass.
    pub fn admits(self, record: &Record) -> bool {
        match (self, record.priority()) {
            (Filter::All, _) | (_, None) => true,
            (Filter::Only(wanted), Some(actual)) => wanted == actual,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Only(p) => p.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Only(p) => p.label(),
        }
    }
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "all" {
            return Ok(Filter::All);
        }
        s.parse::<Priority>()
            .map(Filter::Only)
            .map_err(|_| ParseError::Filter(s))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Field that currently has input focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    pub id: String,
    pub field: Field,
    /// Text is pre-selected so the first keystroke replaces it
    pub select_all: bool,
}

/// UI state of one board session. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub view: View,
    pub filter: Filter,
    pub focus: Option<Focus>,
    note_cursor: usize,
    reminder_cursor: usize,
}

impl Session {
    pub fn cursor(&self) -> usize {
        match self.view {
            View::Notes => self.note_cursor,
            View::Reminders => self.reminder_cursor,
        }
    }

    pub(crate) fn set_cursor(&mut self, idx: usize) {
        match self.view {
            View::Notes => self.note_cursor = idx,
            View::Reminders => self.reminder_cursor = idx,
        }
    }

    /// Keep the cursor inside a list of `len` visible cards
    pub(crate) fn clamp_cursor(&mut self, len: usize) {
        let max = len.saturating_sub(1);
        if self.cursor() > max {
            self.set_cursor(max);
        }
    }
}
