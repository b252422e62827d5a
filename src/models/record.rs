use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix shared by every persisted entry key
pub const KEY_PREFIX: &str = "note_";

pub const NOTE_TITLE_PLACEHOLDER: &str = "Title";
pub const NOTE_CONTENT_PLACEHOLDER: &str = "Start writing...";
pub const REMINDER_TITLE_PLACEHOLDER: &str = "Reminder";
pub const REMINDER_CONTENT_PLACEHOLDER: &str = "Reminder details...";

/// Errors for user-supplied values on the command line and in prompts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown priority `{0}` (expected low, medium or high)")]
    Priority(String),
    #[error("unknown record type `{0}` (expected note or reminder)")]
    Kind(String),
    #[error("unknown filter `{0}` (expected all, low, medium or high)")]
    Filter(String),
    #[error("invalid date `{0}` (expected YYYY-MM-DD, today or tomorrow)")]
    Date(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Note,
    Reminder,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Reminder => "reminder",
        }
    }

    pub fn title_placeholder(&self) -> &'static str {
        match self {
            Self::Note => NOTE_TITLE_PLACEHOLDER,
            Self::Reminder => REMINDER_TITLE_PLACEHOLDER,
        }
    }

    pub fn content_placeholder(&self) -> &'static str {
        match self {
            Self::Note => NOTE_CONTENT_PLACEHOLDER,
            Self::Reminder => REMINDER_CONTENT_PLACEHOLDER,
        }
    }
}

impl FromStr for RecordKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "note" | "notes" => Ok(Self::Note),
            "reminder" | "reminders" => Ok(Self::Reminder),
            other => Err(ParseError::Kind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Next level, wrapping from High back to Low
    pub fn cycle(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Lenient parse used when decoding stored entries: anything unknown is Low
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseError::Priority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Editable text fields of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
}

/// A note or reminder on the board.
///
/// `priority` is `Some` for notes and `None` for reminders; the serialized
/// form omits it entirely for reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

impl Record {
    /// New note dated `today`, low priority, placeholder text
    pub fn new_note(id: String, today: NaiveDate) -> Self {
        Self {
            id,
            title: NOTE_TITLE_PLACEHOLDER.to_string(),
            content: NOTE_CONTENT_PLACEHOLDER.to_string(),
            priority: Some(Priority::Low),
            date: today,
            completed: false,
            kind: RecordKind::Note,
        }
    }

    /// New reminder due the day after `today`
    pub fn new_reminder(id: String, today: NaiveDate) -> Self {
        Self {
            id,
            title: REMINDER_TITLE_PLACEHOLDER.to_string(),
            content: REMINDER_CONTENT_PLACEHOLDER.to_string(),
            priority: None,
            date: today.checked_add_days(Days::new(1)).unwrap_or(today),
            completed: false,
            kind: RecordKind::Reminder,
        }
    }

    pub fn new(kind: RecordKind, id: String, today: NaiveDate) -> Self {
        match kind {
            RecordKind::Note => Self::new_note(id, today),
            RecordKind::Reminder => Self::new_reminder(id, today),
        }
    }

    pub fn key(&self) -> String {
        key_for(&self.id)
    }

    pub fn is_note(&self) -> bool {
        self.kind == RecordKind::Note
    }

    /// Effective priority for display and filtering (notes only)
    pub fn priority(&self) -> Option<Priority> {
        match self.kind {
            RecordKind::Note => Some(self.priority.unwrap_or_default()),
            RecordKind::Reminder => None,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
        }
    }

    pub fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Title => self.title = value.to_string(),
            Field::Content => self.content = value.to_string(),
        }
    }

    pub fn placeholder(&self, field: Field) -> &'static str {
        match field {
            Field::Title => self.kind.title_placeholder(),
            Field::Content => self.kind.content_placeholder(),
        }
    }

    /// Text shown for a field: the placeholder stands in for empty text
    pub fn display_field(&self, field: Field) -> &str {
        let value = self.field(field);
        if value.is_empty() {
            self.placeholder(field)
        } else {
            value
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a stored entry, substituting defaults for missing or
    /// wrong-typed fields. Returns `None` only when the value is not a JSON
    /// object.
    pub fn from_entry(key: &str, value: &str, today: NaiveDate) -> Option<Self> {
        let object = match serde_json::from_str::<Value>(value).ok()? {
            object @ Value::Object(_) => object,
            _ => return None,
        };
        let raw: StoredRecord = serde_json::from_value(object).ok()?;

        let id = match raw.id {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => key.strip_prefix(KEY_PREFIX).unwrap_or(key).to_string(),
        };

        let kind = text(raw.kind)
            .and_then(|k| k.parse().ok())
            .unwrap_or(RecordKind::Note);

        let priority = match kind {
            RecordKind::Note => Some(
                text(raw.priority)
                    .map(|p| Priority::parse_lenient(&p))
                    .unwrap_or_default(),
            ),
            RecordKind::Reminder => None,
        };

        let date = text(raw.date)
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
            .unwrap_or(today);

        let completed = match raw.completed {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        };

        Some(Self {
            id,
            title: text(raw.title).unwrap_or_default(),
            content: text(raw.content).unwrap_or_default(),
            priority,
            date,
            completed,
            kind,
        })
    }
}

/// Persisted shape. Fields stay untyped so one bad field never costs the
/// whole entry; anything that is not an object still fails to decode.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoredRecord {
    id: Option<Value>,
    title: Option<Value>,
    content: Option<Value>,
    priority: Option<Value>,
    date: Option<Value>,
    completed: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<Value>,
}

fn text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

pub fn key_for(id: &str) -> String {
    format!("{}{}", KEY_PREFIX, id)
}

/// Sort a list for display: notes newest first, reminders soonest first.
/// Stable, so ties keep their current order.
pub fn sort_for_display(kind: RecordKind, records: &mut [Record]) {
    match kind {
        RecordKind::Note => records.sort_by(|a, b| b.date.cmp(&a.date)),
        RecordKind::Reminder => records.sort_by(|a, b| a.date.cmp(&b.date)),
    }
}

/// Parse a date typed by the user: `YYYY-MM-DD`, `today` or `tomorrow`
pub fn parse_date_input(input: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    let trimmed = input.trim().to_lowercase();
    match trimmed.as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .succ_opt()
            .ok_or_else(|| ParseError::Date(trimmed.clone())),
        _ => NaiveDate::parse_from_str(&trimmed, "%Y-%m-%d")
            .map_err(|_| ParseError::Date(input.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_note_defaults() {
        let note = Record::new_note("1".into(), day(2025, 1, 5));
        assert_eq!(note.title, "Title");
        assert_eq!(note.content, "Start writing...");
        assert_eq!(note.priority, Some(Priority::Low));
        assert_eq!(note.date, day(2025, 1, 5));
        assert!(!note.completed);
        assert_eq!(note.kind, RecordKind::Note);
    }

    #[test]
    fn test_new_reminder_is_due_tomorrow() {
        let reminder = Record::new_reminder("2".into(), day(2025, 12, 31));
        assert_eq!(reminder.date, day(2026, 1, 1));
        assert_eq!(reminder.priority, None);
        assert_eq!(reminder.title, "Reminder");
        assert_eq!(reminder.content, "Reminder details...");
    }

    #[test]
    fn test_serialized_shape() {
        let note = Record::new_note("1736035200000".into(), day(2025, 1, 5));
        let value: serde_json::Value = serde_json::from_str(&note.to_json().unwrap()).unwrap();
        assert_eq!(value["id"], "1736035200000");
        assert_eq!(value["priority"], "low");
        assert_eq!(value["date"], "2025-01-05");
        assert_eq!(value["completed"], false);
        assert_eq!(value["type"], "note");

        let reminder = Record::new_reminder("7".into(), day(2025, 1, 5));
        let value: serde_json::Value =
            serde_json::from_str(&reminder.to_json().unwrap()).unwrap();
        assert!(value.get("priority").is_none());
        assert_eq!(value["type"], "reminder");
    }

    #[test]
    fn test_from_entry_round_trip() {
        let mut note = Record::new_note("42".into(), day(2024, 6, 1));
        note.title = "Groceries".into();
        note.priority = Some(Priority::High);
        note.completed = true;

        let json = note.to_json().unwrap();
        let decoded = Record::from_entry(&note.key(), &json, day(2030, 1, 1)).unwrap();
        assert_eq!(decoded, note);
    }

    #[test]
    fn test_from_entry_substitutes_defaults() {
        let today = day(2025, 3, 3);
        let decoded = Record::from_entry("note_99", r#"{"title":"only a title"}"#, today).unwrap();
        assert_eq!(decoded.id, "99");
        assert_eq!(decoded.kind, RecordKind::Note);
        assert_eq!(decoded.priority, Some(Priority::Low));
        assert_eq!(decoded.date, today);
        assert_eq!(decoded.content, "");
        assert!(!decoded.completed);
        assert_eq!(decoded.display_field(Field::Content), "Start writing...");
    }

    #[test]
    fn test_from_entry_reminder_ignores_priority() {
        let decoded = Record::from_entry(
            "note_5",
            r#"{"id":5,"type":"reminder","priority":"high","date":"2025-02-10"}"#,
            day(2025, 1, 1),
        )
        .unwrap();
        assert_eq!(decoded.id, "5");
        assert_eq!(decoded.priority, None);
        assert_eq!(decoded.priority(), None);
        assert_eq!(decoded.date, day(2025, 2, 10));
    }

    #[test]
    fn test_from_entry_rejects_garbage() {
        assert!(Record::from_entry("note_1", "not json", day(2025, 1, 1)).is_none());
        assert!(Record::from_entry("note_1", "[1,2]", day(2025, 1, 1)).is_none());
        assert!(Record::from_entry("note_1", "[]", day(2025, 1, 1)).is_none());
        assert!(Record::from_entry("note_1", "\"text\"", day(2025, 1, 1)).is_none());
        assert!(Record::from_entry("note_1", "null", day(2025, 1, 1)).is_none());
    }

    #[test]
    fn test_from_entry_tolerates_wrong_types() {
        let today = day(2025, 1, 5);
        let decoded = Record::from_entry(
            "note_7",
            r#"{"id":7,"title":5,"content":["x"],"priority":3,"date":20250105,"completed":"true","type":1}"#,
            today,
        )
        .unwrap();
        assert_eq!(decoded.id, "7");
        assert_eq!(decoded.kind, RecordKind::Note);
        assert_eq!(decoded.title, "");
        assert_eq!(decoded.display_field(Field::Title), NOTE_TITLE_PLACEHOLDER);
        assert_eq!(decoded.content, "");
        assert_eq!(decoded.priority, Some(Priority::Low));
        assert_eq!(decoded.date, today);
        assert!(decoded.completed);

        let decoded = Record::from_entry(
            "note_8",
            r#"{"type":"reminder","completed":1,"date":null,"title":null}"#,
            today,
        )
        .unwrap();
        assert_eq!(decoded.kind, RecordKind::Reminder);
        assert!(!decoded.completed);
        assert_eq!(decoded.date, today);
        assert_eq!(decoded.display_field(Field::Title), REMINDER_TITLE_PLACEHOLDER);
    }

    #[test]
    fn test_unknown_priority_is_low() {
        let decoded = Record::from_entry(
            "note_1",
            r#"{"type":"note","priority":"urgent"}"#,
            day(2025, 1, 1),
        )
        .unwrap();
        assert_eq!(decoded.priority, Some(Priority::Low));
    }

    #[test]
    fn test_sort_for_display() {
        let mut notes = vec![
            Record::new_note("a".into(), day(2025, 1, 1)),
            Record::new_note("b".into(), day(2025, 3, 1)),
            Record::new_note("c".into(), day(2025, 2, 1)),
        ];
        sort_for_display(RecordKind::Note, &mut notes);
        let ids: Vec<&str> = notes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);

        let mut reminders = vec![
            Record::new_reminder("x".into(), day(2025, 5, 1)),
            Record::new_reminder("y".into(), day(2025, 4, 1)),
        ];
        sort_for_display(RecordKind::Reminder, &mut reminders);
        assert_eq!(reminders[0].id, "y");
    }

    #[test]
    fn test_priority_parse_and_cycle() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err(ParseError::Priority("urgent".into()))
        );
        assert_eq!(Priority::Low.cycle(), Priority::Medium);
        assert_eq!(Priority::High.cycle(), Priority::Low);
    }

    #[test]
    fn test_parse_date_input() {
        let today = day(2025, 1, 31);
        assert_eq!(parse_date_input("today", today), Ok(today));
        assert_eq!(parse_date_input("Tomorrow", today), Ok(day(2025, 2, 1)));
        assert_eq!(parse_date_input("2025-03-15", today), Ok(day(2025, 3, 15)));
        assert!(parse_date_input("next week", today).is_err());
    }
}
