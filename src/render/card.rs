use chrono::NaiveDate;
use crossterm::{
    queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
};
use rand::Rng;
use std::collections::HashMap;
use std::io::{self, Write};

use super::text::{flatten, truncate, wrap};
use super::{date_label, is_overdue};
use crate::models::{Field, Priority, Record};

/// Body lines shown per card
const CONTENT_LINES: usize = 2;
const DOT: &str = "●";

/// Cosmetic offset for a card: a left indent plus a per-line skew
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tilt {
    pub indent: u16,
    pub skew: i8,
}

impl Tilt {
    pub const PRESETS: [Tilt; 5] = [
        Tilt { indent: 0, skew: 0 },
        Tilt { indent: 2, skew: 0 },
        Tilt { indent: 0, skew: 1 },
        Tilt { indent: 4, skew: -1 },
        Tilt { indent: 1, skew: 1 },
    ];

    /// Uniform pick from the presets
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Tilt {
        Self::PRESETS[rng.gen_range(0..Self::PRESETS.len())]
    }

    /// Columns to shift line `row` of the card
    pub fn offset(&self, row: usize) -> usize {
        (self.indent as i64 + self.skew as i64 * row as i64).max(0) as usize
    }
}

/// Tilt assigned to each card the first time it is drawn.
/// Lives only as long as the session; nothing here is persisted.
#[derive(Debug, Default)]
pub struct TiltCache {
    tilts: HashMap<String, Tilt>,
}

impl TiltCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tilt_for<R: Rng + ?Sized>(&mut self, id: &str, rng: &mut R) -> Tilt {
        *self
            .tilts
            .entry(id.to_string())
            .or_insert_with(|| Tilt::random(rng))
    }

    pub fn forget(&mut self, id: &str) {
        self.tilts.remove(id);
    }
}

/// Accent colour for a note priority
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

fn priority_tint(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Rgb { r: 64, g: 22, b: 24 },
        Priority::Medium => Color::Rgb { r: 62, g: 56, b: 18 },
        Priority::Low => Color::Rgb { r: 22, g: 52, b: 30 },
    }
}

const REMINDER_TINT: Color = Color::Rgb { r: 24, g: 38, b: 64 };
const COMPLETED_TINT: Color = Color::Rgb { r: 48, g: 48, b: 48 };

/// A run of text with an optional foreground colour
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub fg: Option<Color>,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: None,
        }
    }

    fn colored(text: impl Into<String>, fg: Color) -> Self {
        Self {
            text: text.into(),
            fg: Some(fg),
        }
    }
}

/// Everything needed to draw one record, derived from the record alone
#[derive(Debug, Clone)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date_label: String,
    pub priority: Option<Priority>,
    pub completed: bool,
    pub overdue: bool,
    pub tilt: Tilt,
}

impl Card {
    pub fn new(record: &Record, today: NaiveDate, tilt: Tilt) -> Self {
        Self {
            id: record.id.clone(),
            title: flatten(record.display_field(Field::Title)),
            content: flatten(record.display_field(Field::Content)),
            date_label: date_label(record),
            priority: record.priority(),
            completed: record.completed,
            overdue: is_overdue(record, today),
            tilt,
        }
    }

    /// Background treatment: completed grey wins over the priority tint
    pub fn background(&self) -> Color {
        if self.completed {
            COMPLETED_TINT
        } else {
            match self.priority {
                Some(p) => priority_tint(p),
                None => REMINDER_TINT,
            }
        }
    }

    /// Indicator dot colour (notes only)
    pub fn dot_color(&self) -> Option<Color> {
        self.priority.map(priority_color)
    }

    /// Card rows inside the frame, each exactly `inner` characters wide
    pub fn rows(&self, inner: usize) -> Vec<Vec<Span>> {
        let mut rows = Vec::new();

        // Title row: checkbox, title, priority dot
        let checkbox = if self.completed { "[x] " } else { "[ ] " };
        let dot_width = if self.priority.is_some() { 2 } else { 0 };
        let title_width = inner.saturating_sub(checkbox.len() + dot_width);
        let title = truncate(&self.title, title_width);
        let mut title_row = vec![
            Span::plain(checkbox),
            Span::plain(pad(&title, title_width)),
        ];
        if let Some(color) = self.dot_color() {
            title_row.push(Span::plain(" "));
            title_row.push(Span::colored(DOT, color));
        }
        rows.push(title_row);

        // Body
        let mut body = wrap(&self.content, inner, CONTENT_LINES);
        body.resize(CONTENT_LINES, String::new());
        for line in body {
            rows.push(vec![Span::plain(pad(&line, inner))]);
        }

        // Footer: date on the left, priority or overdue marker on the right
        let right = match (self.priority, self.overdue && !self.completed) {
            (Some(p), _) => p.label().to_string(),
            (None, true) => "overdue".to_string(),
            (None, false) => String::new(),
        };
        let left_width = inner.saturating_sub(right.chars().count());
        let mut footer = vec![Span::plain(pad(&truncate(&self.date_label, left_width), left_width))];
        if !right.is_empty() {
            let fg = match self.priority {
                Some(p) => priority_color(p),
                None => Color::Red,
            };
            footer.push(Span::colored(right, fg));
        }
        rows.push(footer);

        rows
    }

    /// Plain-text rendering including the frame, for tests and non-TTY output
    pub fn plain_lines(&self, width: usize) -> Vec<String> {
        let inner = width.saturating_sub(4).max(8);
        let mut lines = vec![format!("┌{}┐", "─".repeat(inner + 2))];
        for row in self.rows(inner) {
            let text: String = row.iter().map(|s| s.text.as_str()).collect();
            lines.push(format!("│ {} │", text));
        }
        lines.push(format!("└{}┘", "─".repeat(inner + 2)));

        lines
            .into_iter()
            .enumerate()
            .map(|(row, line)| format!("{}{}", " ".repeat(self.tilt.offset(row)), line))
            .collect()
    }

    /// Draw the card with colours. `selected` gets a bold frame.
    pub fn draw<W: Write>(&self, out: &mut W, width: usize, selected: bool) -> io::Result<()> {
        let inner = width.saturating_sub(4).max(8);
        let bg = self.background();
        let frame = if selected { Color::White } else { Color::DarkGrey };
        let rows = self.rows(inner);
        let last = rows.len() + 1;

        for row in 0..=last {
            queue!(out, Print(" ".repeat(self.tilt.offset(row))))?;
            queue!(out, SetBackgroundColor(bg), SetForegroundColor(frame))?;
            if selected {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }

            if row == 0 {
                queue!(out, Print(format!("┌{}┐", "─".repeat(inner + 2))))?;
            } else if row == last {
                queue!(out, Print(format!("└{}┘", "─".repeat(inner + 2))))?;
            } else {
                queue!(out, Print("│ "), SetAttribute(Attribute::NormalIntensity))?;
                if self.completed {
                    queue!(
                        out,
                        SetAttribute(Attribute::Dim),
                        SetAttribute(Attribute::CrossedOut)
                    )?;
                } else if row == 1 {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                for span in &rows[row - 1] {
                    match span.fg {
                        Some(fg) => queue!(out, SetForegroundColor(fg))?,
                        None => queue!(out, SetForegroundColor(Color::Reset))?,
                    }
                    queue!(out, Print(&span.text))?;
                }
                queue!(out, SetAttribute(Attribute::Reset), SetBackgroundColor(bg))?;
                if selected {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                queue!(out, SetForegroundColor(frame), Print(" │"))?;
            }

            queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
        }
        Ok(())
    }

    /// Total rows a card occupies on screen
    pub const HEIGHT: usize = CONTENT_LINES + 4;
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    #[test]
    fn test_priority_colors() {
        assert_eq!(priority_color(Priority::High), Color::Red);
        assert_eq!(priority_color(Priority::Medium), Color::Yellow);
        assert_eq!(priority_color(Priority::Low), Color::Green);
    }

    #[test]
    fn test_note_card_accent_follows_priority() {
        let mut note = Record::new_note("1".into(), today());
        note.priority = Some(Priority::High);
        let card = Card::new(&note, today(), Tilt::PRESETS[0]);
        assert_eq!(card.dot_color(), Some(Color::Red));
        assert_eq!(card.background(), priority_tint(Priority::High));
    }

    #[test]
    fn test_reminder_card_has_no_priority_controls() {
        let reminder = Record::new_reminder("2".into(), today());
        let card = Card::new(&reminder, today(), Tilt::PRESETS[0]);
        assert_eq!(card.dot_color(), None);
        assert_eq!(card.background(), REMINDER_TINT);
        let text = card.plain_lines(40).join("\n");
        assert!(!text.contains(DOT));
        assert!(text.contains("Due: Jan 6, 2025"));
    }

    #[test]
    fn test_completed_card_styling() {
        let mut note = Record::new_note("1".into(), today());
        note.completed = true;
        let card = Card::new(&note, today(), Tilt::PRESETS[0]);
        assert_eq!(card.background(), COMPLETED_TINT);
        assert!(card.plain_lines(40)[1].contains("[x]"));
    }

    #[test]
    fn test_empty_fields_show_placeholders() {
        let mut note = Record::new_note("1".into(), today());
        note.title.clear();
        note.content.clear();
        let card = Card::new(&note, today(), Tilt::PRESETS[0]);
        assert_eq!(card.title, "Title");
        assert_eq!(card.content, "Start writing...");
    }

    #[test]
    fn test_overdue_marker() {
        let mut reminder = Record::new_reminder("1".into(), today());
        reminder.date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let card = Card::new(&reminder, today(), Tilt::PRESETS[0]);
        assert!(card.plain_lines(40).join("\n").contains("overdue"));

        reminder.completed = true;
        let card = Card::new(&reminder, today(), Tilt::PRESETS[0]);
        assert!(!card.plain_lines(40).join("\n").contains("overdue"));
    }

    #[test]
    fn test_plain_lines_have_uniform_width() {
        let note = Record::new_note("1".into(), today());
        let card = Card::new(&note, today(), Tilt::PRESETS[0]);
        let lines = card.plain_lines(30);
        assert_eq!(lines.len(), Card::HEIGHT);
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{:?}", widths);
    }

    #[test]
    fn test_multiline_title_stays_on_one_row() {
        let mut note = Record::new_note("1".into(), today());
        note.title = "first\nsecond".into();
        note.content = "body\twith\ncontrols".into();
        let card = Card::new(&note, today(), Tilt::PRESETS[0]);
        assert_eq!(card.title, "first second");

        let lines = card.plain_lines(40);
        assert_eq!(lines.len(), Card::HEIGHT);
        assert!(lines.iter().all(|l| !l.chars().any(char::is_control)));
        assert!(lines[1].contains("first second"));
    }

    #[test]
    fn test_tilt_offsets() {
        let tilt = Tilt { indent: 4, skew: -1 };
        assert_eq!(tilt.offset(0), 4);
        assert_eq!(tilt.offset(3), 1);
        assert_eq!(tilt.offset(9), 0);
    }

    #[test]
    fn test_tilt_cache_is_stable_per_card() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cache = TiltCache::new();
        let first = cache.tilt_for("a", &mut rng);
        for _ in 0..10 {
            assert_eq!(cache.tilt_for("a", &mut rng), first);
        }
        assert!(Tilt::PRESETS.contains(&cache.tilt_for("b", &mut rng)));
    }

    #[test]
    fn test_draw_does_not_fail() {
        let note = Record::new_note("1".into(), today());
        let card = Card::new(&note, today(), Tilt::PRESETS[3]);
        let mut out = Vec::new();
        card.draw(&mut out, 36, true).unwrap();
        assert!(!out.is_empty());
    }
}
