//! Record → terminal rendering.
//!
//! Rendering is one-directional: cards are derived from records and the
//! session, never read back.

use chrono::NaiveDate;
use crossterm::{
    queue,
    style::{Attribute, Print, SetAttribute, SetForegroundColor},
};
use std::io::{self, Write};

use crate::board::{Filter, Session};
use crate::models::{Record, RecordKind};

mod card;
mod text;

pub use card::{priority_color, Card, Span, Tilt, TiltCache};
pub use text::{flatten, truncate, wrap};

/// Human-readable date, e.g. "Jan 5, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Date line of a card. Reminders show their due date.
pub fn date_label(record: &Record) -> String {
    match record.kind {
        RecordKind::Note => format_date(record.date),
        RecordKind::Reminder => format!("Due: {}", format_date(record.date)),
    }
}

/// A reminder whose due date has passed and is still open
pub fn is_overdue(record: &Record, today: NaiveDate) -> bool {
    record.kind == RecordKind::Reminder && !record.completed && record.date < today
}

/// Filter bar labels with the active one marked, e.g. "[All] Low Medium High"
pub fn filter_bar_text(active: Filter) -> String {
    Filter::ALL
        .iter()
        .map(|f| {
            if *f == active {
                format!("[{}]", f.label())
            } else {
                f.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draw the priority filter bar. Nothing is drawn outside the notes view.
pub fn draw_filter_bar<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    if !session.view.shows_filter() {
        return Ok(());
    }

    for (i, filter) in Filter::ALL.iter().enumerate() {
        if i > 0 {
            queue!(out, Print(" "))?;
        }
        if let Filter::Only(p) = filter {
            queue!(out, SetForegroundColor(priority_color(*p)))?;
        }
        if *filter == session.filter {
            queue!(out, SetAttribute(Attribute::Bold), Print(format!("[{}]", filter.label())))?;
        } else {
            queue!(out, SetAttribute(Attribute::Dim), Print(filter.label()))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), SetForegroundColor(crossterm::style::Color::Reset))?;
    }
    queue!(out, Print("\n"))?;
    Ok(())
}
