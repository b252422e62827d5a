//! Board controller
//!
//! Owns the loaded note and reminder lists plus the session state. Every
//! action mutates the in-memory record first, writes the full record to the
//! store, and leaves rendering to read from the records.

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate, Utc};
use log::{info, warn};

use crate::models::{sort_for_display, Field, Priority, Record, RecordKind};
use crate::store::Store;

mod session;

pub use session::{Filter, Focus, Session, View};

/// Interaction points the controller needs from the user interface
pub trait Prompter {
    /// Ask before deleting. `false` abandons the delete.
    fn confirm_delete(&mut self, record: &Record) -> Result<bool>;

    /// Brief removal effect played after confirmation, before the card goes
    fn play_removal(&mut self, _record: &Record) -> Result<()> {
        Ok(())
    }
}

/// Today's date in the local timezone
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct Board<'s> {
    store: &'s Store,
    notes: Vec<Record>,
    reminders: Vec<Record>,
    session: Session,
    clock: fn() -> NaiveDate,
    last_id: i64,
}

impl<'s> Board<'s> {
    /// Load the board from the store using the local date
    pub fn load(store: &'s Store) -> Result<Self> {
        Self::load_with_clock(store, local_today)
    }

    /// Load the board with an injected source for "today"
    pub fn load_with_clock(store: &'s Store, clock: fn() -> NaiveDate) -> Result<Self> {
        let mut board = Self {
            store,
            notes: Vec::new(),
            reminders: Vec::new(),
            session: Session::default(),
            clock,
            last_id: 0,
        };
        board.reload()?;
        Ok(board)
    }

    /// Rebuild both lists from the store, sort them, and apply the
    /// empty-state policy. Session view and filter are kept.
    pub fn reload(&mut self) -> Result<()> {
        let today = self.today();

        self.notes = self.store.records(RecordKind::Note, today)?.collect();
        self.reminders = self.store.records(RecordKind::Reminder, today)?.collect();
        sort_for_display(RecordKind::Note, &mut self.notes);
        sort_for_display(RecordKind::Reminder, &mut self.reminders);

        self.last_id = self
            .notes
            .iter()
            .chain(self.reminders.iter())
            .filter_map(|r| r.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        if self.notes.is_empty() {
            let id = self.create(RecordKind::Note)?;
            info!("event=empty_state_note id={}", id);
        }
        if self.reminders.is_empty() {
            let id = self.create(RecordKind::Reminder)?;
            info!("event=empty_state_reminder id={}", id);
        }

        self.session.focus = None;
        self.clamp_selection();
        info!(
            "event=board_loaded notes={} reminders={}",
            self.notes.len(),
            self.reminders.len()
        );
        Ok(())
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notes(&self) -> &[Record] {
        &self.notes
    }

    pub fn reminders(&self) -> &[Record] {
        &self.reminders
    }

    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Note => &self.notes,
            RecordKind::Reminder => &self.reminders,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.notes
            .iter()
            .chain(self.reminders.iter())
            .find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Record> {
        self.notes
            .iter_mut()
            .chain(self.reminders.iter_mut())
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow!("No record with id {}", id))
    }

    fn list_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Note => &mut self.notes,
            RecordKind::Reminder => &mut self.reminders,
        }
    }

    /// Creation timestamp in milliseconds, bumped past the newest id so two
    /// records made in the same millisecond still get distinct ids
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut id = now.max(self.last_id + 1);
        while self.get(&id.to_string()).is_some() {
            id += 1;
        }
        self.last_id = id;
        id.to_string()
    }

    /// Create, persist, and prepend a default record
    fn create(&mut self, kind: RecordKind) -> Result<String> {
        let id = self.next_id();
        let record = Record::new(kind, id.clone(), self.today());
        self.store.put(&record)?;
        self.list_mut(kind).insert(0, record);
        Ok(id)
    }

    // ==================== USER ACTIONS ====================

    pub fn add_note(&mut self) -> Result<String> {
        self.add(RecordKind::Note)
    }

    pub fn add_reminder(&mut self) -> Result<String> {
        self.add(RecordKind::Reminder)
    }

    /// Add a record of `kind`: it lands first in its list, its view becomes
    /// active, and focus moves to its title with the text selected.
    pub fn add(&mut self, kind: RecordKind) -> Result<String> {
        let id = self.create(kind)?;
        info!("event=record_added id={} type={}", id, kind.as_str());

        self.session.view = View::for_kind(kind);
        let filtered_out = self
            .get(&id)
            .map_or(false, |r| !self.session.filter.admits(r));
        if filtered_out {
            self.session.filter = Filter::All;
        }
        self.select_id(&id);
        self.session.focus = Some(Focus {
            id: id.clone(),
            field: Field::Title,
            select_all: true,
        });
        Ok(id)
    }

    /// Text to edit when a field gains focus. A field still showing its
    /// placeholder starts out empty.
    pub fn focus_field(&mut self, id: &str, field: Field) -> Result<String> {
        let select_all = self
            .session
            .focus
            .as_ref()
            .map_or(false, |f| f.id == id && f.field == field && f.select_all);

        let record = self
            .get(id)
            .ok_or_else(|| anyhow!("No record with id {}", id))?;
        let text = if record.field(field) == record.placeholder(field) {
            String::new()
        } else {
            record.field(field).to_string()
        };

        self.session.focus = Some(Focus {
            id: id.to_string(),
            field,
            select_all,
        });
        Ok(text)
    }

    /// Apply one input event to a field and persist the whole record
    pub fn edit_field(&mut self, id: &str, field: Field, value: &str) -> Result<()> {
        let record = self.get_mut(id)?;
        record.set_field(field, value);
        let record = record.clone();
        self.store.put(&record)
    }

    /// Leave a field. Blank text is replaced by the placeholder; whatever
    /// text remains is persisted.
    pub fn blur_field(&mut self, id: &str, field: Field) -> Result<String> {
        let record = self.get_mut(id)?;
        if record.field(field).trim().is_empty() {
            let placeholder = record.placeholder(field);
            record.set_field(field, placeholder);
        }
        let record = record.clone();
        self.session.focus = None;
        self.store.put(&record)?;
        Ok(record.field(field).to_string())
    }

    /// Set a note's priority. Cards the active filter now hides drop out of
    /// the selection.
    pub fn change_priority(&mut self, id: &str, priority: Priority) -> Result<()> {
        let record = self.get_mut(id)?;
        if record.kind != RecordKind::Note {
            bail!("Reminders have no priority");
        }
        record.priority = Some(priority);
        let record = record.clone();
        self.store.put(&record)?;
        info!("event=priority_changed id={} priority={}", id, priority.as_str());

        if self.session.filter != Filter::All {
            self.clamp_selection();
        }
        Ok(())
    }

    /// Set a reminder's due date
    pub fn change_due_date(&mut self, id: &str, date: NaiveDate) -> Result<()> {
        let record = self.get_mut(id)?;
        if record.kind != RecordKind::Reminder {
            bail!("Only reminders have a due date");
        }
        record.date = date;
        let record = record.clone();
        self.store.put(&record)?;
        info!("event=due_date_changed id={} date={}", id, date);
        Ok(())
    }

    /// Flip completion. Returns the new state.
    pub fn toggle_complete(&mut self, id: &str) -> Result<bool> {
        let record = self.get_mut(id)?;
        record.completed = !record.completed;
        let record = record.clone();
        self.store.put(&record)?;
        info!("event=completion_toggled id={} completed={}", id, record.completed);
        Ok(record.completed)
    }

    /// Delete after confirmation. Returns whether the record was removed.
    pub fn delete_record(&mut self, id: &str, prompter: &mut dyn Prompter) -> Result<bool> {
        let record = self
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("No record with id {}", id))?;

        if !prompter.confirm_delete(&record)? {
            return Ok(false);
        }

        prompter.play_removal(&record)?;

        if !self.store.delete(id)? {
            warn!("event=delete_missing_entry id={}", id);
        }
        self.list_mut(record.kind).retain(|r| r.id != id);
        if self.session.focus.as_ref().map_or(false, |f| f.id == id) {
            self.session.focus = None;
        }
        self.clamp_selection();
        info!("event=record_deleted id={} type={}", id, record.kind.as_str());
        Ok(true)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.session.filter = filter;
        self.clamp_selection();
    }

    pub fn switch_view(&mut self, view: View) {
        self.session.view = view;
        self.clamp_selection();
    }

    // ==================== VISIBILITY & SELECTION ====================

    pub fn is_visible(&self, record: &Record) -> bool {
        record.kind == self.session.view.kind() && self.session.filter.admits(record)
    }

    /// Cards of `kind` that pass the active filter, in display order
    pub fn visible(&self, kind: RecordKind) -> Vec<&Record> {
        self.records(kind)
            .iter()
            .filter(|r| self.session.filter.admits(r))
            .collect()
    }

    /// Visible cards of the active view
    pub fn visible_records(&self) -> Vec<&Record> {
        self.visible(self.session.view.kind())
    }

    pub fn selected(&self) -> Option<&Record> {
        self.visible_records().get(self.session.cursor()).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible_records().len();
        let cursor = self.session.cursor();
        if cursor + 1 < len {
            self.session.set_cursor(cursor + 1);
        }
    }

    pub fn select_prev(&mut self) {
        let cursor = self.session.cursor();
        self.session.set_cursor(cursor.saturating_sub(1));
    }

    pub fn select_id(&mut self, id: &str) {
        if let Some(idx) = self.visible_records().iter().position(|r| r.id == id) {
            self.session.set_cursor(idx);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_records().len();
        self.session.clamp_cursor(len);
    }
}
