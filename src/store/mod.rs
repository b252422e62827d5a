use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

use crate::models::{key_for, Record, RecordKind, KEY_PREFIX};

mod schema;

pub use schema::SCHEMA_VERSION;

/// Flat key-value persistence for board records.
///
/// Every record lives under `note_<id>` as a JSON document. Writes go
/// straight to SQLite; there is no write buffering.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at the given path, creating it if needed
    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        debug!("event=store_open path={}", path.display());

        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open in-memory store for testing
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Apply every migration newer than the recorded version, each in its
    /// own transaction
    fn migrate(&self) -> Result<()> {
        let current = self.schema_version()?;

        for (idx, sql) in schema::MIGRATIONS.iter().enumerate() {
            let version = idx as i32 + 1;
            if version <= current {
                continue;
            }
            let tx = self.conn.unchecked_transaction()?;
            tx.execute_batch(sql)?;
            tx.execute(
                "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?1)",
                [version],
            )?;
            tx.commit()?;
            info!("event=schema_migrated version={}", version);
        }

        Ok(())
    }

    /// 0 for a fresh database
    fn schema_version(&self) -> Result<i32> {
        let has_table: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(0);
        }

        let version: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(version.unwrap_or(0))
    }

    // ==================== WRITE ====================

    /// Serialize and write the full record, replacing any existing entry
    pub fn put(&self, record: &Record) -> Result<()> {
        let json = record.to_json()?;
        self.conn.execute(
            "INSERT OR REPLACE INTO entries (key, value) VALUES (?, ?)",
            params![record.key(), json],
        )?;
        debug!(
            "event=record_saved id={} type={}",
            record.id,
            record.kind.as_str()
        );
        Ok(())
    }

    /// Remove the entry for `id`. Returns false when nothing was stored.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM entries WHERE key = ?", [key_for(id)])?;
        debug!("event=record_deleted id={} existed={}", id, rows > 0);
        Ok(rows > 0)
    }

    // ==================== READ ====================

    /// Fetch one record by id
    pub fn get(&self, id: &str, today: NaiveDate) -> Result<Option<Record>> {
        let key = key_for(id);
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM entries WHERE key = ?", [&key], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(value.and_then(|v| Record::from_entry(&key, &v, today)))
    }

    /// All stored records of one type, decoded lazily in storage order.
    /// Call again to restart.
    pub fn records(&self, kind: RecordKind, today: NaiveDate) -> Result<Records> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM entries WHERE substr(key, 1, ?) = ?")?;

        let rows = stmt
            .query_map(params![KEY_PREFIX.len() as i64, KEY_PREFIX], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Records {
            rows: rows.into_iter(),
            kind,
            today,
        })
    }

    /// Number of stored entries of any type
    pub fn count(&self) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE substr(key, 1, ?) = ?",
            params![KEY_PREFIX.len() as i64, KEY_PREFIX],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Raw stored JSON for a record id
    pub fn raw(&self, id: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?",
                [key_for(id)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO entries (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Lazy sequence of decoded records of one type.
///
/// Rows are fetched up front; JSON decoding and type filtering happen as the
/// iterator advances. Undecodable entries are skipped.
pub struct Records {
    rows: std::vec::IntoIter<(String, String)>,
    kind: RecordKind,
    today: NaiveDate,
}

impl Iterator for Records {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        for (key, value) in self.rows.by_ref() {
            match Record::from_entry(&key, &value, self.today) {
                Some(record) if record.kind == self.kind => return Some(record),
                Some(_) => {}
                None => warn!("event=record_skipped key={} reason=malformed", key),
            }
        }
        None
    }
}
