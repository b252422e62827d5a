/// Ordered migrations; entry `n` brings the schema to version `n + 1`
pub const MIGRATIONS: &[&str] = &[SCHEMA_V1];

pub const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

/// V1: schema version bookkeeping plus the flat key-value table holding
/// serialized records under `note_<id>` keys.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
