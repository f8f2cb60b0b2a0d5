use rusqlite::{Connection, Result};

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS app_category (
    app_name TEXT PRIMARY KEY NOT NULL,
    type TEXT NOT NULL DEFAULT 'other'
);

CREATE TABLE IF NOT EXISTS usage_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    app_name TEXT NOT NULL,
    duration_seconds INTEGER NOT NULL CHECK (duration_seconds >= 0),
    date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_usage_log_date ON usage_log(date);
"#;

/// Creates missing tables. Safe to run on every open.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
}
