use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::warn;

use crate::collaborators::Analytics;
use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    pub id: i64,
    pub name: String,
    pub payload: Value,
    pub captured_epoch_secs: i64,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS event (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    payload TEXT NOT NULL,
    captured_epoch_secs INTEGER NOT NULL
)";

pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    conn.execute(SCHEMA, [])?;
    Ok(conn)
}

pub fn open_file(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    conn.execute(SCHEMA, [])?;
    Ok(conn)
}

pub fn open_from_config(cfg: &Config) -> Result<Connection, StoreError> {
    open_file(&cfg.event_db_path)
}

pub fn record_event(db: &Connection, name: &str, payload: &Value) -> Result<i64, StoreError> {
    db.execute(
        "INSERT INTO event (name, payload, captured_epoch_secs) VALUES (?1, ?2, ?3)",
        params![name, serde_json::to_string(payload)?, now_epoch_secs()],
    )?;
    Ok(db.last_insert_rowid())
}

pub fn list_events(db: &Connection) -> Result<Vec<StoredEvent>, StoreError> {
    let mut stmt =
        db.prepare("SELECT id, name, payload, captured_epoch_secs FROM event ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i64>(3)?,
        ))
    })?;

    let mut events = Vec::new();
    for row in rows {
        let (id, name, payload, captured_epoch_secs) = row?;
        events.push(StoredEvent {
            id,
            name,
            payload: serde_json::from_str(&payload)?,
            captured_epoch_secs,
        });
    }
    Ok(events)
}

pub fn count_events(db: &Connection, name: &str) -> Result<usize, StoreError> {
    let count: i64 = db.query_row(
        "SELECT COUNT(*) FROM event WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as usize)
}

/// Analytics sink that appends every captured event to SQLite.
pub struct SqliteAnalytics {
    db: Mutex<Connection>,
}

impl SqliteAnalytics {
    pub fn new(db: Connection) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> Option<T> {
        self.db.lock().ok().map(|db| f(&db))
    }
}

impl Analytics for SqliteAnalytics {
    fn capture(&self, event: &str, payload: Value) {
        let Ok(db) = self.db.lock() else {
            warn!(event, "event store lock poisoned; dropping event");
            return;
        };
        if let Err(error) = record_event(&db, event, &payload) {
            warn!(event, %error, "failed to record analytics event");
        }
    }
}

fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
