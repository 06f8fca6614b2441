//! SQLite-backed event store (requires the `sqlite` feature).
//!
//! All streams live in a single `events` table keyed by `(stream_id, sequence)`.
//! A commit runs in one transaction: it reads the current stream length, checks it
//! against the entity's committed version, then inserts the new events.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::entity::{Entity, EventRecord};

use super::error::RepositoryError;
use super::repository::{check_version, Commit, Find, Get};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS events (
    stream_id TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    event_name TEXT NOT NULL,
    payload BLOB NOT NULL,
    recorded_at INTEGER NOT NULL,
    PRIMARY KEY (stream_id, sequence)
)";

#[derive(Clone)]
pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        if let Some(dir) = path.as_ref().parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| RepositoryError::Storage(e.to_string()))?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, RepositoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute(SCHEMA, [])?;
        Ok(SqliteRepository {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self, operation: &'static str) -> Result<std::sync::MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned(operation))
    }
}

fn load_stream(conn: &Connection, id: &str) -> Result<Option<Entity>, RepositoryError> {
    let mut stmt = conn.prepare(
        "SELECT event_name, payload, sequence, recorded_at FROM events \
         WHERE stream_id = ?1 ORDER BY sequence",
    )?;
    let rows = stmt.query_map(params![id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Vec<u8>>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, i64>(3)?,
        ))
    })?;

    let mut history = Vec::new();
    for row in rows {
        let (name, payload, sequence, recorded_at) = row?;
        let recorded_at = DateTime::from_timestamp_millis(recorded_at).ok_or_else(|| {
            RepositoryError::Storage(format!("invalid timestamp {recorded_at} in stream {id}"))
        })?;
        history.push(EventRecord::restore(name, payload, sequence as u64, recorded_at));
    }

    if history.is_empty() {
        return Ok(None);
    }
    let mut entity = Entity::with_id(id);
    entity.load_from_history(history);
    Ok(Some(entity))
}

impl Get for SqliteRepository {
    fn get(&self, id: &str) -> Result<Option<Entity>, RepositoryError> {
        let conn = self.lock("read")?;
        load_stream(&conn, id)
    }
}

impl Find for SqliteRepository {
    fn find<F>(&self, predicate: F) -> Result<Vec<Entity>, RepositoryError>
    where
        F: Fn(&Entity) -> bool,
    {
        let conn = self.lock("find")?;
        let mut stmt = conn.prepare("SELECT DISTINCT stream_id FROM events ORDER BY stream_id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entities = Vec::new();
        for id in ids {
            if let Some(entity) = load_stream(&conn, &id)? {
                if predicate(&entity) {
                    entities.push(entity);
                }
            }
        }
        Ok(entities)
    }
}

impl Commit for SqliteRepository {
    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError> {
        let mut conn = self.lock("write")?;
        let tx = conn.transaction()?;

        let stored: Option<i64> = tx
            .query_row(
                "SELECT MAX(sequence) FROM events WHERE stream_id = ?1",
                params![entity.id()],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        check_version(entity, stored.unwrap_or(0) as u64)?;

        for event in entity.new_events() {
            tx.execute(
                "INSERT INTO events (stream_id, sequence, event_name, payload, recorded_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entity.id(),
                    event.sequence as i64,
                    event.event_name,
                    event.payload,
                    event.recorded_at.timestamp_millis(),
                ],
            )?;
        }
        tx.commit()?;

        tracing::debug!(
            stream = entity.id(),
            appended = entity.new_events().len(),
            version = entity.version(),
            "committed events"
        );
        entity.mark_committed();
        Ok(())
    }
}
