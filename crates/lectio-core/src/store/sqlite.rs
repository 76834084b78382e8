//! SQLite-backed document store.
//!
//! One `documents` table holds every entity as (key, version, JSON
//! body). Conditional updates are a single `UPDATE ... WHERE key = ?
//! AND version = ?` checked by affected-row count, so the version test
//! and the write are one atomic statement.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::debug;

use super::{Document, DocumentStore};
use crate::error::StoreError;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (and if needed create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        migrate(&conn)?;
        debug!(path = %path.display(), "opened document store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory store. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Current schema version.
const SCHEMA_VERSION: i32 = 1;

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )?;
    let current: i32 = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .optional()?
        .unwrap_or(0);

    if current < 1 {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                key     TEXT PRIMARY KEY,
                version INTEGER NOT NULL,
                body    TEXT NOT NULL
            );",
        )?;
    }

    if current < SCHEMA_VERSION {
        conn.execute("DELETE FROM schema_version", [])?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
    }
    Ok(())
}

fn parse_body(key: &str, raw: &str) -> Result<Value, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::CorruptDocument {
        key: key.to_string(),
        message: e.to_string(),
    })
}

impl DocumentStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        let conn = self.conn.lock().expect("store lock poisoned");
        let row = conn
            .query_row(
                "SELECT version, body FROM documents WHERE key = ?1",
                params![key],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        match row {
            Some((version, raw)) => Ok(Some(Document {
                key: key.to_string(),
                version: version as u64,
                body: parse_body(key, &raw)?,
            })),
            None => Ok(None),
        }
    }

    fn insert(&self, key: &str, body: Value) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("store lock poisoned");
        let changed = conn.execute(
            "INSERT INTO documents (key, version, body) VALUES (?1, 1, ?2)
             ON CONFLICT(key) DO NOTHING",
            params![key, body.to_string()],
        )?;
        Ok(changed == 1)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected_version: u64,
        body: Value,
    ) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("store lock poisoned");
        let changed = conn.execute(
            "UPDATE documents SET version = version + 1, body = ?1
             WHERE key = ?2 AND version = ?3",
            params![body.to_string(), key, expected_version as i64],
        )?;
        Ok(changed == 1)
    }

    fn list(&self, prefix: &str) -> Result<Vec<Document>, StoreError> {
        let conn = self.conn.lock().expect("store lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT key, version, body FROM documents
             WHERE key LIKE ?1 || '%'
             ORDER BY key",
        )?;
        let rows = stmt.query_map(params![prefix], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (key, version, raw) = row?;
            // LIKE treats '_' in the prefix as a wildcard; filter exactly.
            if !key.starts_with(prefix) {
                continue;
            }
            let body = parse_body(&key, &raw)?;
            docs.push(Document {
                key,
                version: version as u64,
                body,
            });
        }
        Ok(docs)
    }
}
