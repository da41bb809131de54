//! SQLite engine implementation
//!
//! A lazily-connecting `Engine` over one SQLite database. Connection state
//! lives behind a mutex (rusqlite connections are `Send`, not `Sync`), which
//! makes the engine `Send + Sync` as the core requires; the no-concurrent-
//! transactions contract on one mapper is the caller's responsibility.

use crate::errors::from_rusqlite;
use parking_lot::Mutex;
use relmap_core::engine::EngineResult;
use relmap_core::transform::canonical_json;
use relmap_core::{Engine, EngineError, Params, Record, Value};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

enum Target {
    Disk(PathBuf),
    Memory,
}

/// SQLite-backed execution engine.
///
/// Construction never touches the filesystem: the connection opens on first
/// use and again after `disconnect`. Named parameters bind as `:name` pairs;
/// `Value` maps to SQLite types (bool to integer 0/1, JSON to canonical
/// text, bytes to blob) and back in statement column order.
pub struct SqliteEngine {
    target: Target,
    conn: Mutex<Option<Connection>>,
}

impl SqliteEngine {
    /// Engine over a database file at the given path
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            target: Target::Disk(path.as_ref().to_path_buf()),
            conn: Mutex::new(None),
        }
    }

    /// Engine over an in-memory database.
    ///
    /// Note: `disconnect` drops the connection, which discards an in-memory
    /// database. Use a file-backed engine where state must survive a
    /// disconnect/reconnect cycle.
    pub fn in_memory() -> Self {
        Self {
            target: Target::Memory,
            conn: Mutex::new(None),
        }
    }

    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> EngineResult<T>) -> EngineResult<T> {
        let mut guard = self.conn.lock();
        if guard.is_none() {
            let conn = match &self.target {
                Target::Disk(path) => Connection::open(path).map_err(from_rusqlite)?,
                Target::Memory => Connection::open_in_memory().map_err(from_rusqlite)?,
            };
            tracing::debug!("Opened SQLite connection");
            *guard = Some(conn);
        }
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(EngineError::new("SQLite connection unavailable")),
        }
    }
}

impl Engine for SqliteEngine {
    fn connect(&self) -> EngineResult<()> {
        self.with_connection(|_| Ok(()))
    }

    fn disconnect(&self) -> EngineResult<()> {
        let mut guard = self.conn.lock();
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| from_rusqlite(e))?;
            tracing::debug!("Closed SQLite connection");
        }
        Ok(())
    }

    fn execute(&self, statement: &str, params: &Params) -> EngineResult<usize> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(statement).map_err(from_rusqlite)?;
            let named = bind_named(params);
            stmt.execute(&borrow_named(&named)[..]).map_err(from_rusqlite)
        })
    }

    fn query(&self, statement: &str, params: &Params) -> EngineResult<Vec<Record>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(statement).map_err(from_rusqlite)?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let named = bind_named(params);
            let mut rows = stmt.query(&borrow_named(&named)[..]).map_err(from_rusqlite)?;

            let mut records = Vec::new();
            while let Some(row) = rows.next().map_err(from_rusqlite)? {
                let mut record = Record::new();
                for (i, column) in columns.iter().enumerate() {
                    let value: rusqlite::types::Value = row.get(i).map_err(from_rusqlite)?;
                    record.insert(column.clone(), from_sql_value(value));
                }
                records.push(record);
            }
            Ok(records)
        })
    }

    fn last_insert_id(&self) -> EngineResult<i64> {
        self.with_connection(|conn| Ok(conn.last_insert_rowid()))
    }

    fn begin(&self) -> EngineResult<()> {
        // Literal batches: begin and commit arrive in separate calls, which
        // rules out rusqlite's scoped transactions
        self.with_connection(|conn| conn.execute_batch("BEGIN").map_err(from_rusqlite))
    }

    fn commit(&self) -> EngineResult<()> {
        self.with_connection(|conn| conn.execute_batch("COMMIT").map_err(from_rusqlite))
    }

    fn rollback(&self) -> EngineResult<()> {
        self.with_connection(|conn| conn.execute_batch("ROLLBACK").map_err(from_rusqlite))
    }
}

fn bind_named(params: &Params) -> Vec<(String, rusqlite::types::Value)> {
    params
        .iter()
        .map(|(key, value)| (format!(":{key}"), to_sql_value(value)))
        .collect()
}

fn borrow_named(named: &[(String, rusqlite::types::Value)]) -> Vec<(&str, &dyn rusqlite::ToSql)> {
    named
        .iter()
        .map(|(key, value)| (key.as_str(), value as &dyn rusqlite::ToSql))
        .collect()
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        Value::Int(i) => rusqlite::types::Value::Integer(*i),
        Value::Float(x) => rusqlite::types::Value::Real(*x),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Bytes(b) => rusqlite::types::Value::Blob(b.clone()),
        // Safety net: the transformer normally encodes JSON columns to text
        // before binding
        Value::Json(v) => rusqlite::types::Value::Text(canonical_json(v)),
    }
}

fn from_sql_value(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => Value::Int(i),
        rusqlite::types::Value::Real(x) => Value::Float(x),
        rusqlite::types::Value::Text(s) => Value::Text(s),
        rusqlite::types::Value::Blob(b) => Value::Bytes(b),
    }
}
