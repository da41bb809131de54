// Integration tests for disconnect and lazy reconnect
// Uses a file-backed database: an in-memory database would be discarded
// with its connection.

mod common;

use common::{message_mapper, MESSAGE_SCHEMA};
use relmap_core::{Engine, Params, Value};
use relmap_sqlite::SqliteEngine;
use std::sync::Arc;

#[test]
fn test_disconnect_then_lazy_reconnect_preserves_state() {
    // Given: a file-backed engine with one committed row
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relmap.db");
    let engine = Arc::new(SqliteEngine::open(&path));
    engine.execute(MESSAGE_SCHEMA, &Params::new()).unwrap();

    let mapper = message_mapper(engine.clone());
    mapper.insert(Params::new().with("body", "persisted")).unwrap();

    // When: releasing the connection
    mapper.disconnect().unwrap();

    // Then: the next operation reconnects and sees the row
    let record = mapper
        .fetch_one(Params::new().with("body", "persisted"), "")
        .unwrap()
        .expect("Row should survive the reconnect");
    assert_eq!(record.get("body"), Some(&Value::Text("persisted".to_string())));
}

#[test]
fn test_open_does_not_touch_filesystem_until_first_use() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lazy.db");

    let engine = SqliteEngine::open(&path);
    assert!(!path.exists(), "Construction must not open the database");

    engine.connect().unwrap();
    assert!(path.exists());
}

#[test]
fn test_disconnect_twice_is_a_noop() {
    let engine = SqliteEngine::in_memory();
    engine.connect().unwrap();
    engine.disconnect().unwrap();
    engine.disconnect().unwrap();
}
