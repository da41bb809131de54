//! Shared fixtures for the relmap-sqlite integration suites

#![allow(dead_code)]

use relmap_core::{Engine, EntityMapper, MapperConfig, Params};
use relmap_sqlite::SqliteEngine;
use std::sync::Arc;

/// Schema used across the suites: one entity with a plain text column, a
/// JSON column, and a binary column.
pub const MESSAGE_SCHEMA: &str =
    "CREATE TABLE message (id INTEGER PRIMARY KEY, body TEXT, payload TEXT, digest BLOB)";

/// In-memory engine with the message table created
pub fn memory_engine() -> Arc<SqliteEngine> {
    let engine = Arc::new(SqliteEngine::in_memory());
    engine.execute(MESSAGE_SCHEMA, &Params::new()).unwrap();
    engine
}

/// The message mapper: payload is a JSON column, digest a binary column
pub fn message_mapper(engine: Arc<dyn Engine>) -> EntityMapper {
    EntityMapper::new(
        MapperConfig::new("message")
            .with_json_columns(["payload"])
            .with_binary_columns(["digest"]),
        engine,
    )
}
