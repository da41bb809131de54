//! relmap-sqlite - SQLite execution-engine adapter
//!
//! Implements the `relmap_core::engine::Engine` trait over rusqlite
//! (bundled), bridging the core value model to SQLite types and translating
//! driver errors into `EngineError`.

pub mod engine;
pub mod errors;

pub use engine::SqliteEngine;
pub use errors::from_rusqlite;
