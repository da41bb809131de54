//! Error handling for relmap-sqlite
//!
//! Translates rusqlite errors into the core's engine error type.

use relmap_core::EngineError;

/// Create an engine error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> EngineError {
    EngineError::new(err.to_string())
}
