//! Error taxonomy for the data-access layer
//!
//! Every error propagates to the immediate caller uncaught: this layer
//! performs no retry, recovery, or partial-failure compensation. Higher
//! layers (or the execution engine) own retry policy.

use thiserror::Error;

/// Result type alias using RelmapError
pub type Result<T> = std::result::Result<T, RelmapError>;

/// Error raised by an execution-engine adapter.
///
/// A plain message-carrying type: adapters translate driver errors into this
/// form (see `relmap-sqlite::errors::from_rusqlite`), and the mapper wraps it
/// with statement context when it occurs during a CRUD operation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    /// Create a new engine error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Comprehensive error taxonomy for data-mapper operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelmapError {
    // ===== Resolution Errors =====
    /// No factory is registered under the qualified name composed for a
    /// requested entity (fatal to the call, cache left unmodified)
    #[error("No factory registered for '{name}' (resolved to '{qualified}')")]
    Resolution { name: String, qualified: String },

    /// A typed repository downcast failed
    #[error("Repository '{name}' is not a '{expected}'")]
    TypeMismatch { name: String, expected: String },

    /// The connection locator has no engine configured for a logical name
    #[error("No connection configured for logical name '{logical_name}'")]
    UnknownConnection { logical_name: String },

    // ===== Mapper Errors =====
    /// A metadata key was read that was never set for the mapper
    /// (a programming error, never defaulted)
    #[error("Metadata key '{key}' was never set for entity '{entity}'")]
    MetadataMissing { entity: String, key: String },

    /// Stored data failed structured decoding on the from-storage path
    #[error("Failed to decode column '{column}': {reason} (raw: {raw})")]
    Decode {
        column: String,
        raw: String,
        reason: String,
    },

    /// The execution engine rejected or failed a statement
    #[error(
        "Storage operation failed for entity '{entity}': {source}\n  Query: {statement}\n  Parameters: {parameters}"
    )]
    StorageOperation {
        entity: String,
        statement: String,
        parameters: String,
        source: EngineError,
    },

    // ===== Engine Passthrough =====
    /// Engine failure outside statement execution
    /// (connect/disconnect/transaction control carry no statement)
    #[error(transparent)]
    Engine(#[from] EngineError),
}
