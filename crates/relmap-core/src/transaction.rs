//! Transaction control trait
//!
//! A small composable interface implemented once by `EntityMapper`, which
//! delegates to its engine's transaction primitives on the mapper's own
//! connection. No savepoints or nesting: a second begin while a transaction
//! is open is an engine-defined error passed through unchanged.

use crate::errors::Result;

/// Common SQL transaction methods.
pub trait Transactional {
    /// Begin a transaction and turn off autocommit mode.
    ///
    /// # Errors
    ///
    /// Propagates the engine error, e.g. when a transaction is already open.
    fn begin_transaction(&self) -> Result<()>;

    /// Commit the open transaction and restore autocommit mode.
    ///
    /// # Errors
    ///
    /// Propagates the engine error, e.g. when no transaction is open.
    fn commit(&self) -> Result<()>;

    /// Roll back the open transaction and restore autocommit mode.
    ///
    /// # Errors
    ///
    /// Propagates the engine error, e.g. when no transaction is open.
    fn rollback(&self) -> Result<()>;
}
