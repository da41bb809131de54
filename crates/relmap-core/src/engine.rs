//! Execution-engine seam
//!
//! The core never issues SQL itself: every statement goes through the
//! `Engine` trait, and every mapper is bound to the engine the
//! `ConnectionLocator` selects for the entity's logical root name. Adapters
//! (see `relmap-sqlite`) implement `Engine` over a concrete driver.

use crate::errors::{EngineError, RelmapError, Result};
use crate::params::{Params, Record};
use std::collections::HashMap;
use std::sync::Arc;

/// Result type for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Narrow execute/query/transaction-control interface over a storage driver.
///
/// Implementations connect lazily: the first operation after construction or
/// after `disconnect` opens the underlying connection. An engine handle is
/// shared between its mapper and the transaction state on the connection, so
/// concurrent transactional use of one handle must be serialized by the
/// caller.
pub trait Engine: Send + Sync {
    /// Open the underlying connection now instead of on first use
    fn connect(&self) -> EngineResult<()>;

    /// Release the underlying connection; subsequent operations reconnect
    fn disconnect(&self) -> EngineResult<()>;

    /// Execute a non-SELECT statement, returning the affected-row count
    fn execute(&self, statement: &str, params: &Params) -> EngineResult<usize>;

    /// Execute a SELECT statement, returning fetched records in row order
    fn query(&self, statement: &str, params: &Params) -> EngineResult<Vec<Record>>;

    /// Identifier assigned by the most recent INSERT on this connection
    fn last_insert_id(&self) -> EngineResult<i64>;

    /// Begin a transaction (no nesting: a second begin is an engine error)
    fn begin(&self) -> EngineResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> EngineResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> EngineResult<()>;
}

impl std::fmt::Debug for dyn Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Engine")
    }
}

/// Selects a writable engine among configured physical connections by a
/// logical name (the snake-cased root segment of an entity name).
pub trait ConnectionLocator: Send + Sync {
    /// Resolve the writable engine for a logical name.
    ///
    /// # Errors
    ///
    /// Returns `RelmapError::UnknownConnection` when no engine is configured
    /// for the name.
    fn resolve_writable(&self, logical_name: &str) -> Result<Arc<dyn Engine>>;
}

/// Fixed name -> engine table with an optional fallback engine.
///
/// The provided `ConnectionLocator` implementation: entries are declared at
/// startup, and a fallback (when set) serves every logical name without an
/// explicit entry - the single-database deployment shape.
#[derive(Default)]
pub struct StaticLocator {
    engines: HashMap<String, Arc<dyn Engine>>,
    fallback: Option<Arc<dyn Engine>>,
}

impl StaticLocator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the engine serving a logical name
    pub fn with_engine(mut self, logical_name: impl Into<String>, engine: Arc<dyn Engine>) -> Self {
        self.engines.insert(logical_name.into(), engine);
        self
    }

    /// Declare the engine serving every logical name without an entry
    pub fn with_fallback(mut self, engine: Arc<dyn Engine>) -> Self {
        self.fallback = Some(engine);
        self
    }
}

impl ConnectionLocator for StaticLocator {
    fn resolve_writable(&self, logical_name: &str) -> Result<Arc<dyn Engine>> {
        self.engines
            .get(logical_name)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| RelmapError::UnknownConnection {
                logical_name: logical_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullEngine;

    impl Engine for NullEngine {
        fn connect(&self) -> EngineResult<()> {
            Ok(())
        }
        fn disconnect(&self) -> EngineResult<()> {
            Ok(())
        }
        fn execute(&self, _statement: &str, _params: &Params) -> EngineResult<usize> {
            Ok(0)
        }
        fn query(&self, _statement: &str, _params: &Params) -> EngineResult<Vec<Record>> {
            Ok(Vec::new())
        }
        fn last_insert_id(&self) -> EngineResult<i64> {
            Ok(0)
        }
        fn begin(&self) -> EngineResult<()> {
            Ok(())
        }
        fn commit(&self) -> EngineResult<()> {
            Ok(())
        }
        fn rollback(&self) -> EngineResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_static_locator_resolves_declared_name() {
        let engine: Arc<dyn Engine> = Arc::new(NullEngine);
        let locator = StaticLocator::new().with_engine("blog", engine.clone());

        let resolved = locator.resolve_writable("blog").unwrap();
        assert!(Arc::ptr_eq(&resolved, &engine));
    }

    #[test]
    fn test_static_locator_unknown_name() {
        let locator = StaticLocator::new();
        let err = locator.resolve_writable("missing").unwrap_err();
        assert_eq!(
            err,
            RelmapError::UnknownConnection {
                logical_name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_static_locator_fallback() {
        let fallback: Arc<dyn Engine> = Arc::new(NullEngine);
        let dedicated: Arc<dyn Engine> = Arc::new(NullEngine);
        let locator = StaticLocator::new()
            .with_engine("blog", dedicated.clone())
            .with_fallback(fallback.clone());

        assert!(Arc::ptr_eq(&locator.resolve_writable("blog").unwrap(), &dedicated));
        assert!(Arc::ptr_eq(&locator.resolve_writable("other").unwrap(), &fallback));
    }
}
