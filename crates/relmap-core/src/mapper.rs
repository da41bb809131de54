//! Entity mapper
//!
//! One `EntityMapper` exists per entity name: it owns the engine handle the
//! locator selected for the entity, applies the column transformer around
//! every read and write, and delegates statement construction to the query
//! builder. Concrete mappers are plain constructors that fill a
//! `MapperConfig` and are registered with the `MapperRegistry` by qualified
//! name.

use crate::engine::Engine;
use crate::errors::{EngineError, RelmapError, Result};
use crate::metadata::Metadata;
use crate::params::{Params, Record};
use crate::query;
use crate::transaction::Transactional;
use crate::transform::ColumnTransformer;
use std::sync::Arc;

/// Static configuration a concrete mapper declares at construction.
///
/// Entity name and column sets are required fields rather than entries in a
/// mutable key-value map, so a mapper without them cannot be built. The
/// metadata store carries any residual static metadata.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Entity name: the literal relation name in generated statements
    pub entity: String,
    /// Columns transformed structured value <-> JSON text
    pub json_columns: Vec<String>,
    /// Columns transformed hex text <-> raw bytes
    pub binary_columns: Vec<String>,
    /// Residual static metadata, read through `EntityMapper::metadata`
    pub metadata: Metadata,
}

impl MapperConfig {
    /// Create a configuration for the given entity name
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            json_columns: Vec::new(),
            binary_columns: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Declare the JSON-column set
    pub fn with_json_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.json_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the binary-column set
    pub fn with_binary_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata = self.metadata.with(key, value);
        self
    }
}

/// Translates between application-level records and storage-level
/// statements/rows for one entity.
#[derive(Debug)]
pub struct EntityMapper {
    config: MapperConfig,
    transformer: ColumnTransformer,
    engine: Arc<dyn Engine>,
}

impl EntityMapper {
    /// Create a mapper bound to the given engine
    pub fn new(config: MapperConfig, engine: Arc<dyn Engine>) -> Self {
        let transformer = ColumnTransformer::new(
            config.json_columns.clone(),
            config.binary_columns.clone(),
        );
        Self {
            config,
            transformer,
            engine,
        }
    }

    /// Entity name this mapper operates on
    pub fn entity(&self) -> &str {
        &self.config.entity
    }

    /// The engine handle this mapper is bound to
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Read a static metadata entry.
    ///
    /// # Errors
    ///
    /// Returns `RelmapError::MetadataMissing` for a key never set at
    /// construction - a programming error, never defaulted.
    pub fn metadata(&self, key: &str) -> Result<&serde_json::Value> {
        self.config
            .metadata
            .get(key)
            .ok_or_else(|| RelmapError::MetadataMissing {
                entity: self.config.entity.clone(),
                key: key.to_string(),
            })
    }

    /// Fetch all records matching a filter.
    ///
    /// An empty filter matches everything. Returns a possibly-empty ordered
    /// sequence; zero matches is not an error. `order_by` is caller-supplied
    /// literal clause text, `limit`/`offset` follow the builder's pagination
    /// policy (a positive limit wins over an offset-only request).
    pub fn fetch_all(
        &self,
        mut where_map: Params,
        order_by: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Record>> {
        self.transformer.format_to_db(&mut where_map);
        let (statement, bound) =
            query::build_select_query(self.entity(), &where_map, order_by, limit, offset);
        self.fetch_all_query(&statement, &bound)
    }

    /// Fetch the first record matching a filter, or `None` on zero matches
    pub fn fetch_one(&self, where_map: Params, order_by: &str) -> Result<Option<Record>> {
        let records = self.fetch_all(where_map, order_by, 1, 0)?;
        Ok(records.into_iter().next())
    }

    /// Escape hatch for a hand-written SELECT.
    ///
    /// Parameters are bound as given (the caller owns the statement, no
    /// to-storage transformation), but every returned record still passes
    /// the from-storage transformation: it is entity-wide, not
    /// statement-specific.
    pub fn fetch_all_query(&self, statement: &str, params: &Params) -> Result<Vec<Record>> {
        let mut records = self
            .engine
            .query(statement, params)
            .map_err(|e| self.storage_error(statement, params, e))?;
        for record in &mut records {
            self.transformer.format_from_db(record)?;
        }
        tracing::debug!(
            entity = %self.config.entity,
            statement,
            rows = records.len(),
            "Fetched records"
        );
        Ok(records)
    }

    /// Escape hatch for a hand-written SELECT expecting at most one record
    pub fn fetch_one_query(&self, statement: &str, params: &Params) -> Result<Option<Record>> {
        let records = self.fetch_all_query(statement, params)?;
        Ok(records.into_iter().next())
    }

    /// Insert a record, returning the storage-assigned identifier
    pub fn insert(&self, mut params: Params) -> Result<i64> {
        self.transformer.format_to_db(&mut params);
        let (statement, bound) = query::build_insert_query(self.entity(), &params);
        self.engine
            .execute(&statement, &bound)
            .map_err(|e| self.storage_error(&statement, &bound, e))?;
        let id = self
            .engine
            .last_insert_id()
            .map_err(|e| self.storage_error(&statement, &bound, e))?;
        tracing::debug!(entity = %self.config.entity, id, "Inserted record");
        Ok(id)
    }

    /// Update matching records, returning the affected-row count
    pub fn update(&self, mut where_map: Params, mut to_set: Params) -> Result<usize> {
        self.transformer.format_to_db(&mut where_map);
        self.transformer.format_to_db(&mut to_set);
        let (statement, bound) = query::build_update_query(self.entity(), &where_map, &to_set);
        let affected = self
            .engine
            .execute(&statement, &bound)
            .map_err(|e| self.storage_error(&statement, &bound, e))?;
        tracing::debug!(entity = %self.config.entity, affected, "Updated records");
        Ok(affected)
    }

    /// Delete matching records, returning the affected-row count.
    ///
    /// An empty filter deletes everything.
    pub fn delete(&self, mut where_map: Params) -> Result<usize> {
        self.transformer.format_to_db(&mut where_map);
        let (statement, bound) = query::build_delete_query(self.entity(), &where_map);
        let affected = self
            .engine
            .execute(&statement, &bound)
            .map_err(|e| self.storage_error(&statement, &bound, e))?;
        tracing::debug!(entity = %self.config.entity, affected, "Deleted records");
        Ok(affected)
    }

    /// Release the engine connection; the next operation reconnects lazily
    pub fn disconnect(&self) -> Result<()> {
        self.engine.disconnect()?;
        Ok(())
    }

    fn storage_error(
        &self,
        statement: &str,
        parameters: &Params,
        source: EngineError,
    ) -> RelmapError {
        RelmapError::StorageOperation {
            entity: self.config.entity.clone(),
            statement: statement.to_string(),
            parameters: parameters.to_string(),
            source,
        }
    }
}

impl Transactional for EntityMapper {
    fn begin_transaction(&self) -> Result<()> {
        self.engine.begin()?;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.engine.commit()?;
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.engine.rollback()?;
        Ok(())
    }
}
