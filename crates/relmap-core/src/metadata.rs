//! Per-mapper metadata store
//!
//! Holds static metadata a concrete mapper declares at construction time.
//! Entity name and column sets are plain `MapperConfig` fields; this store
//! carries whatever residual metadata a subclass-style mapper wants to
//! expose (default ordering, display labels, ...). Reading an unset key is a
//! programming error surfaced as `MetadataMissing`, never defaulted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata wrapper for per-mapper key-value storage
///
/// Populated once at construction via `with`, read thereafter through
/// `EntityMapper::metadata`. There is deliberately no removal: the store is
/// write-once-per-key static configuration, not mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Metadata {
    data: HashMap<String, serde_json::Value>,
}

impl Metadata {
    /// Create a new empty Metadata instance
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Builder-style set, used at mapper construction
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get the number of metadata entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if metadata is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<HashMap<String, serde_json::Value>> for Metadata {
    fn from(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }
}
