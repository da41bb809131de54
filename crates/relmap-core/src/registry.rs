//! Mapper registry
//!
//! Lazily instantiates and caches exactly one `EntityMapper` per entity
//! name. Concrete factories are registered at startup under qualified names
//! (`<namespace>::<CamelCaseName>Mapper`); resolution composes the key from
//! the requested name and either the registry's default namespace or a
//! per-call override. The instance cache is never evicted: first resolution
//! wins, permanently.

use crate::engine::{ConnectionLocator, Engine};
use crate::errors::{RelmapError, Result};
use crate::mapper::EntityMapper;
use crate::naming::{to_camel_case, to_snake_case};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Factory constructing a concrete mapper over a resolved engine handle
pub type MapperCtor = Box<dyn Fn(Arc<dyn Engine>) -> EntityMapper + Send + Sync>;

/// Compose the qualified factory key for a name and namespace
pub(crate) fn qualified_name(namespace: &str, name: &str, suffix: &str) -> String {
    format!("{}::{}{}", namespace, to_camel_case(name, '.', true), suffix)
}

/// The logical connection name for an entity: the snake-cased root segment
/// (text before the first `.`).
pub(crate) fn logical_name(name: &str) -> String {
    let root = match name.split_once('.') {
        Some((root, _)) => root,
        None => name,
    };
    to_snake_case(root, '_')
}

/// Lazy, memoized name -> mapper resolution.
pub struct MapperRegistry {
    namespace: String,
    locator: Arc<dyn ConnectionLocator>,
    factories: RwLock<HashMap<String, MapperCtor>>,
    instances: Mutex<HashMap<String, Arc<EntityMapper>>>,
}

impl MapperRegistry {
    /// Create a registry resolving factories under the given default
    /// namespace and binding mappers through the given locator
    pub fn new(locator: Arc<dyn ConnectionLocator>, namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            locator,
            factories: RwLock::new(HashMap::new()),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Register a mapper factory under its qualified name.
    ///
    /// Re-registering replaces the factory; this affects only names not yet
    /// resolved, since cached instances are permanent.
    pub fn register(
        &self,
        qualified: impl Into<String>,
        ctor: impl Fn(Arc<dyn Engine>) -> EntityMapper + Send + Sync + 'static,
    ) {
        self.factories.write().insert(qualified.into(), Box::new(ctor));
    }

    /// Resolve the mapper for `name`, constructing and caching it on first
    /// access.
    ///
    /// The cache key is the plain name: a namespace override changes only
    /// the factory lookup, and only for the call that constructs. The cache
    /// lock is held across construction, so concurrent first access for the
    /// same name constructs exactly one instance.
    ///
    /// # Errors
    ///
    /// - `RelmapError::Resolution` when no factory is registered under the
    ///   composed qualified name.
    /// - `RelmapError::UnknownConnection` when the locator has no engine for
    ///   the entity's logical root name.
    ///
    /// Both leave the cache unmodified.
    pub fn get(&self, name: &str, namespace_override: Option<&str>) -> Result<Arc<EntityMapper>> {
        let mut instances = self.instances.lock();
        if let Some(mapper) = instances.get(name) {
            return Ok(mapper.clone());
        }

        let namespace = namespace_override.unwrap_or(&self.namespace);
        let qualified = qualified_name(namespace, name, "Mapper");

        let factories = self.factories.read();
        let ctor = factories
            .get(&qualified)
            .ok_or_else(|| RelmapError::Resolution {
                name: name.to_string(),
                qualified: qualified.clone(),
            })?;
        let engine = self.locator.resolve_writable(&logical_name(name))?;

        let mapper = Arc::new(ctor(engine));
        tracing::debug!(name, qualified = %qualified, "Constructed mapper");
        instances.insert(name.to_string(), mapper.clone());
        Ok(mapper)
    }

    /// Number of cached mapper instances
    pub fn cached_len(&self) -> usize {
        self.instances.lock().len()
    }
}
