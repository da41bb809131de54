//! Repositories and the repository registry
//!
//! A repository is the caller-facing facade over one mapper and the home of
//! entity-specific business methods. The registry mirrors the mapper
//! registry: factories keyed by qualified name, one memoized instance per
//! entity name, with the corresponding mapper injected at construction.

use crate::errors::{RelmapError, Result};
use crate::mapper::EntityMapper;
use crate::registry::{qualified_name, MapperRegistry};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Caller-facing facade over one mapper.
///
/// Concrete repositories hold an `Arc<EntityMapper>` and implement their
/// entity's business methods on top of it; external code reaches the mapper
/// only through its repository.
pub trait Repository: Send + Sync {
    /// The mapper this repository is built over
    fn mapper(&self) -> &EntityMapper;

    /// Arc self-conversion enabling typed downcasts
    /// (`DataMapper::get_repository_as`); implement as `{ self }`
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Release the mapper's engine connection
    fn disconnect(&self) -> Result<()> {
        self.mapper().disconnect()
    }
}

impl std::fmt::Debug for dyn Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Repository")
    }
}

/// Factory constructing a concrete repository over its resolved mapper
pub type RepositoryCtor = Box<dyn Fn(Arc<EntityMapper>) -> Arc<dyn Repository> + Send + Sync>;

/// Lazy, memoized name -> repository resolution.
pub struct RepositoryRegistry {
    namespace: String,
    mappers: Arc<MapperRegistry>,
    factories: RwLock<HashMap<String, RepositoryCtor>>,
    instances: Mutex<HashMap<String, Arc<dyn Repository>>>,
}

impl RepositoryRegistry {
    /// Create a registry resolving factories under the given default
    /// namespace, injecting mappers from the given mapper registry
    pub fn new(mappers: Arc<MapperRegistry>, namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            mappers,
            factories: RwLock::new(HashMap::new()),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Register a repository factory under its qualified name.
    ///
    /// Re-registering replaces the factory; cached instances are permanent.
    pub fn register(
        &self,
        qualified: impl Into<String>,
        ctor: impl Fn(Arc<EntityMapper>) -> Arc<dyn Repository> + Send + Sync + 'static,
    ) {
        self.factories.write().insert(qualified.into(), Box::new(ctor));
    }

    /// Resolve the repository for `name`, constructing and caching it on
    /// first access.
    ///
    /// The namespace override applies to the repository factory lookup only;
    /// the injected mapper always resolves under the mapper registry's
    /// default namespace. Cache semantics match the mapper registry:
    /// single-flight construction, plain-name key, first resolution wins.
    ///
    /// # Errors
    ///
    /// `RelmapError::Resolution` when no repository factory is registered
    /// under the composed name, plus any mapper-resolution error; all leave
    /// the cache unmodified.
    pub fn get(&self, name: &str, namespace_override: Option<&str>) -> Result<Arc<dyn Repository>> {
        let mut instances = self.instances.lock();
        if let Some(repository) = instances.get(name) {
            return Ok(repository.clone());
        }

        let namespace = namespace_override.unwrap_or(&self.namespace);
        let qualified = qualified_name(namespace, name, "Repository");

        let factories = self.factories.read();
        let ctor = factories
            .get(&qualified)
            .ok_or_else(|| RelmapError::Resolution {
                name: name.to_string(),
                qualified: qualified.clone(),
            })?;
        let mapper = self.mappers.get(name, None)?;

        let repository = ctor(mapper);
        tracing::debug!(name, qualified = %qualified, "Constructed repository");
        instances.insert(name.to_string(), repository.clone());
        Ok(repository)
    }

    /// Number of cached repository instances
    pub fn cached_len(&self) -> usize {
        self.instances.lock().len()
    }
}
