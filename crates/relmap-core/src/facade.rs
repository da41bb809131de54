//! DataMapper facade
//!
//! Single entry point composing the mapper and repository registries. Pure
//! composition: the facade wires the connection locator and namespaces into
//! the registries and forwards registration and resolution calls.

use crate::engine::ConnectionLocator;
use crate::errors::{RelmapError, Result};
use crate::mapper::EntityMapper;
use crate::registry::MapperRegistry;
use crate::repository::{Repository, RepositoryRegistry};
use std::sync::Arc;

/// Top-level handle to the data-access layer.
///
/// ```no_run
/// use relmap_core::{DataMapper, EntityMapper, MapperConfig, StaticLocator};
/// use std::sync::Arc;
///
/// let locator = StaticLocator::new(); // engines declared at startup
/// let dm = DataMapper::new(Arc::new(locator), "app");
/// dm.register_mapper("app::UserMapper", |engine| {
///     EntityMapper::new(MapperConfig::new("user"), engine)
/// });
/// ```
pub struct DataMapper {
    mappers: Arc<MapperRegistry>,
    repositories: RepositoryRegistry,
}

impl DataMapper {
    /// Create a facade with one namespace shared by mappers and repositories
    pub fn new(locator: Arc<dyn ConnectionLocator>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self::with_namespaces(locator, namespace.clone(), namespace)
    }

    /// Create a facade with independent mapper and repository namespaces
    pub fn with_namespaces(
        locator: Arc<dyn ConnectionLocator>,
        mapper_namespace: impl Into<String>,
        repository_namespace: impl Into<String>,
    ) -> Self {
        let mappers = Arc::new(MapperRegistry::new(locator, mapper_namespace));
        let repositories = RepositoryRegistry::new(mappers.clone(), repository_namespace);
        Self {
            mappers,
            repositories,
        }
    }

    /// Register a mapper factory under its qualified name
    pub fn register_mapper(
        &self,
        qualified: impl Into<String>,
        ctor: impl Fn(Arc<dyn crate::engine::Engine>) -> EntityMapper + Send + Sync + 'static,
    ) {
        self.mappers.register(qualified, ctor);
    }

    /// Register a repository factory under its qualified name
    pub fn register_repository(
        &self,
        qualified: impl Into<String>,
        ctor: impl Fn(Arc<EntityMapper>) -> Arc<dyn Repository> + Send + Sync + 'static,
    ) {
        self.repositories.register(qualified, ctor);
    }

    /// Direct access to the mapper registry
    pub fn mappers(&self) -> &Arc<MapperRegistry> {
        &self.mappers
    }

    /// Resolve the repository for `name`.
    ///
    /// # Errors
    ///
    /// Propagates registry resolution errors (`Resolution`,
    /// `UnknownConnection`).
    pub fn get_repository(
        &self,
        name: &str,
        namespace_override: Option<&str>,
    ) -> Result<Arc<dyn Repository>> {
        self.repositories.get(name, namespace_override)
    }

    /// Resolve the repository for `name` as its concrete type.
    ///
    /// # Errors
    ///
    /// Registry errors as for `get_repository`, plus
    /// `RelmapError::TypeMismatch` when the cached repository is not an `R`.
    pub fn get_repository_as<R: Repository + 'static>(
        &self,
        name: &str,
        namespace_override: Option<&str>,
    ) -> Result<Arc<R>> {
        let repository = self.get_repository(name, namespace_override)?;
        repository
            .into_any()
            .downcast::<R>()
            .map_err(|_| RelmapError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<R>().to_string(),
            })
    }
}
