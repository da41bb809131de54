//! relmap-core - Engine-agnostic relational data mapper
//!
//! This crate provides the core of a generic data-access layer that decouples
//! application code from raw SQL, including:
//! - A parameterized CRUD query builder with pagination and WHERE conventions
//! - Bidirectional column transformation (structured values <-> JSON text,
//!   binary blobs <-> hex text) applied around every read and write
//! - Per-entity mappers owning an execution-engine handle and transaction state
//! - Lazy, memoized name-based resolution of mapper and repository instances
//! - A single `DataMapper` facade composing the registries
//!
//! The execution engine itself is an external collaborator behind the
//! `engine::Engine` trait; see the `relmap-sqlite` crate for the SQLite
//! adapter.

pub mod engine;
pub mod errors;
pub mod facade;
pub mod logging;
pub mod mapper;
pub mod metadata;
pub mod naming;
pub mod params;
pub mod query;
pub mod registry;
pub mod repository;
pub mod transaction;
pub mod transform;
pub mod value;

// Re-export commonly used types
pub use engine::{ConnectionLocator, Engine, EngineResult, StaticLocator};
pub use errors::{EngineError, RelmapError, Result};
pub use facade::DataMapper;
pub use mapper::{EntityMapper, MapperConfig};
pub use metadata::Metadata;
pub use params::{Params, Record};
pub use registry::MapperRegistry;
pub use repository::{Repository, RepositoryRegistry};
pub use transaction::Transactional;
pub use value::Value;
