//! Data Mapper Walkthrough
//!
//! Demonstrates the full stack the way an application wires it up:
//! 1. Declare engines in a connection locator
//! 2. Register mapper and repository factories by qualified name
//! 3. Resolve a typed repository lazily by entity name
//! 4. CRUD with JSON and binary column transformation
//! 5. Transaction control shared through the entity's one mapper

use relmap_core::logging::{init, Profile};
use relmap_core::{
    DataMapper, Engine, EntityMapper, MapperConfig, Params, Repository, StaticLocator,
    Transactional, Value,
};
use relmap_sqlite::SqliteEngine;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;

/// Repository holding the message entity's business methods
struct MessageRepository {
    mapper: Arc<EntityMapper>,
}

impl MessageRepository {
    fn post(&self, body: &str, payload: serde_json::Value, digest: &str) -> relmap_core::Result<i64> {
        self.mapper.insert(
            Params::new()
                .with("body", body)
                .with("payload", payload)
                .with("digest", digest),
        )
    }

    fn latest(&self) -> relmap_core::Result<Option<relmap_core::Record>> {
        self.mapper.fetch_one(Params::new(), "id DESC")
    }

    fn archive(&self, id: i64) -> relmap_core::Result<usize> {
        self.mapper.update(
            Params::new().with("id", id),
            Params::new().with("body", "[archived]"),
        )
    }
}

impl Repository for MessageRepository {
    fn mapper(&self) -> &EntityMapper {
        &self.mapper
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);

    println!("=== relmap CRUD Demo ===\n");

    // ===== Part 1: Wiring =====
    println!("## Part 1: Wiring\n");

    let engine = Arc::new(SqliteEngine::in_memory());
    engine.execute(
        "CREATE TABLE message (id INTEGER PRIMARY KEY, body TEXT, payload TEXT, digest BLOB)",
        &Params::new(),
    )?;
    println!("Created message table");

    let locator = StaticLocator::new().with_engine("message", engine);
    let dm = DataMapper::new(Arc::new(locator), "app");

    dm.register_mapper("app::MessageMapper", |engine| {
        EntityMapper::new(
            MapperConfig::new("message")
                .with_json_columns(["payload"])
                .with_binary_columns(["digest"]),
            engine,
        )
    });
    dm.register_repository("app::MessageRepository", |mapper| {
        Arc::new(MessageRepository { mapper })
    });
    println!("Registered factories under app::MessageMapper / app::MessageRepository");

    // ===== Part 2: Lazy typed resolution =====
    println!("\n## Part 2: Resolution\n");

    let repo = dm.get_repository_as::<MessageRepository>("message", None)?;
    println!("Resolved 'message' to a MessageRepository (constructed on first access)");

    // ===== Part 3: CRUD with column transformation =====
    println!("\n## Part 3: CRUD\n");

    let id = repo.post("hello world", json!({"tags": ["demo"], "lang": "en"}), "deadbeef")?;
    println!("Inserted message #{id}");

    if let Some(record) = repo.latest()? {
        println!("Fetched latest: body={:?}", record.get("body"));
        println!("  payload back as structured JSON: {:?}", record.get("payload"));
        println!("  digest back as hex text: {:?}", record.get("digest"));
        assert_eq!(record.get("digest"), Some(&Value::Text("deadbeef".to_string())));
    }

    let affected = repo.archive(id)?;
    println!("Archived message #{id} ({affected} row affected)");

    // ===== Part 4: Transactions =====
    println!("\n## Part 4: Transactions\n");

    let mapper = dm.mappers().get("message", None)?;
    mapper.begin_transaction()?;
    repo.post("never published", json!(null), "00")?;
    mapper.rollback()?;
    println!("Rolled back an insert; latest is still the archived message:");
    if let Some(record) = repo.latest()? {
        println!("  body={:?}", record.get("body"));
    }

    repo.disconnect()?;
    println!("\nDone.");
    Ok(())
}
