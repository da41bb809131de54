// Integration tests for mapper CRUD against a real SQLite database
// Covers the full transform-build-execute-transform cycle on every
// operation, including the JSON and binary column pipelines.

mod common;

use common::{memory_engine, message_mapper};
use relmap_core::{Params, RelmapError, Value};
use serde_json::json;

#[test]
fn test_insert_fetch_round_trip_with_transformed_columns() {
    // Given: a mapper over a real database
    let mapper = message_mapper(memory_engine());

    // When: inserting application-form values
    let payload = json!({"tags": ["a", "b"], "active": true});
    let id = mapper
        .insert(
            Params::new()
                .with("body", "hello")
                .with("payload", payload.clone())
                .with("digest", "deadbeef"),
        )
        .unwrap();
    assert_eq!(id, 1, "First row gets rowid 1");

    // Then: fetching returns application-form values again
    let record = mapper
        .fetch_one(Params::new().with("id", id), "")
        .unwrap()
        .expect("Inserted row should be found");
    assert_eq!(record.get("body"), Some(&Value::Text("hello".to_string())));
    assert_eq!(record.get("payload"), Some(&Value::Json(payload)));
    assert_eq!(record.get("digest"), Some(&Value::Text("deadbeef".to_string())));
}

#[test]
fn test_json_filter_matches_stored_canonical_text() {
    let mapper = message_mapper(memory_engine());
    mapper
        .insert(Params::new().with("payload", json!({"b": 1, "a": 2})))
        .unwrap();

    // A structurally-equal filter value with different key order still
    // matches: both sides encode to the same canonical text
    let found = mapper
        .fetch_one(Params::new().with("payload", json!({"a": 2, "b": 1})), "")
        .unwrap();
    assert!(found.is_some(), "Canonical encoding should match");
}

#[test]
fn test_fetch_all_ordering_and_pagination() {
    let mapper = message_mapper(memory_engine());
    for body in ["one", "two", "three", "four"] {
        mapper.insert(Params::new().with("body", body)).unwrap();
    }

    // Empty filter matches everything
    let all = mapper.fetch_all(Params::new(), "", 0, 0).unwrap();
    assert_eq!(all.len(), 4);

    // Literal ORDER BY plus LIMIT offset,limit
    let page = mapper.fetch_all(Params::new(), "id DESC", 2, 1).unwrap();
    let bodies: Vec<&Value> = page.iter().map(|r| r.get("body").unwrap()).collect();
    assert_eq!(
        bodies,
        vec![&Value::Text("three".to_string()), &Value::Text("two".to_string())]
    );

    // Offset without limit still returns the remaining rows
    let rest = mapper.fetch_all(Params::new(), "id", 0, 3).unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].get("body"), Some(&Value::Text("four".to_string())));
}

#[test]
fn test_fetch_one_zero_matches_is_none() {
    let mapper = message_mapper(memory_engine());
    let result = mapper.fetch_one(Params::new().with("id", 999), "").unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_update_and_delete_report_affected_rows() {
    let mapper = message_mapper(memory_engine());
    let id = mapper.insert(Params::new().with("body", "draft")).unwrap();
    mapper.insert(Params::new().with("body", "draft")).unwrap();

    let updated = mapper
        .update(
            Params::new().with("id", id),
            Params::new().with("body", "final"),
        )
        .unwrap();
    assert_eq!(updated, 1);

    let record = mapper.fetch_one(Params::new().with("id", id), "").unwrap().unwrap();
    assert_eq!(record.get("body"), Some(&Value::Text("final".to_string())));

    let deleted = mapper.delete(Params::new().with("body", "draft")).unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(mapper.fetch_all(Params::new(), "", 0, 0).unwrap().len(), 1);
}

#[test]
fn test_fetch_all_query_escape_hatch_still_transforms_records() {
    let mapper = message_mapper(memory_engine());
    mapper
        .insert(Params::new().with("body", "x").with("payload", json!([1, 2])))
        .unwrap();

    let records = mapper
        .fetch_all_query(
            "SELECT payload FROM message WHERE body = :body",
            &Params::new().with("body", "x"),
        )
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("payload"),
        Some(&Value::Json(json!([1, 2]))),
        "Hand-written statements still get the from-storage transformation"
    );
}

#[test]
fn test_storage_error_carries_entity_and_statement() {
    // Given: a mapper over a database without its table
    let engine = std::sync::Arc::new(relmap_sqlite::SqliteEngine::in_memory());
    let mapper = message_mapper(engine);

    let err = mapper.fetch_all(Params::new(), "", 0, 0).unwrap_err();
    match &err {
        RelmapError::StorageOperation { entity, statement, .. } => {
            assert_eq!(entity, "message");
            assert_eq!(statement, "SELECT * FROM message");
        }
        other => panic!("Expected StorageOperation, got {other:?}"),
    }
}
