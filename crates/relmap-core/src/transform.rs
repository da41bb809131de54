//! Bidirectional column transformation
//!
//! Moves declared columns between application representation and storage
//! representation: structured values <-> canonical JSON text, binary blobs
//! <-> hex text. Applied in place around every mapper read and write.

use crate::errors::{RelmapError, Result};
use crate::params::{Params, Record};
use crate::value::Value;

/// Serialize a JSON value with object keys in lexicographic byte order at
/// every nesting level, so structurally-equal values produce byte-identical
/// text regardless of insertion order.
pub fn canonical_json(value: &serde_json::Value) -> String {
    serde_json::to_string(&sort_keys(value)).unwrap_or_else(|_| "null".to_string())
}

fn sort_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sort_keys(value)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sort_keys).collect())
        }
        other => other.clone(),
    }
}

/// Per-column bidirectional value transformation.
///
/// The column sets are immutable after construction and declare which
/// parameter-map keys undergo transformation. Keys absent from a map or
/// holding null are left untouched; the two sets are independent.
#[derive(Debug, Clone, Default)]
pub struct ColumnTransformer {
    json_columns: Vec<String>,
    binary_columns: Vec<String>,
}

impl ColumnTransformer {
    /// Create a transformer for the given column sets
    pub fn new(json_columns: Vec<String>, binary_columns: Vec<String>) -> Self {
        Self {
            json_columns,
            binary_columns,
        }
    }

    /// Transform a parameter map in place toward storage encoding.
    ///
    /// JSON columns: structured values become canonical JSON text. Binary
    /// columns: hex text becomes raw bytes. Values already in storage form
    /// pass through unchanged. This path never fails: malformed hex is a
    /// caller error and the value is left untouched for storage to reject.
    pub fn format_to_db(&self, params: &mut Params) {
        for column in &self.json_columns {
            if let Some(value) = params.get_mut(column) {
                if let Value::Json(json) = value {
                    if !json.is_null() {
                        *value = Value::Text(canonical_json(json));
                    }
                }
            }
        }
        for column in &self.binary_columns {
            if let Some(value) = params.get_mut(column) {
                if let Value::Text(hex_text) = value {
                    if let Ok(bytes) = hex::decode(hex_text.as_bytes()) {
                        *value = Value::Bytes(bytes);
                    }
                }
            }
        }
    }

    /// Transform one fetched record in place toward application encoding.
    ///
    /// JSON columns: JSON text is decoded back to a structured value. Binary
    /// columns: raw bytes become lowercase hex text. Stored data is assumed
    /// valid, so malformed JSON text signals `Decode` with the offending
    /// column and raw value.
    pub fn format_from_db(&self, record: &mut Record) -> Result<()> {
        for column in &self.json_columns {
            if let Some(value) = record.get_mut(column) {
                if let Value::Text(text) = value {
                    let decoded: serde_json::Value =
                        serde_json::from_str(text).map_err(|e| RelmapError::Decode {
                            column: column.clone(),
                            raw: text.clone(),
                            reason: e.to_string(),
                        })?;
                    *value = Value::Json(decoded);
                }
            }
        }
        for column in &self.binary_columns {
            if let Some(value) = record.get_mut(column) {
                if let Value::Bytes(bytes) = value {
                    *value = Value::Text(hex::encode(bytes.as_slice()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn transformer() -> ColumnTransformer {
        ColumnTransformer::new(vec!["payload".to_string()], vec!["digest".to_string()])
    }

    #[test]
    fn test_json_column_round_trip() {
        let original = json!({"b": [1, 2], "a": {"z": true, "y": null}});
        let mut params = Params::new().with("payload", original.clone());

        transformer().format_to_db(&mut params);
        assert!(
            matches!(params.get("payload"), Some(Value::Text(_))),
            "Should encode to JSON text toward storage"
        );

        transformer().format_from_db(&mut params).unwrap();
        assert_eq!(params.get("payload"), Some(&Value::Json(original)));
    }

    #[test]
    fn test_canonical_json_stable_under_key_reordering() {
        let a = json!({"b": 1, "a": {"d": 2, "c": 3}});
        let b = json!({"a": {"c": 3, "d": 2}, "b": 1});
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert_eq!(canonical_json(&a), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn test_binary_column_round_trip() {
        let mut params = Params::new().with("digest", "deadbeef");

        transformer().format_to_db(&mut params);
        assert_eq!(
            params.get("digest"),
            Some(&Value::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]))
        );

        transformer().format_from_db(&mut params).unwrap();
        assert_eq!(params.get("digest"), Some(&Value::Text("deadbeef".to_string())));
    }

    #[test]
    fn test_absent_and_null_keys_untouched() {
        let mut params = Params::new().with("payload", Value::Null).with("other", 1);
        transformer().format_to_db(&mut params);
        assert_eq!(params.get("payload"), Some(&Value::Null));
        assert_eq!(params.get("other"), Some(&Value::Int(1)));

        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["payload", "other"], "Key set must not change");
    }

    #[test]
    fn test_malformed_hex_left_untouched_to_db() {
        let mut params = Params::new().with("digest", "not hex!");
        transformer().format_to_db(&mut params);
        assert_eq!(params.get("digest"), Some(&Value::Text("not hex!".to_string())));
    }

    #[test]
    fn test_malformed_json_from_db_is_decode_error() {
        let mut record = Params::new().with("payload", "{not json");
        let err = transformer().format_from_db(&mut record).unwrap_err();
        match err {
            RelmapError::Decode { column, raw, .. } => {
                assert_eq!(column, "payload");
                assert_eq!(raw, "{not json");
            }
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_storage_form_passes_through_from_db() {
        // A JSON column already holding a structured value is left alone
        let mut record = Params::new().with("payload", json!({"a": 1}));
        transformer().format_from_db(&mut record).unwrap();
        assert_eq!(record.get("payload"), Some(&Value::Json(json!({"a": 1}))));
    }

    proptest! {
        /// hex_decode(hex_encode(bytes)) == bytes, and encoding is lowercase.
        #[test]
        fn prop_binary_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut record = Params::new().with("digest", Value::Bytes(bytes.clone()));
            let t = transformer();
            t.format_from_db(&mut record).unwrap();

            let hex_text = match record.get("digest") {
                Some(Value::Text(s)) => s.clone(),
                other => panic!("Expected hex text, got {other:?}"),
            };
            prop_assert_eq!(&hex_text.to_lowercase(), &hex_text);

            t.format_to_db(&mut record);
            prop_assert_eq!(record.get("digest"), Some(&Value::Bytes(bytes)));
        }

        /// Canonical encoding is invariant under object key order.
        #[test]
        fn prop_canonical_json_key_order(
            keys in proptest::collection::hash_set("[a-z]{1,6}", 1..6),
        ) {
            let entries: Vec<(String, serde_json::Value)> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), json!(i)))
                .collect();

            let forward: serde_json::Map<String, serde_json::Value> =
                entries.iter().cloned().collect();
            let reverse: serde_json::Map<String, serde_json::Value> =
                entries.iter().rev().cloned().collect();

            prop_assert_eq!(
                canonical_json(&serde_json::Value::Object(forward)),
                canonical_json(&serde_json::Value::Object(reverse))
            );
        }
    }
}
