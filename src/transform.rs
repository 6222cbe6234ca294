//! JSON structural normalization
//!
//! The external SDK's content schema has no array type, so documents are
//! rewritten before protection: every array becomes an object keyed by the
//! stringified original indices.

use serde_json::{Map, Value};

/// Rewrite every array in `value` into an index-keyed object
///
/// Non-container values pass through unchanged; objects are rebuilt with
/// each property value normalized recursively. Pure and total over inputs
/// that passed validation (cycles are rejected upstream by the validator).
pub fn arrays_to_objects(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut map = Map::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                map.insert(index.to_string(), arrays_to_objects(item));
            }
            Value::Object(map)
        }
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), arrays_to_objects(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contains_array(value: &Value) -> bool {
        match value {
            Value::Array(_) => true,
            Value::Object(fields) => fields.values().any(contains_array),
            _ => false,
        }
    }

    #[test]
    fn test_identity_without_arrays() {
        let value = json!({"a": 1, "b": {"c": "text", "d": null}, "e": true});
        assert_eq!(arrays_to_objects(&value), value);
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(arrays_to_objects(&json!(42)), json!(42));
        assert_eq!(arrays_to_objects(&json!("a")), json!("a"));
        assert_eq!(arrays_to_objects(&json!(null)), json!(null));
    }

    #[test]
    fn test_flat_array_becomes_indexed_object() {
        assert_eq!(
            arrays_to_objects(&json!(["x", "y", "z"])),
            json!({"0": "x", "1": "y", "2": "z"})
        );
    }

    #[test]
    fn test_nested_arrays_fully_rewritten() {
        let value = json!({"rows": [[1, 2], [3]], "meta": {"tags": ["a"]}});
        let out = arrays_to_objects(&value);
        assert!(!contains_array(&out));
        assert_eq!(
            out,
            json!({
                "rows": {"0": {"0": 1, "1": 2}, "1": {"0": 3}},
                "meta": {"tags": {"0": "a"}}
            })
        );
    }

    #[test]
    fn test_element_count_preserved_per_level() {
        let value = json!([[0, 1, 2], [3, 4], []]);
        let out = arrays_to_objects(&value);
        let outer = out.as_object().unwrap();
        assert_eq!(outer.len(), 3);
        assert_eq!(outer["0"].as_object().unwrap().len(), 3);
        assert_eq!(outer["1"].as_object().unwrap().len(), 2);
        assert_eq!(outer["2"].as_object().unwrap().len(), 0);
    }
}
