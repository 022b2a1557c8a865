//! Structural merge of JSON documents
//!
//! [`deep_merge`] folds a `source` document into a `target` document, key by
//! key. It knows nothing about what the documents mean; policies such as
//! "never overwrite an existing hook" live in [`crate::installer::settings`].
//!
//! ## Rules
//!
//! For every key `k` of `source`:
//!
//! 1. `source[k]` is `null` => skipped, a merge never erases a value
//! 2. `k` absent from `target` => `source[k]` is assigned
//! 3. both values are objects => merged recursively
//! 4. both values are arrays => `target` then `source`, deduplicated keeping the first occurrence
//! 5. otherwise => `source[k]` replaces `target[k]`
//!
//! ```json
//! Target:  {"a": 1, "b": {"x": 1, "y": 2}, "dirs": ["/a", "/b"]}
//! Source:  {"b": {"y": 3, "z": 4}, "c": 3, "dirs": ["/b", "/c"], "a": null}
//! Result:  {"a": 1, "b": {"x": 1, "y": 3, "z": 4}, "dirs": ["/a", "/b", "/c"], "c": 3}
//! ```
//!
//! ## Array element equality
//!
//! Elements are compared through a canonical serialization with object keys
//! sorted at every depth, so `{"a":1,"b":2}` and `{"b":2,"a":1}` are the same
//! element. Numbers compare by their JSON text: `1` and `1.0` stay distinct.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// Merge `source` into `target` and return the result
///
/// Non-object roots follow the same rules as nested values: `null` sources
/// leave `target` alone, arrays concatenate, anything else replaces.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (target, Value::Null) => target,
        (Value::Object(target_map), Value::Object(source_map)) => {
            Value::Object(merge_maps(target_map, source_map))
        }
        (Value::Array(target_arr), Value::Array(source_arr)) => {
            Value::Array(merge_arrays(target_arr, source_arr))
        }
        (_, source) => source,
    }
}

/// Merge two JSON objects, keeping the key order of `target` and appending new keys
pub fn merge_maps(mut target: Map<String, Value>, source: Map<String, Value>) -> Map<String, Value> {
    for (key, source_value) in source {
        if source_value.is_null() {
            continue;
        }
        let merged = match target.get_mut(&key) {
            Some(existing) => deep_merge(existing.take(), source_value),
            None => source_value,
        };
        target.insert(key, merged);
    }
    target
}

/// Concatenate two arrays and drop repeated elements, first occurrence wins
pub fn merge_arrays(target: Vec<Value>, source: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    target
        .into_iter()
        .chain(source)
        .filter(|item| seen.insert(canonical_key(item)))
        .collect()
}

/// Serialize a value with object keys sorted at every level
pub fn canonical_key(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
