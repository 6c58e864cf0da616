// src/extraction/nested.rs - Fallback flattening for documents without a Summary
use indexmap::IndexMap;
use serde_json::Value;

use crate::utils::constants::NOT_AVAILABLE;

/// Flattens arbitrary nested JSON into leaf paths such as `parent.child` and
/// `parent[0]`. Nulls and `"N/A"` leaves are dropped.
pub fn extract_any_nested(data: &Value) -> IndexMap<String, Value> {
    let mut out = IndexMap::new();
    walk(data, "", &mut out);
    out
}

fn walk(data: &Value, parent_key: &str, out: &mut IndexMap<String, Value>) {
    match data {
        Value::Object(fields) => {
            for (key, value) in fields {
                let path = if parent_key.is_empty() {
                    key.clone()
                } else {
                    format!("{parent_key}.{key}")
                };
                visit(value, path, out);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                visit(item, format!("{parent_key}[{idx}]"), out);
            }
        }
        leaf => {
            if is_meaningful(leaf) && !parent_key.is_empty() {
                out.insert(parent_key.to_string(), leaf.clone());
            }
        }
    }
}

fn visit(value: &Value, path: String, out: &mut IndexMap<String, Value>) {
    match value {
        Value::Object(_) | Value::Array(_) => walk(value, &path, out),
        leaf => {
            if is_meaningful(leaf) {
                out.insert(path, leaf.clone());
            }
        }
    }
}

fn is_meaningful(leaf: &Value) -> bool {
    match leaf {
        Value::Null => false,
        Value::String(s) => s != NOT_AVAILABLE,
        _ => true,
    }
}
