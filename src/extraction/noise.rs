// src/extraction/noise.rs - Removal of extraction bookkeeping keys
use serde_json::{Map, Value};

use crate::extraction::label_tree::{CleanedDocument, CleanedValue};
use crate::utils::constants::NOISE_KEYS;

pub fn is_noise_key(key: &str) -> bool {
    NOISE_KEYS.contains(&key)
}

/// Copy of `document` without noise keys at any depth.
pub fn strip_noise(document: &CleanedDocument) -> CleanedDocument {
    document
        .iter()
        .filter(|(key, _)| !is_noise_key(key))
        .map(|(key, value)| (key.clone(), strip_noise_cleaned(value)))
        .collect()
}

fn strip_noise_cleaned(value: &CleanedValue) -> CleanedValue {
    match value {
        CleanedValue::Scalar(inner) => CleanedValue::Scalar(strip_noise_value(inner)),
        CleanedValue::List(items) => CleanedValue::List(items.iter().map(strip_noise_value).collect()),
        CleanedValue::Records(records) => {
            CleanedValue::Records(records.iter().map(strip_noise).collect())
        }
    }
}

/// Copy of an arbitrary JSON tree without noise keys in any mapping.
pub fn strip_noise_value(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let stripped: Map<String, Value> = fields
                .iter()
                .filter(|(key, _)| !is_noise_key(key))
                .map(|(key, inner)| (key.clone(), strip_noise_value(inner)))
                .collect();
            Value::Object(stripped)
        }
        Value::Array(items) => Value::Array(items.iter().map(strip_noise_value).collect()),
        other => other.clone(),
    }
}
