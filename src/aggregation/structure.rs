// src/aggregation/structure.rs - Quick overview of a batch's shape
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::errors::json_type_name;
use crate::utils::constants::BORROWER_NAME_KEY;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOverview {
    #[serde(rename = "BorrowerName")]
    pub borrower_name: Value,
    /// Document type to "<n> documents" or the JSON type of a non-list value.
    #[serde(flatten)]
    pub document_types: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureOverview {
    pub items: Vec<ItemOverview>,
}

/// Summarises the first `limit` items of a batch (a mapping counts as one item).
/// Returns None for scalar input.
pub fn describe_structure(raw: &Value, limit: usize) -> Option<StructureOverview> {
    let items: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().take(limit).collect(),
        Value::Object(_) => vec![raw],
        _ => return None,
    };

    let items = items
        .into_iter()
        .filter_map(Value::as_object)
        .map(|fields| ItemOverview {
            borrower_name: fields
                .get(BORROWER_NAME_KEY)
                .cloned()
                .unwrap_or_else(|| Value::String("N/A".to_string())),
            document_types: fields
                .iter()
                .filter(|(key, _)| key.as_str() != BORROWER_NAME_KEY)
                .map(|(key, value)| {
                    let description = match value {
                        Value::Array(documents) => format!("{} documents", documents.len()),
                        other => json_type_name(other).to_string(),
                    };
                    (key.clone(), description)
                })
                .collect(),
        })
        .collect();

    Some(StructureOverview { items })
}
