// src/errors.rs
use std::path::PathBuf;

/// Failures surfaced to callers of the cleanup pipeline.
///
/// Malformed documents and labels inside an otherwise valid batch are never
/// reported here; they are skipped where they occur.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    /// The batch is not a list or mapping, or is a mapping with neither an item
    /// list nor a `BorrowerName` of its own.
    #[error("invalid batch structure: expected a list of items or a mapping containing one, found {found}")]
    InvalidStructure { found: &'static str },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type CleanupResult<T> = std::result::Result<T, CleanupError>;

/// Short JSON type name used in error messages and structure reports.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "mapping",
    }
}
