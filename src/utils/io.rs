// src/utils/io.rs - JSON file helpers for the command-line tools
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{CleanupError, CleanupResult};

pub fn read_json(path: &Path) -> CleanupResult<Value> {
    let raw = fs::read_to_string(path).map_err(|source| CleanupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CleanupError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> CleanupResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(|source| CleanupError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, rendered).map_err(|source| CleanupError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `<dir>/<stem>.cleaned.json`, where `dir` defaults to the input's directory.
pub fn cleaned_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.cleaned.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let value = json!({"BorrowerName": "John Smith", "Paystub": []});

        write_json(&path, &value).unwrap();
        assert_eq!(read_json(&path).unwrap(), value);
    }

    #[test]
    fn test_read_errors_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_json(&missing), Err(CleanupError::Io { path, .. }) if path == missing));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        assert!(matches!(read_json(&broken), Err(CleanupError::Json { .. })));
    }

    #[test]
    fn test_cleaned_output_path() {
        assert_eq!(
            cleaned_output_path(Path::new("/data/loan_1.json"), None),
            PathBuf::from("/data/loan_1.cleaned.json")
        );
        assert_eq!(
            cleaned_output_path(Path::new("/data/loan_1.json"), Some(Path::new("/out"))),
            PathBuf::from("/out/loan_1.cleaned.json")
        );
    }
}
