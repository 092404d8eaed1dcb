//! JSON snapshot of a browser `localStorage`
//!
//! The file holds a single JSON object whose values are the stored strings,
//! e.g. `{"chat_1": "[{\"role\":\"user\",...}]", "theme": "dark"}`.

use super::{EntrySource, MemoryStore};
use crate::error::{ChatdexError, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Entry source backed by a JSON snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    entries: MemoryStore,
}

impl SnapshotStore {
    /// Read a snapshot file.
    ///
    /// Values that are not JSON strings cannot have come from a string
    /// key/value store and are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its top level is not
    /// a JSON object.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

        let object: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| {
                ChatdexError::Storage(format!(
                    "Snapshot {} is not a JSON object of strings: {}",
                    path.display(),
                    e
                ))
            })?;

        let mut entries = MemoryStore::new();
        for (key, value) in object {
            match value {
                serde_json::Value::String(s) => entries.insert(key, s),
                other => tracing::warn!(
                    key = %key,
                    "Skipping snapshot entry with non-string value ({})",
                    json_kind(&other)
                ),
            }
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded snapshot");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Path the snapshot was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of string entries in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no string entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntrySource for SnapshotStore {
    fn list_entries(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        self.entries.list_entries(prefix)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_file, temp_dir};

    #[test]
    fn test_open_reads_string_entries() {
        let dir = temp_dir();
        let path = create_test_file(
            &dir,
            "snapshot.json",
            r#"{"chat_a": "[]", "chat_b": "not json", "theme": "dark"}"#,
        );

        let store = SnapshotStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.len(), 3);
        assert_eq!(store.list_entries("chat_").unwrap().len(), 2);
    }

    #[test]
    fn test_open_skips_non_string_values() {
        let dir = temp_dir();
        let path = create_test_file(
            &dir,
            "snapshot.json",
            r#"{"chat_a": [1, 2], "chat_b": "[]", "chat_c": null}"#,
        );

        let store = SnapshotStore::open(&path).unwrap();
        let entries = store.list_entries("chat_").unwrap();
        assert_eq!(entries, vec![("chat_b".to_string(), "[]".to_string())]);
    }

    #[test]
    fn test_open_rejects_non_object() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "snapshot.json", "[1, 2, 3]");

        let err = SnapshotStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn test_open_missing_file_errors() {
        let dir = temp_dir();
        assert!(SnapshotStore::open(dir.path().join("nope.json")).is_err());
    }
}
