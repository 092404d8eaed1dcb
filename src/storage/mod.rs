//! Read-only key/value backends for persisted chat sessions
//!
//! The catalog never touches a backend directly: it is handed an
//! [`EntrySource`], which lists `(key, value)` pairs under a key prefix.
//! Backends here open existing data and never write to it.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{ChatdexError, Result};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub mod sled_store;
pub mod snapshot;
pub mod sqlite;

pub use sled_store::SledStore;
pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;

/// Capability to enumerate stored entries by key prefix
///
/// Any `Fn(&str) -> Vec<(String, String)>` closure is an entry source,
/// which keeps tests free of real storage.
///
/// # Examples
///
/// ```
/// use chatdex::storage::EntrySource;
///
/// let source = |prefix: &str| {
///     vec![(format!("{}a", prefix), "[]".to_string())]
/// };
/// let entries = source.list_entries("chat_").unwrap();
/// assert_eq!(entries[0].0, "chat_a");
/// ```
pub trait EntrySource {
    /// List every `(key, value)` whose key starts with `prefix`
    fn list_entries(&self, prefix: &str) -> Result<Vec<(String, String)>>;
}

impl<F> EntrySource for F
where
    F: Fn(&str) -> Vec<(String, String)>,
{
    fn list_entries(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        Ok(self(prefix))
    }
}

/// Ordered in-memory key/value snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, returning the store for chaining
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of entries, matching or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EntrySource for MemoryStore {
    fn list_entries(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

/// Default location of a backend's data when no path is configured
///
/// # Errors
///
/// Returns `ChatdexError::Storage` if the platform data directory cannot be
/// determined.
pub fn default_path(backend: StorageBackend) -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "chatdex", "chatdex")
        .ok_or_else(|| ChatdexError::Storage("Could not determine data directory".into()))?;

    let file_name = match backend {
        StorageBackend::Snapshot => "localstorage.json",
        StorageBackend::Sled => "sled",
        StorageBackend::Sqlite => "entries.db",
    };
    Ok(proj_dirs.data_dir().join(file_name))
}

/// Open the configured backend.
///
/// Any failure (missing file, unreadable database, no data directory) means
/// storage is unavailable: it is logged and `None` is returned, which the
/// catalog treats as "no sessions".
pub fn open_source(config: &StorageConfig) -> Option<Box<dyn EntrySource>> {
    match try_open(config) {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::warn!(backend = %config.backend, "Storage unavailable: {:#}", e);
            None
        }
    }
}

fn try_open(config: &StorageConfig) -> Result<Box<dyn EntrySource>> {
    let path = match &config.path {
        Some(path) => path.clone(),
        None => default_path(config.backend)?,
    };
    tracing::debug!(backend = %config.backend, path = %path.display(), "Opening entry source");

    let source: Box<dyn EntrySource> = match config.backend {
        StorageBackend::Snapshot => Box::new(SnapshotStore::open(&path)?),
        StorageBackend::Sled => Box::new(SledStore::open(&path)?),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&path)?),
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_lists_only_prefixed_keys() {
        let store = MemoryStore::new()
            .with_entry("chat_a", "1")
            .with_entry("chat_b", "2")
            .with_entry("chatty", "3")
            .with_entry("settings", "4");

        let entries = store.list_entries("chat_").unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["chat_a", "chat_b"]);
    }

    #[test]
    fn test_memory_store_from_iter() {
        let store: MemoryStore = vec![("chat_1", "[]"), ("other", "x")].into_iter().collect();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_memory_store_empty_prefix_lists_everything() {
        let store = MemoryStore::new().with_entry("a", "1").with_entry("b", "2");
        assert_eq!(store.list_entries("").unwrap().len(), 2);
    }

    #[test]
    fn test_closure_is_entry_source() {
        let source = |_: &str| vec![("chat_x".to_string(), "[]".to_string())];
        assert_eq!(source.list_entries("chat_").unwrap().len(), 1);
    }

    #[test]
    fn test_open_source_missing_snapshot_is_unavailable() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Snapshot,
            path: Some(dir.path().join("missing.json")),
        };
        assert!(open_source(&config).is_none());
    }

    #[test]
    fn test_open_source_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ls.json");
        std::fs::write(&path, r#"{"chat_a": "[]"}"#).unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Snapshot,
            path: Some(path),
        };
        let source = open_source(&config).expect("snapshot should open");
        assert_eq!(source.list_entries("chat_").unwrap().len(), 1);
    }
}
