//! sled-backed entry source

use super::EntrySource;
use crate::error::{ChatdexError, Result};
use sled::Db;
use std::path::Path;

/// Entry source over an existing sled database
///
/// Keys and values are expected to be UTF-8; pairs that are not are
/// skipped with a warning.
#[derive(Debug)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open an existing sled database
    ///
    /// # Errors
    ///
    /// Returns `ChatdexError::Storage` if `path` does not already hold a
    /// sled database (sled would otherwise create one there), or a sled
    /// error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !is_sled_database(path) {
            return Err(ChatdexError::Storage(format!(
                "sled database not found at {}",
                path.display()
            ))
            .into());
        }

        let db = sled::open(path).map_err(ChatdexError::Sled)?;
        Ok(Self { db })
    }

    /// Wrap an already-open database
    pub fn from_db(db: Db) -> Self {
        Self { db }
    }
}

/// A sled database directory carries a `conf` and a `db` file
fn is_sled_database(path: &Path) -> bool {
    path.is_dir() && path.join("conf").is_file() && path.join("db").is_file()
}

impl EntrySource for SledStore {
    fn list_entries(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let mut entries = Vec::new();
        for item in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item.map_err(ChatdexError::Sled)?;
            let key = match std::str::from_utf8(&key) {
                Ok(k) => k.to_string(),
                Err(_) => {
                    tracing::warn!("Skipping sled entry with non-UTF-8 key");
                    continue;
                }
            };
            match std::str::from_utf8(&value) {
                Ok(v) => entries.push((key, v.to_string())),
                Err(_) => tracing::warn!(key = %key, "Skipping sled entry with non-UTF-8 value"),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_entries_scans_prefix() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        db.insert("chat_a", "[]").unwrap();
        db.insert("chat_b", "x").unwrap();
        db.insert("prefs", "y").unwrap();

        let store = SledStore::from_db(db);
        let entries = store.list_entries("chat_").unwrap();
        assert_eq!(
            entries,
            vec![
                ("chat_a".to_string(), "[]".to_string()),
                ("chat_b".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_entries_skips_non_utf8_values() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        db.insert("chat_bad", &[0xff_u8, 0xfe][..]).unwrap();
        db.insert("chat_ok", "[]").unwrap();

        let store = SledStore::from_db(db);
        let entries = store.list_entries("chat_").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "chat_ok");
    }

    #[test]
    fn test_open_missing_path_errors_without_creating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent");
        assert!(SledStore::open(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_open_plain_directory_leaves_it_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not-a-db");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("notes.txt"), "hello").unwrap();

        let err = SledStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("sled database not found"));

        let names: Vec<_> = std::fs::read_dir(&path)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("notes.txt")]);
    }

    #[test]
    fn test_open_empty_directory_does_not_create_database() {
        let dir = tempdir().unwrap();
        assert!(SledStore::open(dir.path()).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_open_existing_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        {
            let db = sled::open(&path).unwrap();
            db.insert("chat_1", "[]").unwrap();
            db.flush().unwrap();
        }

        let store = SledStore::open(&path).unwrap();
        assert_eq!(store.list_entries("chat_").unwrap().len(), 1);
    }
}
