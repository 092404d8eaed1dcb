//! SQLite-backed entry source
//!
//! Reads a two-column `entries(key TEXT PRIMARY KEY, value TEXT)` table.
//! The database is opened read-only.

use super::EntrySource;
use crate::error::{ChatdexError, Result};
use anyhow::Context;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Entry source over a SQLite key/value table
#[derive(Debug)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open an existing database and check the `entries` table is present
    ///
    /// # Errors
    ///
    /// Returns `ChatdexError::Storage` if the file is missing, cannot be
    /// opened read-only, or has no `entries` table.
    pub fn open<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();
        if !db_path.exists() {
            return Err(ChatdexError::Storage(format!(
                "SQLite database not found at {}",
                db_path.display()
            ))
            .into());
        }

        let store = Self { db_path };
        let conn = store.connect()?;
        let has_table: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='entries'",
                [],
                |r| r.get(0),
            )
            .context("Failed to inspect schema")
            .map_err(|e| ChatdexError::Storage(e.to_string()))?;
        if has_table == 0 {
            return Err(ChatdexError::Storage(format!(
                "No entries table in {}",
                store.db_path.display()
            ))
            .into());
        }

        Ok(store)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open database")
        .map_err(|e| ChatdexError::Storage(e.to_string()).into())
    }
}

impl EntrySource for SqliteStore {
    fn list_entries(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let conn = self.connect()?;

        // substr() counts characters for TEXT, so this is an exact prefix
        // test without LIKE's wildcard handling of '_' and '%'.
        let mut stmt = conn
            .prepare(
                "SELECT key, value FROM entries
                WHERE substr(key, 1, ?1) = ?2
                ORDER BY key",
            )
            .context("Failed to prepare statement")
            .map_err(|e| ChatdexError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![prefix.chars().count() as i64, prefix], |row| {
                let key: String = row.get(0)?;
                let value: Option<String> = row.get(1)?;
                Ok((key, value))
            })
            .context("Failed to query entries")
            .map_err(|e| ChatdexError::Storage(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            match row {
                Ok((key, Some(value))) => entries.push((key, value)),
                Ok((key, None)) => tracing::warn!(key = %key, "Skipping entry with NULL value"),
                Err(e) => tracing::warn!("Skipping unreadable entry row: {}", e),
            }
        }
        Ok(entries)
    }
}
