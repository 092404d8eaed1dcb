//! Chatdex - read-only catalog of persisted chat sessions
//!
//! This library reconstructs chat sessions from a key/value snapshot,
//! validates and sorts them, and groups them into relative-date buckets
//! ("Today", "Yesterday", "Last 7 days", "Last 30 days", "Older").
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `catalog`: session model, catalog loader, temporal grouper, view model
//! - `storage`: read-only key/value backends (snapshot file, sled, SQLite)
//! - `config`: configuration management and validation
//! - `commands`: handlers behind the `chatdex` binary
//! - `cli`: command-line interface definition
//! - `logging`: tracing subscriber setup
//! - `error`: error types and result aliases
//!
//! # Example
//!
//! ```
//! use chatdex::catalog::{group_by_date, Bucket, CatalogLoader};
//! use chatdex::storage::MemoryStore;
//! use chrono::{TimeZone, Utc};
//!
//! let store = MemoryStore::new().with_entry(
//!     "chat_a",
//!     r#"[{"role":"user","content":"hi","createdAt":"2024-05-10T10:00:00Z"}]"#,
//! );
//!
//! let sessions = CatalogLoader::default().load(Some(&store));
//! let now = Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap();
//! let grouped = group_by_date(sessions, &now);
//!
//! assert_eq!(grouped.get(Bucket::Today).unwrap()[0].id, "chat_a");
//! ```

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use catalog::{
    group_by_date, Bucket, CatalogLoader, CatalogView, GroupedCatalog, Message, Session,
};
pub use config::Config;
pub use error::{ChatdexError, Result};
pub use storage::{EntrySource, MemoryStore};

#[cfg(test)]
pub mod test_utils;
