//! Error types for Chatdex
//!
//! This module defines the error types used by configuration loading,
//! storage backends, and command handlers, using `thiserror` for
//! ergonomic error handling.
//!
//! The catalog core itself never returns these: malformed entries and
//! unavailable storage are recovered locally and only logged.

use thiserror::Error;

/// Main error type for Chatdex operations
#[derive(Error, Debug)]
pub enum ChatdexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key/value backend errors (opening, scanning)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Requested session is not part of the catalog
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Embedded sled database errors
    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    /// SQLite errors
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for Chatdex operations
///
/// Uses `anyhow::Error` so handlers can attach context while still
/// carrying a [`ChatdexError`] that callers can downcast to.
pub type Result<T> = anyhow::Result<T>;
