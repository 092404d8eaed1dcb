//! Test utilities for Chatdex
//!
//! Helpers for building persisted chat values and temporary files.

use chrono::{DateTime, TimeZone, Utc};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content, returning its path
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// UTC instant from calendar fields
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid test timestamp")
}

/// Stored value for a two-message chat whose first message has `created_at`
pub fn chat_value(created_at: &str, question: &str) -> String {
    serde_json::json!([
        {"role": "user", "content": question, "createdAt": created_at},
        {"role": "assistant", "content": "answer"}
    ])
    .to_string()
}
