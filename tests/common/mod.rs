use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Stored value for a chat whose first (user) message was created at `ts`
#[allow(dead_code)]
pub fn chat_value(ts: DateTime<Utc>, question: &str) -> String {
    serde_json::json!([
        {"id": "m1", "role": "user", "content": question, "createdAt": ts.to_rfc3339()},
        {"id": "m2", "role": "assistant", "content": "Sure."}
    ])
    .to_string()
}

/// Write a localStorage snapshot file holding `entries`
#[allow(dead_code)]
pub fn write_snapshot(dir: &TempDir, entries: &[(&str, String)]) -> PathBuf {
    let object: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
        .collect();
    let path = dir.path().join("localstorage.json");
    fs::write(&path, serde_json::Value::Object(object).to_string())
        .expect("failed to write snapshot");
    path
}

/// Create a SQLite `entries` table holding `entries`
#[allow(dead_code)]
pub fn write_sqlite(path: &Path, entries: &[(&str, String)]) {
    let conn = Connection::open(path).expect("failed to open sqlite db");
    conn.execute(
        "CREATE TABLE entries (key TEXT PRIMARY KEY, value TEXT)",
        [],
    )
    .expect("failed to create entries table");
    for (key, value) in entries {
        conn.execute(
            "INSERT INTO entries (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .expect("failed to insert entry");
    }
}

/// Create a sled database holding `entries`
#[allow(dead_code)]
pub fn write_sled(path: &Path, entries: &[(&str, String)]) {
    let db = sled::open(path).expect("failed to open sled db");
    for (key, value) in entries {
        db.insert(key.as_bytes(), value.as_bytes())
            .expect("failed to insert entry");
    }
    db.flush().expect("failed to flush sled db");
}
