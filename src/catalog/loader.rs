//! Catalog loader: key/value snapshot to sorted sessions
//!
//! Every entry under the session key prefix is parsed on its own. A bad
//! entry is dropped and logged; it never fails the whole load. An absent or
//! failing source yields an empty catalog.

use super::metrics;
use super::types::{Message, Session};
use crate::storage::EntrySource;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use thiserror::Error;

/// Key prefix under which chat sessions are persisted
pub const DEFAULT_KEY_PREFIX: &str = "chat_";

/// Why a stored entry was left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Value is not valid JSON, or an element does not fit the message shape
    #[error("malformed value: {0}")]
    Malformed(String),

    /// Value is valid JSON but not an array
    #[error("value is not a message sequence")]
    NotASequence,

    /// Message sequence is empty
    #[error("message sequence is empty")]
    Empty,

    /// First message has no creation timestamp
    #[error("first message has no createdAt timestamp")]
    MissingTimestamp,
}

impl RejectReason {
    /// Stable identifier used in logs and metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::Malformed(_) => "malformed",
            RejectReason::NotASequence => "not_a_sequence",
            RejectReason::Empty => "empty",
            RejectReason::MissingTimestamp => "missing_timestamp",
        }
    }
}

/// Result of validating a single stored entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Entry is a catalog-eligible session
    Accepted(Session),
    /// Entry was dropped
    Rejected {
        /// Storage key of the entry
        key: String,
        /// What was wrong with it
        reason: RejectReason,
    },
}

impl EntryOutcome {
    /// Storage key the outcome belongs to
    pub fn key(&self) -> &str {
        match self {
            EntryOutcome::Accepted(session) => &session.id,
            EntryOutcome::Rejected { key, .. } => key,
        }
    }

    /// The accepted session, if any
    pub fn into_session(self) -> Option<Session> {
        match self {
            EntryOutcome::Accepted(session) => Some(session),
            EntryOutcome::Rejected { .. } => None,
        }
    }
}

/// Validate one stored value.
///
/// # Examples
///
/// ```
/// use chatdex::catalog::{parse_entry, EntryOutcome, RejectReason};
///
/// let ok = parse_entry(
///     "chat_a",
///     r#"[{"role":"user","content":"hi","createdAt":"2024-05-01T10:00:00Z"}]"#,
/// );
/// assert!(matches!(ok, EntryOutcome::Accepted(_)));
///
/// let empty = parse_entry("chat_c", "[]");
/// assert!(matches!(
///     empty,
///     EntryOutcome::Rejected { reason: RejectReason::Empty, .. }
/// ));
/// ```
pub fn parse_entry(key: &str, raw: &str) -> EntryOutcome {
    let reject = |reason| EntryOutcome::Rejected {
        key: key.to_string(),
        reason,
    };

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => return reject(RejectReason::Malformed(e.to_string())),
    };
    if !value.is_array() {
        return reject(RejectReason::NotASequence);
    }

    let messages: Vec<Message> = match serde_json::from_value(value) {
        Ok(messages) => messages,
        Err(e) => return reject(RejectReason::Malformed(e.to_string())),
    };

    match messages.first() {
        None => reject(RejectReason::Empty),
        Some(first) if !first.has_timestamp() => reject(RejectReason::MissingTimestamp),
        Some(_) => EntryOutcome::Accepted(Session::new(key, messages)),
    }
}

/// Sort newest first by leading timestamp.
///
/// Sessions whose leading timestamp cannot be parsed sort as the Unix epoch.
/// Equal timestamps are ordered by id so the result does not depend on the
/// order the source listed entries in.
pub fn sort_newest_first(sessions: &mut [Session]) {
    sessions.sort_by(compare_newest_first);
}

fn compare_newest_first(a: &Session, b: &Session) -> Ordering {
    sort_key(b)
        .cmp(&sort_key(a))
        .then_with(|| a.id.cmp(&b.id))
}

fn sort_key(session: &Session) -> DateTime<Utc> {
    session
        .leading_timestamp()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Builds the session catalog from an entry source
///
/// # Examples
///
/// ```
/// use chatdex::catalog::CatalogLoader;
/// use chatdex::storage::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_entry("chat_a", r#"[{"role":"user","content":"hi","createdAt":"2024-05-01T10:00:00Z"}]"#)
///     .with_entry("chat_b", "not json")
///     .with_entry("theme", "dark");
///
/// let sessions = CatalogLoader::default().load(Some(&store));
/// assert_eq!(sessions.len(), 1);
/// assert_eq!(sessions[0].id, "chat_a");
///
/// assert!(CatalogLoader::default().load(None).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    prefix: String,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

impl CatalogLoader {
    /// Create a loader for a custom session key prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Session key prefix this loader selects
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Load the catalog, newest first.
    ///
    /// Never fails: rejected entries are logged and dropped, and an absent
    /// or failing source produces an empty catalog.
    pub fn load(&self, source: Option<&dyn EntrySource>) -> Vec<Session> {
        let mut sessions = Vec::new();
        for outcome in self.inspect(source) {
            match outcome {
                EntryOutcome::Accepted(session) => sessions.push(session),
                EntryOutcome::Rejected { key, reason } => {
                    tracing::warn!(key = %key, reason = reason.kind(), "Dropping stored chat: {}", reason);
                }
            }
        }

        sort_newest_first(&mut sessions);
        tracing::debug!(sessions = sessions.len(), "Loaded chat catalog");
        sessions
    }

    /// Validate every entry under the prefix and report each outcome,
    /// in source order.
    pub fn inspect(&self, source: Option<&dyn EntrySource>) -> Vec<EntryOutcome> {
        let Some(source) = source else {
            tracing::debug!("No entry source available, catalog is empty");
            return Vec::new();
        };

        let entries = match source.list_entries(&self.prefix) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(prefix = %self.prefix, "Entry source unavailable: {:#}", e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter(|(key, _)| key.starts_with(&self.prefix))
            .map(|(key, raw)| {
                let outcome = parse_entry(&key, &raw);
                match &outcome {
                    EntryOutcome::Accepted(_) => metrics::record_entry_accepted(),
                    EntryOutcome::Rejected { reason, .. } => metrics::record_entry_rejected(reason),
                }
                outcome
            })
            .collect()
    }
}
