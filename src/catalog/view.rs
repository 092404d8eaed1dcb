//! Display-ready projection of a grouped catalog

use super::grouper::{Bucket, BucketLabels, GroupedCatalog};
use super::types::{Session, TitleOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One session row as shown in a catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Storage key
    pub id: String,
    /// Derived title
    pub title: String,
    /// Leading timestamp
    pub created_at: Option<DateTime<Utc>>,
    /// Number of messages in the session
    pub message_count: usize,
}

impl SessionSummary {
    /// Summarize a session
    pub fn from_session(session: &Session, titles: &TitleOptions) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title(titles),
            created_at: session.leading_timestamp(),
            message_count: session.messages.len(),
        }
    }
}

/// One populated bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketView {
    /// Bucket identity
    pub bucket: Bucket,
    /// Configured display label
    pub label: String,
    /// Sessions, newest first
    pub sessions: Vec<SessionSummary>,
}

/// Populated buckets in display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogView {
    /// Buckets in display order; empty buckets are omitted
    pub buckets: Vec<BucketView>,
}

impl CatalogView {
    /// Project a grouped catalog
    pub fn new(grouped: &GroupedCatalog, labels: &BucketLabels, titles: &TitleOptions) -> Self {
        let buckets = grouped
            .iter()
            .map(|(bucket, sessions)| BucketView {
                bucket,
                label: labels.label(bucket).to_string(),
                sessions: sessions
                    .iter()
                    .map(|s| SessionSummary::from_session(s, titles))
                    .collect(),
            })
            .collect();
        Self { buckets }
    }

    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of sessions across buckets
    pub fn session_count(&self) -> usize {
        self.buckets.iter().map(|b| b.sessions.len()).sum()
    }
}
