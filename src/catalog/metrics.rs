//! Catalog counters
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! these are no-ops.
//!
//! # Metrics
//!
//! - `catalog_entries_total`: stored entries examined, labeled by `outcome`
//!   (`accepted`/`rejected`) and, for rejections, `reason`
//! - `catalog_sessions_grouped_total`: sessions placed in a bucket, by `bucket`
//! - `catalog_sessions_skipped_total`: sessions the grouper could not date

use super::grouper::Bucket;
use super::loader::RejectReason;
use metrics::increment_counter;

/// Count an entry that became a catalog session
pub fn record_entry_accepted() {
    increment_counter!("catalog_entries_total", "outcome" => "accepted");
}

/// Count an entry dropped by the loader
pub fn record_entry_rejected(reason: &RejectReason) {
    increment_counter!(
        "catalog_entries_total",
        "outcome" => "rejected",
        "reason" => reason.kind()
    );
}

/// Count a session placed in `bucket`
pub fn record_session_grouped(bucket: Bucket) {
    increment_counter!("catalog_sessions_grouped_total", "bucket" => bucket.key());
}

/// Count a session skipped for lack of a usable timestamp
pub fn record_session_skipped() {
    increment_counter!("catalog_sessions_skipped_total");
}
