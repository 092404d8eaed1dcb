//! Temporal grouper: sorted sessions to relative-date buckets
//!
//! Buckets are decided by calendar-day difference in the time zone of the
//! supplied "now", so a chat from 23:59 yesterday and one from 00:01
//! yesterday are both "Yesterday" regardless of elapsed hours.

use super::metrics;
use super::types::Session;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Relative-date bucket, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Same calendar day as now (and anything dated in the future)
    #[serde(rename = "today")]
    Today,
    /// Previous calendar day
    #[serde(rename = "yesterday")]
    Yesterday,
    /// 2 to 7 days ago
    #[serde(rename = "last-7-days")]
    Last7Days,
    /// 8 to 30 days ago
    #[serde(rename = "last-30-days")]
    Last30Days,
    /// More than 30 days ago
    #[serde(rename = "older")]
    Older,
}

impl Bucket {
    /// All buckets in display order
    pub const ALL: [Bucket; 5] = [
        Bucket::Today,
        Bucket::Yesterday,
        Bucket::Last7Days,
        Bucket::Last30Days,
        Bucket::Older,
    ];

    /// Classify a calendar-day difference.
    ///
    /// Negative differences (a session dated after "now", usually clock
    /// skew) are classified as [`Bucket::Today`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdex::catalog::Bucket;
    ///
    /// assert_eq!(Bucket::from_day_diff(0), Bucket::Today);
    /// assert_eq!(Bucket::from_day_diff(1), Bucket::Yesterday);
    /// assert_eq!(Bucket::from_day_diff(7), Bucket::Last7Days);
    /// assert_eq!(Bucket::from_day_diff(8), Bucket::Last30Days);
    /// assert_eq!(Bucket::from_day_diff(31), Bucket::Older);
    /// assert_eq!(Bucket::from_day_diff(-2), Bucket::Today);
    /// ```
    pub fn from_day_diff(days: i64) -> Self {
        match days {
            i64::MIN..=0 => Bucket::Today,
            1 => Bucket::Yesterday,
            2..=7 => Bucket::Last7Days,
            8..=30 => Bucket::Last30Days,
            _ => Bucket::Older,
        }
    }

    /// Machine-readable key, as used in JSON output and metric labels
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Today => "today",
            Bucket::Yesterday => "yesterday",
            Bucket::Last7Days => "last-7-days",
            Bucket::Last30Days => "last-30-days",
            Bucket::Older => "older",
        }
    }

    /// Default English display label
    pub fn default_label(&self) -> &'static str {
        match self {
            Bucket::Today => "Today",
            Bucket::Yesterday => "Yesterday",
            Bucket::Last7Days => "Last 7 days",
            Bucket::Last30Days => "Last 30 days",
            Bucket::Older => "Older",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_label())
    }
}

/// Display labels for each bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketLabels {
    /// Label for [`Bucket::Today`]
    #[serde(default = "default_today")]
    pub today: String,
    /// Label for [`Bucket::Yesterday`]
    #[serde(default = "default_yesterday")]
    pub yesterday: String,
    /// Label for [`Bucket::Last7Days`]
    #[serde(default = "default_last_7_days")]
    pub last_7_days: String,
    /// Label for [`Bucket::Last30Days`]
    #[serde(default = "default_last_30_days")]
    pub last_30_days: String,
    /// Label for [`Bucket::Older`]
    #[serde(default = "default_older")]
    pub older: String,
}

fn default_today() -> String {
    Bucket::Today.default_label().to_string()
}

fn default_yesterday() -> String {
    Bucket::Yesterday.default_label().to_string()
}

fn default_last_7_days() -> String {
    Bucket::Last7Days.default_label().to_string()
}

fn default_last_30_days() -> String {
    Bucket::Last30Days.default_label().to_string()
}

fn default_older() -> String {
    Bucket::Older.default_label().to_string()
}

impl Default for BucketLabels {
    fn default() -> Self {
        Self {
            today: default_today(),
            yesterday: default_yesterday(),
            last_7_days: default_last_7_days(),
            last_30_days: default_last_30_days(),
            older: default_older(),
        }
    }
}

impl BucketLabels {
    /// Label configured for `bucket`
    pub fn label(&self, bucket: Bucket) -> &str {
        match bucket {
            Bucket::Today => &self.today,
            Bucket::Yesterday => &self.yesterday,
            Bucket::Last7Days => &self.last_7_days,
            Bucket::Last30Days => &self.last_30_days,
            Bucket::Older => &self.older,
        }
    }
}

/// Sessions partitioned by bucket
///
/// Only populated buckets are present. Iteration follows display order and
/// each bucket keeps the order sessions were given in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedCatalog {
    buckets: BTreeMap<Bucket, Vec<Session>>,
}

impl GroupedCatalog {
    /// Sessions in `bucket`, `None` when the bucket is empty
    pub fn get(&self, bucket: Bucket) -> Option<&[Session]> {
        self.buckets.get(&bucket).map(Vec::as_slice)
    }

    /// Whether `bucket` holds any session
    pub fn contains(&self, bucket: Bucket) -> bool {
        self.buckets.contains_key(&bucket)
    }

    /// Populated buckets in display order
    pub fn buckets(&self) -> Vec<Bucket> {
        self.buckets.keys().copied().collect()
    }

    /// Iterate populated buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[Session])> {
        self.buckets.iter().map(|(b, s)| (*b, s.as_slice()))
    }

    /// Number of populated buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no session was grouped
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of grouped sessions
    pub fn session_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<Bucket, Vec<Session>> {
        self.buckets
    }

    fn push(&mut self, bucket: Bucket, session: Session) {
        self.buckets.entry(bucket).or_default().push(session);
    }
}

/// Calendar days from `reference` to `now`, counted in now's time zone
pub fn day_diff<Tz: TimeZone>(reference: &DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let today = now.date_naive();
    let reference_day = reference.with_timezone(&now.timezone()).date_naive();
    today.signed_duration_since(reference_day).num_days()
}

/// Partition sessions into relative-date buckets.
///
/// Sessions whose first message has no parsable timestamp are skipped and
/// logged. Pass `Local::now()` for local-midnight boundaries or a fixed
/// instant for deterministic results.
///
/// # Examples
///
/// ```
/// use chatdex::catalog::{group_by_date, Bucket, Message, Session};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
/// let sessions = vec![
///     Session::new("chat_a", vec![Message::user("hi").with_created_at(now - Duration::days(2))]),
///     Session::new("chat_b", vec![Message::user("yo").with_created_at(now - Duration::days(35))]),
/// ];
///
/// let grouped = group_by_date(sessions, &now);
/// assert_eq!(grouped.buckets(), vec![Bucket::Last7Days, Bucket::Older]);
/// ```
pub fn group_by_date<Tz, I>(sessions: I, now: &DateTime<Tz>) -> GroupedCatalog
where
    Tz: TimeZone,
    I: IntoIterator<Item = Session>,
{
    let mut grouped = GroupedCatalog::default();

    for session in sessions {
        let Some(reference) = session.leading_timestamp() else {
            tracing::warn!(session = %session.id, "Invalid or missing date, skipping grouping");
            metrics::record_session_skipped();
            continue;
        };

        let bucket = Bucket::from_day_diff(day_diff(&reference, now));
        metrics::record_session_grouped(bucket);
        grouped.push(bucket, session);
    }

    tracing::debug!(
        buckets = grouped.len(),
        sessions = grouped.session_count(),
        "Grouped chat catalog"
    );
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{CreatedAt, Message};
    use crate::test_utils::utc;
    use chrono::{Duration, FixedOffset};

    fn session_at(id: &str, ts: DateTime<Utc>) -> Session {
        Session::new(id, vec![Message::user(id).with_created_at(ts)])
    }

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (0, Bucket::Today),
            (1, Bucket::Yesterday),
            (2, Bucket::Last7Days),
            (7, Bucket::Last7Days),
            (8, Bucket::Last30Days),
            (30, Bucket::Last30Days),
            (31, Bucket::Older),
            (365, Bucket::Older),
            (-1, Bucket::Today),
        ];
        for (days, expected) in cases {
            assert_eq!(Bucket::from_day_diff(days), expected, "day diff {}", days);
        }
    }

    #[test]
    fn test_bucket_order_is_display_order() {
        let mut shuffled = vec![
            Bucket::Older,
            Bucket::Today,
            Bucket::Last30Days,
            Bucket::Yesterday,
            Bucket::Last7Days,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Bucket::ALL.to_vec());
    }

    #[test]
    fn test_bucket_serializes_as_key() {
        for bucket in Bucket::ALL {
            let json = serde_json::to_string(&bucket).unwrap();
            assert_eq!(json, format!("\"{}\"", bucket.key()));
        }
    }

    #[test]
    fn test_day_diff_uses_calendar_days_not_hours() {
        let now = utc(2024, 5, 10, 0, 30);
        // 1h before now, but on the previous calendar day
        assert_eq!(day_diff(&utc(2024, 5, 9, 23, 30), &now), 1);
        // 47h before now, still only two calendar days back
        assert_eq!(day_diff(&utc(2024, 5, 8, 1, 30), &now), 2);
    }

    #[test]
    fn test_day_diff_respects_now_time_zone() {
        // 2024-05-09 22:00 UTC is already 2024-05-10 in UTC+3
        let reference = utc(2024, 5, 9, 22, 0);
        let plus3 = FixedOffset::east_opt(3 * 3600).unwrap();
        let now_utc = utc(2024, 5, 10, 9, 0);
        assert_eq!(day_diff(&reference, &now_utc), 1);
        assert_eq!(day_diff(&reference, &now_utc.with_timezone(&plus3)), 0);
    }

    #[test]
    fn test_group_straddling_midnight_splits_buckets() {
        let now = utc(2024, 5, 10, 15, 0);
        let sessions = vec![
            session_at("chat_after", utc(2024, 5, 10, 1, 0)),
            session_at("chat_before", utc(2024, 5, 9, 23, 0)),
        ];
        let grouped = group_by_date(sessions, &now);
        assert_eq!(grouped.get(Bucket::Today).unwrap()[0].id, "chat_after");
        assert_eq!(grouped.get(Bucket::Yesterday).unwrap()[0].id, "chat_before");
    }

    #[test]
    fn test_group_preserves_input_order_within_bucket() {
        let now = utc(2024, 5, 10, 12, 0);
        let sessions = vec![
            session_at("chat_3", now - Duration::days(3)),
            session_at("chat_1", now - Duration::days(5)),
            session_at("chat_2", now - Duration::days(4)),
        ];
        let grouped = group_by_date(sessions, &now);
        let ids: Vec<&str> = grouped
            .get(Bucket::Last7Days)
            .unwrap()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["chat_3", "chat_1", "chat_2"]);
    }

    #[test]
    fn test_group_skips_sessions_without_valid_timestamp() {
        let now = utc(2024, 5, 10, 12, 0);
        let sessions = vec![
            Session::new("chat_empty", vec![]),
            Session::new("chat_none", vec![Message::user("x")]),
            Session::new(
                "chat_bad",
                vec![Message::user("x").with_created_at(CreatedAt::Text("nope".into()))],
            ),
            session_at("chat_ok", now),
        ];
        let grouped = group_by_date(sessions, &now);
        assert_eq!(grouped.session_count(), 1);
        assert_eq!(grouped.buckets(), vec![Bucket::Today]);
    }

    #[test]
    fn test_group_future_session_is_today() {
        let now = utc(2024, 5, 10, 12, 0);
        let grouped = group_by_date(vec![session_at("chat_f", now + Duration::days(3))], &now);
        assert!(grouped.contains(Bucket::Today));
        assert_eq!(grouped.len(), 1);
    }

    #[test]
    fn test_group_empty_input_has_no_buckets() {
        let now = utc(2024, 5, 10, 12, 0);
        let grouped = group_by_date(Vec::new(), &now);
        assert!(grouped.is_empty());
        assert_eq!(grouped.get(Bucket::Today), None);
    }

    #[test]
    fn test_grouped_catalog_serializes_as_map() {
        let now = utc(2024, 5, 10, 12, 0);
        let grouped = group_by_date(vec![session_at("chat_a", now)], &now);
        let value = serde_json::to_value(&grouped).unwrap();
        assert_eq!(value["today"][0]["id"], "chat_a");
        assert!(value.get("older").is_none());
    }

    #[test]
    fn test_bucket_labels_lookup_and_partial_yaml() {
        let labels: BucketLabels = serde_yaml::from_str("today: \"今天\"\nolder: \"更早\"").unwrap();
        assert_eq!(labels.label(Bucket::Today), "今天");
        assert_eq!(labels.label(Bucket::Older), "更早");
        assert_eq!(labels.label(Bucket::Yesterday), "Yesterday");
    }
}
