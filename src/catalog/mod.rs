//! Chat session catalog
//!
//! Reconstructs conversations from a key/value snapshot and groups them
//! by relative date:
//!
//! - [`CatalogLoader`] selects `chat_*` entries, validates each one and
//!   returns sessions sorted newest first
//! - [`group_by_date`] partitions that list into [`Bucket`]s relative to a
//!   caller-supplied "now"
//! - [`CatalogView`] projects the grouping into titled rows for display
//!
//! Both steps are pure and synchronous; nothing here writes to storage.

pub mod grouper;
pub mod loader;
pub mod metrics;
pub mod types;
pub mod view;

pub use grouper::{day_diff, group_by_date, Bucket, BucketLabels, GroupedCatalog};
pub use loader::{
    parse_entry, sort_newest_first, CatalogLoader, EntryOutcome, RejectReason,
    DEFAULT_KEY_PREFIX,
};
pub use types::{CreatedAt, Message, Role, Session, TitleOptions};
pub use view::{BucketView, CatalogView, SessionSummary};
