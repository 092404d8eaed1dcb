/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `list`: grouped catalog as tables or JSON
- `show`: messages of a single session
- `check`: stored entries that failed validation

Handlers open the configured backend read-only. An unavailable backend is
not an error: it is reported as an empty catalog.
*/

use crate::catalog::{CatalogLoader, Session};
use crate::config::Config;
use crate::storage;

pub mod check;
pub mod list;
pub mod show;

/// Open the configured backend and load the sorted catalog
pub fn load_catalog(config: &Config) -> Vec<Session> {
    let source = storage::open_source(&config.storage);
    CatalogLoader::new(config.catalog.key_prefix.as_str()).load(source.as_deref())
}
