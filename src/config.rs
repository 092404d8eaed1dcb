//! Configuration management for Chatdex
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::catalog::{BucketLabels, TitleOptions, DEFAULT_KEY_PREFIX};
use crate::error::{ChatdexError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure for Chatdex
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which stored entries make up the catalog
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Where the key/value data lives
    #[serde(default)]
    pub storage: StorageConfig,
    /// How the grouped catalog is presented
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Catalog selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Storage key prefix identifying chat sessions
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
        }
    }
}

/// Key/value backend kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON dump of a browser localStorage
    #[default]
    Snapshot,
    /// sled database
    Sled,
    /// SQLite database with an `entries` table
    Sqlite,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Snapshot => "snapshot",
            StorageBackend::Sled => "sled",
            StorageBackend::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageBackend {
    type Err = ChatdexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snapshot" | "json" => Ok(StorageBackend::Snapshot),
            "sled" => Ok(StorageBackend::Sled),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(ChatdexError::Config(format!(
                "Invalid storage backend: {}. Must be one of: snapshot, sled, sqlite",
                other
            ))),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend kind
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the backend's data; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Time zone whose midnight separates calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// Local wall-clock midnight
    #[default]
    Local,
    /// UTC midnight
    Utc,
}

impl FromStr for DayBoundary {
    type Err = ChatdexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(DayBoundary::Local),
            "utc" => Ok(DayBoundary::Utc),
            other => Err(ChatdexError::Config(format!(
                "Invalid day boundary: {}. Must be one of: local, utc",
                other
            ))),
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Where calendar days start
    #[serde(default)]
    pub day_boundary: DayBoundary,

    /// Characters of the first user message kept in a title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Marker appended to truncated titles
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,

    /// Fallback title prefix for sessions without a user message
    #[serde(default = "default_untitled_label")]
    pub untitled_label: String,

    /// Title for a session with neither a user message nor an id
    #[serde(default = "default_new_chat_label")]
    pub new_chat_label: String,

    /// Bucket display labels
    #[serde(default)]
    pub labels: BucketLabels,
}

fn default_title_max_chars() -> usize {
    30
}

fn default_ellipsis() -> String {
    "...".to_string()
}

fn default_untitled_label() -> String {
    "Chat".to_string()
}

fn default_new_chat_label() -> String {
    "New chat".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            day_boundary: DayBoundary::default(),
            title_max_chars: default_title_max_chars(),
            ellipsis: default_ellipsis(),
            untitled_label: default_untitled_label(),
            new_chat_label: default_new_chat_label(),
            labels: BucketLabels::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, applied last
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatdexError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(prefix) = std::env::var("CHATDEX_KEY_PREFIX") {
            self.catalog.key_prefix = prefix;
        }

        if let Ok(backend) = std::env::var("CHATDEX_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(value) => self.storage.backend = value,
                Err(_) => tracing::warn!("Invalid CHATDEX_STORAGE_BACKEND: {}", backend),
            }
        }

        if let Ok(path) = std::env::var("CHATDEX_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(boundary) = std::env::var("CHATDEX_DAY_BOUNDARY") {
            match boundary.parse() {
                Ok(value) => self.display.day_boundary = value,
                Err(_) => tracing::warn!("Invalid CHATDEX_DAY_BOUNDARY: {}", boundary),
            }
        }

        if let Ok(max_chars) = std::env::var("CHATDEX_TITLE_MAX_CHARS") {
            if let Ok(value) = max_chars.parse() {
                self.display.title_max_chars = value;
            } else {
                tracing::warn!("Invalid CHATDEX_TITLE_MAX_CHARS: {}", max_chars);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(backend) = cli.backend {
            self.storage.backend = backend;
        }
        if let Some(store) = &cli.store {
            self.storage.path = Some(store.clone());
        }
        if let Some(prefix) = &cli.prefix {
            self.catalog.key_prefix = prefix.clone();
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatdexError::Config` if the key prefix is empty, the title
    /// length is zero, or any label is empty.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.key_prefix.is_empty() {
            return Err(
                ChatdexError::Config("catalog.key_prefix cannot be empty".to_string()).into(),
            );
        }

        if self.display.title_max_chars == 0 {
            return Err(ChatdexError::Config(
                "display.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.display.untitled_label.trim().is_empty()
            || self.display.new_chat_label.trim().is_empty()
        {
            return Err(ChatdexError::Config(
                "display.untitled_label and display.new_chat_label cannot be empty".to_string(),
            )
            .into());
        }

        for bucket in crate::catalog::Bucket::ALL {
            if self.display.labels.label(bucket).trim().is_empty() {
                return Err(ChatdexError::Config(format!(
                    "display.labels.{} cannot be empty",
                    bucket.key().replace('-', "_")
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Title derivation options for this configuration
    pub fn title_options(&self) -> TitleOptions {
        TitleOptions {
            max_chars: self.display.title_max_chars,
            ellipsis: self.display.ellipsis.clone(),
            untitled_label: self.display.untitled_label.clone(),
            new_chat_label: self.display.new_chat_label.clone(),
            key_prefix: self.catalog.key_prefix.clone(),
        }
    }
}
