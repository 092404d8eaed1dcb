//! Command-line interface definition for Chatdex
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to list, show and check stored chat sessions.

use crate::config::StorageBackend;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chatdex - browse persisted chat sessions
///
/// Reads chat sessions from a key/value store (never writing to it) and
/// lists them grouped by relative date.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatdex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CHATDEX_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Append logs to this file as well as stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Override the storage backend
    #[arg(short, long, value_enum, global = true)]
    pub backend: Option<StorageBackend>,

    /// Override the storage path
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Override the session key prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Chatdex
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List sessions grouped by relative date
    List {
        /// Print the grouped catalog as JSON
        #[arg(long)]
        json: bool,

        /// Use UTC midnight as the day boundary
        #[arg(long)]
        utc: bool,

        /// Group relative to this RFC 3339 instant instead of the current time
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<FixedOffset>>,
    },

    /// Show the messages of one session
    Show {
        /// Session id, with or without the key prefix
        id: String,
    },

    /// Report stored entries that are not valid sessions
    Check,
}

/// Parse an RFC 3339 instant for `--now`
pub fn parse_now(raw: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| format!("invalid RFC 3339 time '{}': {}", raw, e))
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            verbose: false,
            json_logs: false,
            log_file: None,
            backend: None,
            store: None,
            prefix: None,
            command: Commands::List {
                json: false,
                utc: false,
                now: None,
            },
        }
    }
}
