//! Logging setup
//!
//! Human-readable or JSON `tracing` output on stderr, with optional file
//! output. Stdout is left to command output so `list --json` stays
//! machine-readable.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging options, usually derived from CLI flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of text
    pub json_format: bool,
    /// Also append to this file
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "chatdex=warn".to_string(),
            json_format: false,
            file_path: None,
        }
    }
}

impl LoggingOptions {
    /// Options for the given verbosity
    pub fn for_verbosity(verbose: bool) -> Self {
        let level = if verbose { "chatdex=debug" } else { "chatdex=warn" };
        Self {
            level: level.to_string(),
            ..Self::default()
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `options.level`.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid, the log file cannot
/// be opened, or a global subscriber is already installed.
pub fn init_logging(options: &LoggingOptions) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&options.level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let file = match &options.file_path {
        Some(path) => Some(Arc::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };

    if options.json_format {
        let stderr_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr);
        let file_layer = file.map(|f| fmt::layer().json().with_current_span(true).with_writer(f));
        registry.with(stderr_layer).with(file_layer).try_init()?;
    } else {
        let stderr_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);
        let file_layer = file.map(|f| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(f)
        });
        registry.with(stderr_layer).with(file_layer).try_init()?;
    }

    Ok(())
}
