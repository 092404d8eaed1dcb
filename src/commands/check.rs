use crate::catalog::{CatalogLoader, EntryOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::storage;
use colored::Colorize;
use prettytable::{format, Table};

/// Accepted/rejected tally of a validation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Entries that are valid sessions
    pub accepted: usize,
    /// Entries the loader would drop
    pub rejected: usize,
}

impl CheckSummary {
    /// Tally a list of outcomes
    pub fn from_outcomes(outcomes: &[EntryOutcome]) -> Self {
        let accepted = outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Accepted(_)))
            .count();
        Self {
            accepted,
            rejected: outcomes.len() - accepted,
        }
    }
}

/// Handle `chatdex check`
pub fn handle_check(config: &Config) -> Result<()> {
    let source = storage::open_source(&config.storage);
    let outcomes =
        CatalogLoader::new(config.catalog.key_prefix.as_str()).inspect(source.as_deref());
    let summary = CheckSummary::from_outcomes(&outcomes);

    if outcomes.is_empty() {
        println!("{}", "No stored chat entries found.".yellow());
        return Ok(());
    }

    if summary.rejected > 0 {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.set_titles(prettytable::row!["Key".bold(), "Problem".bold()]);
        for outcome in &outcomes {
            if let EntryOutcome::Rejected { key, reason } = outcome {
                table.add_row(prettytable::row![key.red(), reason]);
            }
        }
        println!("\nRejected entries:");
        table.printstd();
    }

    println!(
        "\n{} valid, {} rejected",
        summary.accepted.to_string().green(),
        summary.rejected.to_string().red()
    );

    Ok(())
}
