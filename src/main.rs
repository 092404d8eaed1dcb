//! Chatdex - browse persisted chat sessions
//!
#![doc = "Main entry point for the Chatdex command-line tool."]

use anyhow::Result;

use chatdex::cli::{Cli, Commands};
use chatdex::commands;
use chatdex::config::Config;
use chatdex::logging::{init_logging, LoggingOptions};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let mut logging = LoggingOptions::for_verbosity(cli.verbose);
    logging.json_format = cli.json_logs;
    logging.file_path = cli.log_file.clone();
    init_logging(&logging)?;

    let config_path = cli.config.as_deref().unwrap_or("config/chatdex.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::List { json, utc, now } => {
            tracing::info!("Listing chat catalog");
            if let Some(now) = &now {
                tracing::debug!("Grouping relative to {}", now);
            }
            commands::list::handle_list(&config, commands::list::ListArgs { json, utc, now })?;
        }
        Commands::Show { id } => {
            tracing::info!("Showing session {}", id);
            commands::show::handle_show(&config, &id)?;
        }
        Commands::Check => {
            tracing::info!("Checking stored chat entries");
            commands::check::handle_check(&config)?;
        }
    }

    Ok(())
}
