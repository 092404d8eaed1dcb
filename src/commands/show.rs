use crate::catalog::{Role, Session};
use crate::config::Config;
use crate::error::{ChatdexError, Result};
use chrono::Local;
use colored::Colorize;

/// Find a catalog session by full key or by id without the key prefix
pub fn find_session<'a>(sessions: &'a [Session], id: &str, key_prefix: &str) -> Option<&'a Session> {
    let prefixed = format!("{}{}", key_prefix, id);
    sessions
        .iter()
        .find(|s| s.id == id)
        .or_else(|| sessions.iter().find(|s| s.id == prefixed))
}

/// Handle `chatdex show <id>`
///
/// # Errors
///
/// Returns `ChatdexError::SessionNotFound` if no catalog session matches.
pub fn handle_show(config: &Config, id: &str) -> Result<()> {
    let sessions = super::load_catalog(config);
    let session = find_session(&sessions, id, &config.catalog.key_prefix)
        .ok_or_else(|| ChatdexError::SessionNotFound(id.to_string()))?;

    println!("\n{}", session.title(&config.title_options()).bold());
    println!("{}\n", session.id.cyan());

    for message in &session.messages {
        let role = match message.role {
            Role::User => message.role.as_str().green(),
            Role::Assistant => message.role.as_str().blue(),
            _ => message.role.as_str().dimmed(),
        };
        let when = message
            .timestamp()
            .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("[{}] {}", role.bold(), when.dimmed());
        println!("{}\n", message.content);
    }

    Ok(())
}
