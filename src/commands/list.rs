use crate::catalog::{group_by_date, CatalogView, GroupedCatalog, Session};
use crate::config::{Config, DayBoundary};
use crate::error::{ChatdexError, Result};
use chrono::{DateTime, FixedOffset, Local, Utc};
use colored::Colorize;
use prettytable::{format, Table};

/// Options for `chatdex list`
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    /// Print JSON instead of tables
    pub json: bool,
    /// Force UTC day boundaries
    pub utc: bool,
    /// Fixed "now"; its offset also sets the day boundary
    pub now: Option<DateTime<FixedOffset>>,
}

/// Group sessions relative to the moment and zone chosen by `args`/`config`
pub fn group_sessions(sessions: Vec<Session>, config: &Config, args: &ListArgs) -> GroupedCatalog {
    match args.now {
        Some(now) => group_by_date(sessions, &now),
        None if args.utc || config.display.day_boundary == DayBoundary::Utc => {
            group_by_date(sessions, &Utc::now())
        }
        None => group_by_date(sessions, &Local::now()),
    }
}

/// Handle `chatdex list`
pub fn handle_list(config: &Config, args: ListArgs) -> Result<()> {
    let sessions = super::load_catalog(config);
    let grouped = group_sessions(sessions, config, &args);
    let view = CatalogView::new(&grouped, &config.display.labels, &config.title_options());

    if args.json {
        let json = serde_json::to_string_pretty(&view).map_err(ChatdexError::Serialization)?;
        println!("{}", json);
        return Ok(());
    }

    if view.is_empty() {
        println!("{}", "No conversation history found.".yellow());
        return Ok(());
    }

    for bucket in &view.buckets {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.set_titles(prettytable::row![
            "ID".bold(),
            "Title".bold(),
            "Messages".bold(),
            "Started".bold()
        ]);

        for session in &bucket.sessions {
            let started = session
                .created_at
                .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(prettytable::row![
                session.id.cyan(),
                session.title,
                session.message_count,
                started
            ]);
        }

        println!("\n{} ({})", bucket.label.bold(), bucket.sessions.len());
        table.printstd();
    }
    println!();
    println!("Use {} to read a session.", "chatdex show <ID>".cyan());
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Bucket, Message};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_group_sessions_uses_fixed_now_offset() {
        // 22:30 UTC on the 9th is the 10th in UTC+2
        let created = Utc.with_ymd_and_hms(2024, 5, 9, 22, 30, 0).unwrap();
        let sessions = vec![Session::new(
            "chat_a",
            vec![Message::user("hi").with_created_at(created)],
        )];
        let now = DateTime::parse_from_rfc3339("2024-05-10T12:00:00+02:00").unwrap();
        let args = ListArgs {
            now: Some(now),
            ..ListArgs::default()
        };

        let grouped = group_sessions(sessions, &Config::default(), &args);
        assert_eq!(grouped.buckets(), vec![Bucket::Today]);
    }

    #[test]
    fn test_group_sessions_without_now_uses_clock() {
        let sessions = vec![Session::new(
            "chat_a",
            vec![Message::user("hi").with_created_at(Utc::now() - Duration::days(60))],
        )];
        let args = ListArgs {
            utc: true,
            ..ListArgs::default()
        };
        let grouped = group_sessions(sessions, &Config::default(), &args);
        assert_eq!(grouped.buckets(), vec![Bucket::Older]);
    }
}
