use anyhow::{Context, Result};
use cclog_core::ordering::sort_by_date;
use cclog_core::{ChangeLog, ChangeLogCodec, SortOrder};
use colored::Colorize;
use std::path::PathBuf;

pub fn run(changelog: PathBuf, limit: Option<usize>, order: Option<SortOrder>) -> Result<()> {
    if !changelog.exists() {
        anyhow::bail!("Change log {} does not exist", changelog.display());
    }

    let mut entries = ChangeLogCodec::new()
        .read_file(&changelog)
        .with_context(|| format!("Couldn't read change log {}", changelog.display()))?;

    if let Some(order) = order {
        entries = sort_by_date(entries, order);
    }

    let log = ChangeLog::new(entries);

    if log.is_empty() {
        println!("{}", "No changes recorded".yellow());
        return Ok(());
    }

    println!("{}", "Change Log".bold().cyan());
    println!("  {}: {}", "Entries".bold(), log.len());
    println!("  {}: {}", "Authors".bold(), log.authors().join(", "));
    println!();

    let to_show = limit.unwrap_or(log.len()).min(log.len());

    for entry in log.entries().iter().take(to_show) {
        super::print_entry(entry);
    }

    if log.len() > to_show {
        println!(
            "{}",
            format!("... and {} more entries", log.len() - to_show).dimmed()
        );
        println!("Use {} to see more", "--limit N".cyan());
    }

    Ok(())
}
