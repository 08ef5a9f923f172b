pub mod reconcile;
pub mod show;
pub mod watermarks;

use anyhow::{Context, Result};
use cclog_core::ChangeEntry;
use colored::Colorize;
use std::path::{Path, PathBuf};

pub fn get_state_path(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path),
        None => Ok(std::env::current_dir()
            .context("Couldn't determine the current directory")?
            .join(".cclog")
            .join("watermarks.json")),
    }
}

/// Rules from `--load-rule` first, then from the rules file, without duplicates.
pub fn collect_load_rules(rules: Vec<String>, rules_file: Option<&Path>) -> Result<Vec<String>> {
    let mut collected = Vec::new();
    let from_file = match rules_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Couldn't read load rules from {}", path.display()))?;
            parse_load_rules(&text)
        }
        None => Vec::new(),
    };

    for rule in rules.into_iter().chain(from_file) {
        let rule = rule.trim().to_string();
        if !rule.is_empty() && !collected.contains(&rule) {
            collected.push(rule);
        }
    }

    Ok(collected)
}

/// One rule per line; blank lines and `#` comments are skipped.
pub fn parse_load_rules(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

pub fn print_entry(entry: &ChangeEntry) {
    let date = entry
        .date()
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!(
        "{} {}",
        entry.operation().yellow().bold(),
        entry.version().yellow()
    );
    println!("{}: {}", "User".bold(), entry.user());
    println!("{}: {}", "Date".bold(), date);
    if !entry.event_description().is_empty() {
        println!("{}: {}", "Event".bold(), entry.event_description());
    }

    if !entry.comment().is_empty() {
        println!();
        println!("    {}", entry.comment());
    }

    let paths = entry.affected_paths();
    if !paths.is_empty() {
        println!();
        for path in paths.iter().take(5) {
            println!("      • {}", path.dimmed());
        }
        if paths.len() > 5 {
            println!(
                "      {} and {} more...",
                "...".dimmed(),
                (paths.len() - 5).to_string().dimmed()
            );
        }
    }

    println!();
}
