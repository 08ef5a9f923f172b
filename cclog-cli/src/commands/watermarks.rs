use anyhow::Result;
use cclog_core::WatermarkStore;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(state: Option<PathBuf>) -> Result<()> {
    let store = WatermarkStore::new(super::get_state_path(state)?);

    if !store.exists() {
        println!("{}", "No watermark state found".red());
        println!("Run {} to create one", "cclog reconcile".cyan());
        return Ok(());
    }

    let watermarks = store.load()?;

    println!("{}", "Load Rule Watermarks".bold().cyan());
    println!("  {}: {}", "State".bold(), store.path().display());
    println!();

    if watermarks.is_empty() {
        println!("{}", "No load rule has been synchronized yet".yellow());
        return Ok(());
    }

    for (rule, date) in &watermarks {
        println!(
            "  {} {}",
            date.format("%Y-%m-%d %H:%M:%S").to_string().green(),
            rule
        );
    }

    Ok(())
}
