use anyhow::{Context, Result};
use cclog_core::{reconcile, ChangeLogCodec, SortOrder, WatermarkStore};
use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;

pub struct Options {
    pub batch: PathBuf,
    pub load_rules: Vec<String>,
    pub load_rules_file: Option<PathBuf>,
    pub state: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub order: Option<SortOrder>,
    pub dry_run: bool,
}

pub fn run(options: Options) -> Result<()> {
    let load_rules =
        super::collect_load_rules(options.load_rules, options.load_rules_file.as_deref())?;
    if load_rules.is_empty() {
        anyhow::bail!("No load rules given. Use --load-rule or --load-rules-file.");
    }

    let codec = ChangeLogCodec::new();
    let batch = codec
        .read_file(&options.batch)
        .with_context(|| format!("Couldn't read change batch {}", options.batch.display()))?;

    let store = WatermarkStore::new(super::get_state_path(options.state)?);
    let prior = store.load_or_default();

    let outcome = reconcile(batch, &prior, &load_rules, options.order);

    println!("{}", "Reconciliation".bold().cyan());
    println!("  {}: {}", "Load rules".bold(), load_rules.len());
    println!(
        "  {}: {}",
        "New changes".bold(),
        outcome.entries.len().to_string().green()
    );
    println!(
        "  {}: {}",
        "Already synchronized".bold(),
        outcome.removed.to_string().yellow()
    );
    println!();

    for rule in &load_rules {
        let before = prior.get(rule);
        let after = outcome.watermarks.get(rule);
        let shown = after
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never synchronized".to_string());

        if before != after {
            println!("  {} {} {}", "↑".green(), shown.green(), rule);
        } else {
            println!("  {} {} {}", "=".dimmed(), shown.dimmed(), rule);
        }
    }
    println!();

    if let Some(output) = &options.output {
        if codec.write_file(output, &outcome.entries) {
            println!("{}: {}", "Change log written".bold(), output.display());
        } else {
            warn!("Continuing without a persisted change log");
            println!(
                "{}",
                format!("Couldn't write change log to {}", output.display()).red()
            );
        }
    }

    if options.dry_run {
        println!("{}", "Dry run, watermarks not saved".yellow());
        return Ok(());
    }

    store
        .save(&outcome.watermarks)
        .with_context(|| format!("Couldn't save watermarks to {}", store.path().display()))?;
    println!("{}: {}", "Watermarks saved".bold(), store.path().display());

    Ok(())
}
