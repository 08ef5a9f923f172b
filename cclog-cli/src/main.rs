use anyhow::Result;
use cclog_core::SortOrder;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

mod commands;

use commands::{reconcile, show, watermarks};

#[derive(Parser)]
#[command(name = "cclog")]
#[command(version, about = "Incremental change logs for load rule based builds", long_about = None)]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Asc,
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortOrder::Increasing,
            Order::Desc => SortOrder::Decreasing,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the entries of a change log
    Show {
        /// Change log XML file
        changelog: PathBuf,

        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Sort entries by date
        #[arg(short, long, value_enum)]
        order: Option<Order>,
    },

    /// Drop already synchronized changes and advance the load rule watermarks
    Reconcile {
        /// Change log XML file with the newly collected changes
        batch: PathBuf,

        /// Load rule path prefix (repeatable)
        #[arg(short = 'r', long = "load-rule")]
        load_rules: Vec<String>,

        /// File with one load rule per line
        #[arg(long)]
        load_rules_file: Option<PathBuf>,

        /// Watermark state file
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Where to write the change log of new entries
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sort new entries by date
        #[arg(long, value_enum)]
        order: Option<Order>,

        /// Don't persist the updated watermarks
        #[arg(long)]
        dry_run: bool,
    },

    /// List the persisted watermark per load rule
    Watermarks {
        /// Watermark state file
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show {
            changelog,
            limit,
            order,
        } => {
            show::run(changelog, limit, order.map(SortOrder::from))?;
        }
        Commands::Reconcile {
            batch,
            load_rules,
            load_rules_file,
            state,
            output,
            order,
            dry_run,
        } => {
            reconcile::run(reconcile::Options {
                batch,
                load_rules,
                load_rules_file,
                state,
                output,
                order: order.map(SortOrder::from),
                dry_run,
            })?;
        }
        Commands::Watermarks { state } => {
            watermarks::run(state)?;
        }
    }

    Ok(())
}
