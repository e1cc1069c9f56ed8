//! # granule-search
//!
//! Command-line driver for the query engine.
//!
//! ## Usage
//!
//! ```bash
//! # Stream matching records as JSON lines
//! echo '{"platform": ["S1A", "S1B"], "beammode": "IW"}' | granule-search search --max-results 20
//!
//! # Exact match count only
//! granule-search count --filters filters.json
//!
//! # Catalog health
//! MATURITY=test granule-search health
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;

use granule_search::logging::init_tracing;
use granule_search::{write_json_lines, Config, FilterSet, QueryEngine};

/// Search the granule metadata catalog
#[derive(Parser, Debug)]
#[command(name = "granule-search")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to config.toml + config.local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream matching records to stdout as JSON lines
    Search {
        /// JSON filter object; read from stdin when omitted
        #[arg(long)]
        filters: Option<PathBuf>,

        /// Stop after this many records
        #[arg(long)]
        max_results: Option<usize>,
    },

    /// Print the exact number of matches
    Count {
        /// JSON filter object; read from stdin when omitted
        #[arg(long)]
        filters: Option<PathBuf>,
    },

    /// Print the catalog health report
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    init_tracing(&config.logging);

    let engine = QueryEngine::from_config(&config);

    match cli.command {
        Command::Search {
            filters,
            max_results,
        } => {
            let filters = read_filters(filters.as_ref())?;
            let mut session = engine.session(&filters, max_results)?;

            let mut stdout = io::stdout().lock();
            write_json_lines(&mut session, &mut stdout).await?;

            tracing::info!(
                session_id = %session.id(),
                state = ?session.state(),
                results = session.result_count(),
                "search_finished"
            );
        }
        Command::Count { filters } => {
            let filters = read_filters(filters.as_ref())?;
            let session = engine.session(&filters, None)?;
            println!("{}", session.get_count().await?);
        }
        Command::Health => {
            let health = engine.client().health().await;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
    }

    Ok(())
}

fn read_filters(path: Option<&PathBuf>) -> anyhow::Result<FilterSet> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read filters '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read filters from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Filters must be a JSON object")
}
