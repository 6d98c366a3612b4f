//! `pmstream` CLI - Query the catalog and resolve streams from the terminal

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pmstream::pipeline::{CATALOG_ID, CATALOG_TYPE};
use pmstream::{classify, CatalogExtra, Config, ResolutionPipeline};

#[derive(Parser)]
#[command(name = "pmstream")]
#[command(about = "Resolve live-event catalog entries into playable streams")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/pmstream/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog entries as display items
    Catalog {
        /// Category filter (e.g. soccer, nfl, today)
        #[arg(short, long)]
        category: Option<String>,

        /// Content type
        #[arg(long = "type", default_value = CATALOG_TYPE)]
        kind: String,

        /// Catalog id
        #[arg(long, default_value = CATALOG_ID)]
        id: String,
    },

    /// Resolve a composite id (prefix:category:id) into ranked streams
    Streams {
        /// Composite id, e.g. pm-content:all:42
        id: String,

        /// Content type
        #[arg(long = "type", default_value = CATALOG_TYPE)]
        kind: String,
    },

    /// Print the quality tier detected in a filename
    Classify {
        /// Filename to classify
        filename: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for JSON
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Catalog { category, kind, id } => {
            let pipeline = build_pipeline(cli.config.as_deref())?;
            let extra = CatalogExtra { category };
            let response = pipeline.catalog(&kind, &id, &extra).await;
            print_json(&response, cli.pretty)?;
        }
        Commands::Streams { id, kind } => {
            let pipeline = build_pipeline(cli.config.as_deref())?;
            let response = pipeline.streams(&kind, &id).await;
            print_json(&response, cli.pretty)?;
        }
        Commands::Classify { filename } => {
            println!("{}", classify(&filename));
        }
    }

    Ok(())
}

fn build_pipeline(config_path: Option<&std::path::Path>) -> Result<ResolutionPipeline> {
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!(
        api_base = %config.api_base,
        premium = config.premium_enabled(),
        "Configuration loaded"
    );
    ResolutionPipeline::from_config(&config).context("failed to initialize pipeline")
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
