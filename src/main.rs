//! registry-batch - maintenance commands for the status store
//!
//! Fetch runs need an executor and are started by embedding programs; this binary
//! covers ingestion, inspection and reset.

use clap::{Parser, Subcommand};
use registry_batch::core::ingest::{DefaultStrategy, FileInputSource, IngestOptions, ingest};
use registry_batch::utils::init_tracing;
use registry_batch::{Config, OrchestratorError, Result, StatusStore, build_info};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "registry-batch", version, about = "Status store maintenance")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "REGISTRY_BATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print build information
    Version,
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands operating on the configured status store
#[derive(Debug, Subcommand)]
enum StoreCommand {
    /// Load identifier files into the store, replacing the previous input
    Ingest {
        /// Input files, one identifier per line
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Queue identifiers again even when a payload exists
        #[arg(long)]
        update_mode: bool,
        /// Drop stored payloads before loading
        #[arg(long)]
        clear_payloads: bool,
    },
    /// Print store counters
    Stats,
    /// Print every stored payload
    Export,
    /// Delete identifier rows
    Reset {
        /// Delete stored payloads too
        #[arg(long)]
        clear_payloads: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            ExitCode::from(exit_status(&e))
        }
    }
}

/// 1 for faults that need operator attention, 2 for bad input
fn exit_status(error: &OrchestratorError) -> u8 {
    if error.is_fatal() { 1 } else { 2 }
}

async fn run(cli: Cli) -> Result<String> {
    let command = match cli.command {
        Command::Version => return Ok(serde_json::to_string_pretty(&build_info())?),
        Command::Store(command) => command,
    };

    let config = Config::load(cli.config.as_deref()).await?;
    init_tracing(&config.logging)?;

    let store = StatusStore::open(&config.store).await?;
    let output = execute(&store, &config, command).await;
    store.close().await?;

    Ok(serde_json::to_string_pretty(&output?)?)
}

async fn execute(store: &StatusStore, config: &Config, command: StoreCommand) -> Result<Value> {
    match command {
        StoreCommand::Ingest {
            files,
            update_mode,
            clear_payloads,
        } => {
            let options = IngestOptions {
                update_mode: update_mode || config.driver.update_mode,
                clear_payloads: clear_payloads || config.store.clear_payloads_on_reset,
            };
            let mut source = FileInputSource::new(files);
            let summary = ingest(store, &mut source, &DefaultStrategy, options).await?;
            let stats = store.collect_stats().await?;
            Ok(json!({ "ingested": summary, "stats": stats }))
        }
        StoreCommand::Stats => {
            let stats = store.collect_stats().await?;
            Ok(json!({ "stats": stats, "pending": stats.pending() }))
        }
        StoreCommand::Export => {
            let results: serde_json::Map<String, Value> =
                store.export_results().await?.into_iter().collect();
            Ok(Value::Object(results))
        }
        StoreCommand::Reset { clear_payloads } => {
            store.reset(clear_payloads).await?;
            info!(clear_payloads, "Store reset from the command line");
            Ok(json!({ "reset": true, "clear_payloads": clear_payloads }))
        }
    }
}
