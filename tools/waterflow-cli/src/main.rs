//! Waterflow CLI: run and inspect the right-drag gesture recognizer.
//!
//! Usage:
//!   waterflow listen               Classify live pointer input
//!   waterflow replay <TRACE>       Classify a recorded pointer trace
//!   waterflow record <OUTPUT>      Capture live pointer input to a trace
//!   waterflow config               Show or write the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use waterflow_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "waterflow",
    about = "Right-button drag gesture recognizer",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify live pointer input and print notifications
    Listen {
        /// Stop after this many seconds (runs until Ctrl-C otherwise)
        #[arg(long)]
        duration_secs: Option<u64>,

        /// Print notifications in packed message form
        #[arg(long)]
        packed: bool,
    },

    /// Classify a recorded pointer trace
    Replay {
        /// Path to the JSONL pointer trace
        trace: PathBuf,

        /// Expected notifications (JSONL); exit non-zero on mismatch
        #[arg(long)]
        expect: Option<PathBuf>,

        /// Print notifications in packed message form
        #[arg(long)]
        packed: bool,
    },

    /// Capture live pointer input into a trace file
    Record {
        /// Output trace path
        output: PathBuf,

        /// Stop after this many seconds (runs until Ctrl-C otherwise)
        #[arg(long)]
        duration_secs: Option<u64>,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration to the standard location
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    waterflow_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Listen {
            duration_secs,
            packed,
        } => commands::listen::run(&config, duration_secs, packed).await,
        Commands::Replay {
            trace,
            expect,
            packed,
        } => commands::replay::run(&config, trace, expect, packed),
        Commands::Record {
            output,
            duration_secs,
        } => commands::record::run(&config, output, duration_secs).await,
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
