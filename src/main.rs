//! # DeedScope CLI (`deedscope`)
//!
//! The `deedscope` binary runs the HTTP API or analyzes a single document
//! from the command line.
//!
//! ## Usage
//!
//! ```bash
//! deedscope --config ./config/deedscope.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `deedscope serve` | Start the HTTP server |
//! | `deedscope analyze <file>` | Analyze one deed and print the report as JSON |
//!
//! ## Examples
//!
//! ```bash
//! # One-shot analysis of a PDF deed
//! deedscope analyze sale-deed.pdf
//!
//! # Start the API with a custom config
//! deedscope serve --config ./config/deedscope.toml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use deedscope::config::{load_config, Config};
use deedscope::pipeline::Pipeline;
use deedscope::server::run_server;

/// DeedScope — sale-deed analysis and bilingual question answering.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/deedscope.example.toml` for a full example. A missing
/// config file falls back to built-in defaults (all collaborators disabled).
#[derive(Parser)]
#[command(
    name = "deedscope",
    about = "DeedScope — sale-deed analysis and bilingual question answering",
    version,
    long_about = "DeedScope extracts structured facts from property sale deeds, assesses \
    completeness risk, renders English and Tamil summaries, and answers questions via \
    rule-based intent routing with semantic retrieval fallback."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/deedscope.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves `/analyze`, `/ask`, `/documents`,
    /// `/audio/{id}`, and `/health`.
    Serve,

    /// Analyze a single deed and print the full report as JSON.
    ///
    /// Accepts a PDF or plain-text file. The report includes extracted
    /// facts, the risk verdict, and both summaries; the in-process index
    /// is discarded when the command exits.
    Analyze {
        /// Path to the deed (`.pdf` or `.txt`).
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Serve => run_server(&config).await,
        Commands::Analyze { file } => analyze_file(&config, &file).await,
    }
}

async fn analyze_file(config: &Config, file: &PathBuf) -> anyhow::Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let content_type = if filename.to_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "text/plain"
    };

    let pipeline = Pipeline::from_config(Arc::new(config.clone()))?;
    let report = pipeline.analyze(&bytes, content_type, &filename).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
