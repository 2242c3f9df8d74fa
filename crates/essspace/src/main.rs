//! Essspace - capture notes from photos, screenshots, voice memos and text
//!
//! Main entry point for the Essspace CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;

use commands::{capture, config, notes, text};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Essspace - capture notes from photos, screenshots, voice memos and text
#[derive(Parser)]
#[command(name = "essspace")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding config.toml and logs
    #[arg(long, global = true, env = "ESSSPACE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Note database to use instead of the configured one
    #[arg(long, global = true, env = "ESSSPACE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Note management
    Notes(notes::NotesArgs),

    /// Create notes from photos, recordings and screenshots
    Capture(capture::CaptureArgs),

    /// Run the text post-processing steps on a file or stdin
    Text(text::TextArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: human-readable console plus a rotating JSON file
    let filter = if cli.verbose {
        "essspace=debug,essspace_capture=debug,essspace_domain=debug,essspace_store=debug,essspace_summarize=debug,essspace_config=debug,info"
    } else {
        "essspace=info,essspace_capture=info,essspace_domain=info,essspace_summarize=info,warn"
    };

    let log_dir = cli
        .config_dir
        .clone()
        .or_else(essspace_config::xdg_config_dir)
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "essspace.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "essspace=trace,essspace_capture=trace,essspace_domain=trace,essspace_store=trace,essspace_summarize=trace,essspace_config=trace,info",
                )),
        )
        .init();

    // Create context for commands
    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        config_dir: cli.config_dir,
        db_path: cli.db,
    };

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Notes(args) => notes::run(args, &ctx).await,
        Commands::Capture(args) => capture::run(args, &ctx).await,
        Commands::Text(args) => text::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        commands::print_error(format!("{:#}", e));
        drop(_guard);
        std::process::exit(1);
    }
    Ok(())
}
