//! Development tasks for the wasteland rule engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Derive, RuleTypes, Validate};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Development tasks for the wasteland rule engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for wasteland rules", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration TOML (overrides WASTELAND_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Message template overrides TOML (overrides WASTELAND_MESSAGES)
    #[arg(long, global = true, value_name = "FILE")]
    messages: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Derive an actor snapshot and print its sheet and rule diagnostics
    Derive(Derive),

    /// Validate a JSON array of rule sources
    Validate(Validate),

    /// List registered rule type identifiers
    RuleTypes(RuleTypes),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for WASTELAND_CONFIG and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = utils::build_engine(cli.config.as_deref(), cli.messages.as_deref())?;

    match cli.command {
        Command::Derive(cmd) => cmd.execute(&engine),
        Command::Validate(cmd) => cmd.execute(&engine),
        Command::RuleTypes(cmd) => cmd.execute(&engine),
    }
}
