//! Development tasks for the progression engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;

use anyhow::Result;
use clap::Parser;
use commands::{ReadLedger, Simulate};

/// Development tasks for the progression engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the progression engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Read and inspect persisted level and prestige ledgers
    ReadLedger(ReadLedger),

    /// Replay a JSON event script through the engine
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for PROGRESSION_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::ReadLedger(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
    }
}
