//! Isoreach CLI - Command-line interface
//!
//! The adapter around the evaluator: reads input layers, runs a mode,
//! writes the per-cell table and a class summary.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments and execute the command
    let cli = Cli::parse();
    commands::execute(cli)
}
