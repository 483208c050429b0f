//! Streakfill - contribution-graph backfill CLI
//!
//! Creates empty git commits stamped with synthetic author/committer
//! timestamps for missing calendar days, then pushes the result, so a
//! contribution-activity graph stays visually continuous.

mod cli;
mod config;
mod git;
mod github;
mod plan;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG takes priority, --log-level is the fallback
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    cli::run(cli)
}
