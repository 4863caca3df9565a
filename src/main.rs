//! critiq - real-time code quality companion
//!
//! Watches a directory tree, scores every saved source file by cyclomatic
//! complexity (tree-sitter), delivers a persona-flavored verdict, and
//! appends each result to a local SQLite history.

mod ai;
mod analysis;
mod cli;
mod config;
mod feedback;
mod history;
mod models;
mod parsers;
mod watch;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Parse CLI args and run
    let cli = cli::Cli::parse();
    cli::run(cli)
}
