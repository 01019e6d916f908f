//! Bondrank CLI - bond valuation and ranking from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compute metrics for every bond in the merged feeds
//! bondrank calc --input reference.csv --input prices.json --as-of 2025-03-01
//!
//! # Top 10 bonds maturing within two years, yielding 12-30%, rated ruA or ruAA
//! bondrank rank --input universe.csv --max-weeks 104 --min-yield 12 --max-yield 30 \
//!     --rating ruA --rating ruAA --limit 10
//!
//! # Inspect or check configuration
//! bondrank config show
//! bondrank config validate bondrank.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = commands::Context::load(&cli)?;

    match cli.command {
        Commands::Calc(args) => commands::calc::execute(args, &context)?,
        Commands::Rank(args) => commands::rank::execute(args, &context)?,
        Commands::Config(args) => commands::config::execute(args, &context)?,
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
