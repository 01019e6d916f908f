//! CLI command implementations.

pub mod calc;
pub mod config;
pub mod rank;

pub use calc::CalcArgs;
pub use config::ConfigArgs;
pub use rank::RankArgs;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::info;

use bondrank_config::EngineConfig;
use bondrank_core::{Date, InstrumentSnapshot};

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, CliResult};

/// Settings shared by every command.
pub struct Context {
    /// Output format.
    pub format: OutputFormat,
    /// Suppress headers and summaries.
    pub quiet: bool,
    /// Effective engine configuration.
    pub config: EngineConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Loads the configuration named on the command line, or the defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => load_config(path)?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            format: cli.format,
            quiet: cli.quiet,
            config,
            config_path: cli.config.clone(),
        })
    }
}

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> CliResult<EngineConfig> {
    EngineConfig::from_file(path).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
}

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// The evaluation date: `--as-of` if given, else today.
pub fn resolve_as_of(as_of: Option<&str>) -> CliResult<Date> {
    as_of.map_or_else(|| Ok(Date::today()), parse_date)
}

/// Reads and merges the input feeds in order.
pub fn load_universe(inputs: &[PathBuf]) -> Result<Vec<InstrumentSnapshot>> {
    let snapshots =
        bondrank_ext_file::load_snapshots(inputs).context("Failed to load input feeds")?;
    info!(feeds = inputs.len(), instruments = snapshots.len(), "universe loaded");
    Ok(snapshots)
}
