//! Config command implementation.
//!
//! Shows the effective engine configuration or validates a file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use bondrank_config::EngineConfig;

use crate::cli::OutputFormat;
use crate::commands::{load_config, Context};
use crate::output::{print_header, print_output, print_success, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Check a configuration file and report every problem
    Validate(ValidateArgs),
}

/// Arguments for validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration file (.toml or .json)
    pub file: PathBuf,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Validate(v) => validate(&v.file),
    }
}

fn show(ctx: &Context) -> Result<()> {
    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        }
        OutputFormat::Table if !ctx.quiet => {
            let source = ctx
                .config_path
                .as_ref()
                .map_or_else(|| "built-in defaults".to_string(), |p| p.display().to_string());
            print_header(&format!("Configuration ({source})"));
            print_output(&settings(&ctx.config), ctx.format)?;
        }
        _ => print_output(&settings(&ctx.config), ctx.format)?,
    }
    Ok(())
}

fn validate(file: &std::path::Path) -> Result<()> {
    load_config(file)?;
    print_success(&format!("{} is valid", file.display()));
    Ok(())
}

/// Flattens the configuration into display rows.
fn settings(config: &EngineConfig) -> Vec<KeyValue> {
    let screen = &config.screen;
    vec![
        KeyValue::new("fee_rate_pct", config.fee_rate_pct),
        KeyValue::new("tax_rate_pct", config.tax_rate_pct),
        KeyValue::new("precision.working_scale", config.precision.working_scale),
        KeyValue::new("precision.money_scale", config.precision.money_scale),
        KeyValue::new("precision.yield_scale", config.precision.yield_scale),
        KeyValue::new("screen.min_maturity_weeks", screen.min_maturity_weeks),
        KeyValue::new("screen.max_maturity_weeks", screen.max_maturity_weeks),
        KeyValue::new("screen.min_yield", screen.min_yield),
        KeyValue::new("screen.max_yield", screen.max_yield),
        KeyValue::new("screen.prefer_offer_yield", screen.prefer_offer_yield),
        KeyValue::new(
            "screen.limit",
            screen.limit.map_or_else(|| "none".to_string(), |l| l.to_string()),
        ),
        KeyValue::new("batch.parallel", config.batch.parallel),
        KeyValue::new("batch.parallel_threshold", config.batch.parallel_threshold),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_cover_defaults() {
        let rows = settings(&EngineConfig::default());
        let fee = rows.iter().find(|r| r.key == "fee_rate_pct").unwrap();
        assert_eq!(fee.value, "0.3");
        let limit = rows.iter().find(|r| r.key == "screen.limit").unwrap();
        assert_eq!(limit.value, "20");
    }
}
