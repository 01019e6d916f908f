//! Calc command implementation.
//!
//! Runs the metrics calculator over the merged input feeds.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use bondrank_analytics::{calculate_batch, BatchOutcome, InstrumentWithMetrics, SkipKind, SkipStats};
use bondrank_core::CalculationParams;

use crate::commands::{load_universe, resolve_as_of, Context};
use crate::error::CliError;
use crate::output::{format_opt, print_header, print_output, print_warning};

/// Arguments for the calc command.
#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Input feed (.csv or .json); repeat to merge feeds in order
    #[arg(short, long, required = true)]
    pub input: Vec<PathBuf>,

    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of: Option<String>,

    /// Broker fee in percent, overriding the configuration
    #[arg(long)]
    pub fee_rate: Option<Decimal>,

    /// Tax rate in percent, overriding the configuration
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

/// One output row per calculated instrument.
#[derive(Debug, Serialize, Tabled)]
pub struct MetricsRow {
    #[tabled(rename = "ISIN")]
    pub isin: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "NKD")]
    pub accrued_interest: Decimal,
    #[tabled(rename = "Fee")]
    pub fee: Decimal,
    #[tabled(rename = "Total Cost")]
    pub total_cost: Decimal,
    #[tabled(rename = "Days")]
    pub days_to_maturity: i64,
    #[tabled(rename = "Net Profit")]
    pub net_profit: Decimal,
    #[tabled(rename = "Yield %")]
    pub annual_yield: Decimal,
    #[tabled(rename = "Offer")]
    pub offer_date: String,
    #[tabled(rename = "Offer Yield %")]
    pub annual_yield_offer: String,
}

impl From<&InstrumentWithMetrics> for MetricsRow {
    fn from(item: &InstrumentWithMetrics) -> Self {
        let s = &item.snapshot;
        let m = &item.metrics;
        Self {
            isin: s.isin.clone(),
            name: s.short_name.clone().or_else(|| s.ticker.clone()).unwrap_or_default(),
            price: format_opt(s.price),
            accrued_interest: m.accrued_interest,
            fee: m.fee,
            total_cost: m.total_cost,
            days_to_maturity: m.days_to_maturity,
            net_profit: m.net_profit,
            annual_yield: m.annual_yield,
            offer_date: m
                .offer
                .as_ref()
                .map(|o| o.offer_date.to_string())
                .unwrap_or_default(),
            annual_yield_offer: format_opt(m.annual_yield_offer()),
        }
    }
}

/// Applies command-line overrides to the configured parameters.
pub fn resolve_params(
    base: CalculationParams,
    fee_rate: Option<Decimal>,
    tax_rate: Option<Decimal>,
) -> Result<CalculationParams, CliError> {
    let mut params = base;
    if let Some(fee) = fee_rate {
        params = params.with_fee_rate(fee);
    }
    if let Some(tax) = tax_rate {
        params = params.with_tax_rate(tax);
    }
    params
        .check()
        .map_err(|e| CliError::InvalidParams(e.to_string()))?;
    Ok(params)
}

/// Execute the calc command.
pub fn execute(args: CalcArgs, ctx: &Context) -> Result<()> {
    let today = resolve_as_of(args.as_of.as_deref())?;
    let params = resolve_params(ctx.config.calculation_params(), args.fee_rate, args.tax_rate)?;
    let universe = load_universe(&args.input)?;

    let outcome = calculate_batch(&universe, &params, today, &ctx.config.batch)?;

    if !ctx.quiet {
        print_header(&format!(
            "Metrics as of {} (fee {}%, tax {}%)",
            today, params.fee_rate_pct, params.tax_rate_pct
        ));
    }
    let rows: Vec<MetricsRow> = outcome.calculated.iter().map(MetricsRow::from).collect();
    print_output(&rows, ctx.format)?;

    if !ctx.quiet {
        report_skips(&outcome);
    }
    Ok(())
}

/// Prints a one-line skip summary to stderr.
pub fn report_skips(outcome: &BatchOutcome) {
    if outcome.stats.total > 0 {
        print_warning(&format!(
            "{} of {} instruments skipped: {}",
            outcome.stats.total,
            outcome.input_count(),
            describe_skips(&outcome.stats)
        ));
    }
}

fn describe_skips(stats: &SkipStats) -> String {
    stats
        .by_kind
        .iter()
        .map(|(kind, count)| {
            if *kind != SkipKind::MissingField || stats.missing_fields.is_empty() {
                format!("{kind}={count}")
            } else {
                let fields: Vec<String> = stats
                    .missing_fields
                    .iter()
                    .map(|(name, n)| format!("{name}={n}"))
                    .collect();
                format!("{kind}={count} ({})", fields.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
