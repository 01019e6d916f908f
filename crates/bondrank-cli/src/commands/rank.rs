//! Rank command implementation.
//!
//! Calculates the merged universe, then filters and ranks it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use bondrank_analytics::calculate_batch;
use bondrank_config::ScreenDefaults;
use bondrank_screen::{rank, FilterSpec, RankedInstrument};

use crate::commands::calc::report_skips;
use crate::commands::{load_universe, resolve_as_of, Context};
use crate::output::{format_yield, print_header, print_output};

/// Arguments for the rank command.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Input feed (.csv or .json); repeat to merge feeds in order
    #[arg(short, long, required = true)]
    pub input: Vec<PathBuf>,

    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of: Option<String>,

    /// Earliest target date, in weeks from the evaluation date
    #[arg(long)]
    pub min_weeks: Option<u32>,

    /// Latest target date, in weeks from the evaluation date
    #[arg(long)]
    pub max_weeks: Option<u32>,

    /// Lowest accepted yield, percent
    #[arg(long, allow_negative_numbers = true)]
    pub min_yield: Option<Decimal>,

    /// Highest accepted yield, percent
    #[arg(long, allow_negative_numbers = true)]
    pub max_yield: Option<Decimal>,

    /// Rank by yield to the offer date when an offer is pending
    #[arg(long)]
    pub prefer_offer: bool,

    /// Recompute metrics with this broker fee (percent) before filtering
    #[arg(long)]
    pub fee_override: Option<Decimal>,

    /// Accepted rating label; repeat for several
    #[arg(long = "rating")]
    pub ratings: Vec<String>,

    /// Case-insensitive substring of ticker or name
    #[arg(long)]
    pub search: Option<String>,

    /// Maximum number of results
    #[arg(short, long, conflicts_with = "all")]
    pub limit: Option<usize>,

    /// Return every match
    #[arg(long)]
    pub all: bool,
}

impl RankArgs {
    /// Builds a filter spec from configured defaults and the given flags.
    pub fn to_spec(&self, defaults: &ScreenDefaults) -> FilterSpec {
        let mut spec = FilterSpec::from_defaults(defaults).with_maturity_weeks(
            self.min_weeks.unwrap_or(defaults.min_maturity_weeks),
            self.max_weeks.unwrap_or(defaults.max_maturity_weeks),
        );
        spec = spec.with_yield_band(
            self.min_yield.unwrap_or(defaults.min_yield),
            self.max_yield.unwrap_or(defaults.max_yield),
        );
        if self.prefer_offer {
            spec = spec.with_prefer_offer(true);
        }
        if let Some(fee) = self.fee_override {
            spec = spec.with_custom_fee_rate(fee);
        }
        if !self.ratings.is_empty() {
            spec = spec.with_rating_whitelist(self.ratings.iter().cloned());
        }
        if let Some(text) = &self.search {
            spec = spec.with_text_filter(text.clone());
        }
        if self.all {
            spec = spec.with_limit(None);
        } else if self.limit.is_some() {
            spec = spec.with_limit(self.limit);
        }
        spec
    }
}

/// One output row per ranked instrument.
#[derive(Debug, Serialize, Tabled)]
pub struct RankRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "ISIN")]
    pub isin: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Rating")]
    pub rating: String,
    #[tabled(rename = "Yield")]
    pub effective_yield: String,
    #[tabled(rename = "To")]
    pub basis: String,
    #[tabled(rename = "Date")]
    pub target_date: String,
    #[tabled(rename = "Total Cost")]
    pub total_cost: Decimal,
}

impl From<&RankedInstrument> for RankRow {
    fn from(r: &RankedInstrument) -> Self {
        let s = &r.instrument.snapshot;
        Self {
            position: r.position,
            isin: s.isin.clone(),
            name: s.short_name.clone().or_else(|| s.ticker.clone()).unwrap_or_default(),
            rating: s
                .rating_label
                .clone()
                .or_else(|| s.rating_code.map(|c| c.to_string()))
                .unwrap_or_default(),
            effective_yield: format_yield(r.effective_yield),
            basis: r.basis.to_string(),
            target_date: r.effective_target_date.to_string(),
            total_cost: r.instrument.metrics.total_cost,
        }
    }
}

/// Execute the rank command.
pub fn execute(args: RankArgs, ctx: &Context) -> Result<()> {
    let today = resolve_as_of(args.as_of.as_deref())?;
    let spec = args.to_spec(&ctx.config.screen);
    // Reject a malformed query before touching the feeds
    spec.validate()?;

    let params = ctx.config.calculation_params();
    let universe = load_universe(&args.input)?;
    let outcome = calculate_batch(&universe, &params, today, &ctx.config.batch)?;

    let ranked = rank(&outcome.calculated, &spec, &params, today)?;

    if !ctx.quiet {
        print_header(&format!(
            "Top {} of {} as of {}",
            ranked.len(),
            outcome.calculated.len(),
            today
        ));
    }
    let rows: Vec<RankRow> = ranked.iter().map(RankRow::from).collect();
    print_output(&rows, ctx.format)?;

    if !ctx.quiet {
        report_skips(&outcome);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RankArgs,
    }

    fn parse(extra: &[&str]) -> RankArgs {
        let mut argv = vec!["rank", "--input", "universe.csv"];
        argv.extend_from_slice(extra);
        Harness::parse_from(argv).args
    }

    #[test]
    fn test_spec_uses_defaults() {
        let spec = parse(&[]).to_spec(&ScreenDefaults::default());
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn test_spec_from_flags() {
        let spec = parse(&[
            "--min-weeks", "4", "--max-weeks", "104", "--min-yield", "12", "--max-yield", "30",
            "--prefer-offer", "--fee-override", "0.05", "--rating", "ruAA", "--rating", "ruA",
            "--search", "gaz", "--limit", "5",
        ])
        .to_spec(&ScreenDefaults::default());

        assert_eq!(spec.min_maturity_weeks, 4);
        assert_eq!(spec.max_maturity_weeks, 104);
        assert_eq!(spec.min_yield, Decimal::from(12));
        assert_eq!(spec.max_yield, Decimal::from(30));
        assert!(spec.prefer_offer_yield);
        assert_eq!(spec.custom_fee_rate, Some(Decimal::new(5, 2)));
        assert_eq!(spec.rating_whitelist.len(), 2);
        assert_eq!(spec.text_filter.as_deref(), Some("gaz"));
        assert_eq!(spec.limit, Some(5));
    }

    #[test]
    fn test_all_lifts_limit() {
        let spec = parse(&["--all"]).to_spec(&ScreenDefaults::default());
        assert_eq!(spec.limit, None);
    }

    #[test]
    fn test_limit_conflicts_with_all() {
        let argv = ["rank", "--input", "u.csv", "--all", "--limit", "3"];
        assert!(Harness::try_parse_from(argv).is_err());
    }
}
