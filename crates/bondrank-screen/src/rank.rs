//! The ranking pipeline.
//!
//! Stages run in a fixed order: fee override, effective-yield selection,
//! text filter, target-date window, yield band, rating whitelist, sort,
//! truncate. The input slice is never modified; a fee override works on
//! copies.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use bondrank_analytics::{calculate, InstrumentWithMetrics, MetricsCalculator};
use bondrank_core::{CalculationParams, Date};

use crate::error::ScreenResult;
use crate::spec::FilterSpec;

/// Which branch an effective yield was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Basis {
    /// Yield to the legal maturity date.
    Maturity,
    /// Yield to the pending offer date.
    Offer,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maturity => write!(f, "maturity"),
            Self::Offer => write!(f, "offer"),
        }
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedInstrument {
    /// 1-based rank.
    pub position: usize,
    /// The instrument, with recomputed metrics if a fee override was given.
    pub instrument: InstrumentWithMetrics,
    /// Yield the instrument was ranked by, percent.
    pub effective_yield: Decimal,
    /// Date the effective yield runs to.
    pub effective_target_date: Date,
    /// Branch the effective yield came from.
    pub basis: Basis,
}

impl RankedInstrument {
    /// The instrument's ISIN.
    #[must_use]
    pub fn isin(&self) -> &str {
        self.instrument.isin()
    }

    /// Rating code used for sorting; `None` when unrated.
    #[must_use]
    pub fn rating_code(&self) -> Option<u32> {
        self.instrument.snapshot.effective_rating_code()
    }
}

/// A candidate between selection and sorting.
struct Candidate {
    instrument: InstrumentWithMetrics,
    effective_yield: Decimal,
    effective_target_date: Date,
    basis: Basis,
    rating_code: Option<u32>,
}

/// Ranks `instruments` under `spec` as of `today`.
///
/// `params` supplies the tax rate and precision for a fee override; it is
/// not consulted otherwise.
///
/// # Errors
///
/// Returns [`crate::ScreenError::InvalidSpec`] for a malformed spec before
/// any work is done, or an analytics error if the override parameters are
/// out of range.
pub fn rank(
    instruments: &[InstrumentWithMetrics],
    spec: &FilterSpec,
    params: &CalculationParams,
    today: Date,
) -> ScreenResult<Vec<RankedInstrument>> {
    spec.validate()?;

    let working = apply_fee_override(instruments, spec, params, today)?;
    let input = working.len();

    let mut candidates: Vec<Candidate> = working
        .into_iter()
        .filter_map(|i| select_effective_yield(i, spec.prefer_offer_yield, today))
        .collect();
    let selected = candidates.len();

    if let Some(needle) = spec.text_needle() {
        candidates.retain(|c| c.instrument.snapshot.name_contains(&needle));
    }

    let (earliest, latest) = spec.target_window(today);
    candidates.retain(|c| {
        c.effective_target_date >= earliest && c.effective_target_date <= latest
    });

    candidates.retain(|c| c.effective_yield >= spec.min_yield && c.effective_yield <= spec.max_yield);

    let whitelist = spec.normalized_whitelist();
    if !whitelist.is_empty() {
        candidates.retain(|c| {
            c.instrument
                .snapshot
                .rating_label
                .as_deref()
                .is_some_and(|label| whitelist.contains(&label.trim().to_lowercase()))
        });
    }
    let matched = candidates.len();

    candidates.sort_by(compare);
    if let Some(limit) = spec.limit {
        candidates.truncate(limit);
    }

    debug!(
        input,
        selected,
        matched,
        returned = candidates.len(),
        "ranking complete"
    );

    Ok(candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| RankedInstrument {
            position: i + 1,
            instrument: c.instrument,
            effective_yield: c.effective_yield,
            effective_target_date: c.effective_target_date,
            basis: c.basis,
        })
        .collect())
}

/// Copies the input, recomputing metrics if the spec overrides the fee.
fn apply_fee_override(
    instruments: &[InstrumentWithMetrics],
    spec: &FilterSpec,
    params: &CalculationParams,
    today: Date,
) -> ScreenResult<Vec<InstrumentWithMetrics>> {
    let Some(fee) = spec.custom_fee_rate else {
        return Ok(instruments.to_vec());
    };

    let calculator = MetricsCalculator::new(params.with_fee_rate(fee))?;
    let mut dropped = 0usize;
    let recomputed: Vec<_> = instruments
        .iter()
        .filter_map(|i| match calculate(&i.snapshot, calculator.params(), today) {
            Ok(metrics) => Some(InstrumentWithMetrics {
                snapshot: i.snapshot.clone(),
                metrics,
            }),
            Err(reason) => {
                dropped += 1;
                debug!(isin = %i.snapshot.isin, %reason, "not calculable under fee override");
                None
            }
        })
        .collect();

    if dropped > 0 {
        warn!(dropped, fee_rate_pct = %fee, "instruments dropped during fee override");
    }
    Ok(recomputed)
}

/// Picks the offer or maturity branch, or drops the instrument if neither
/// yields a future target date.
fn select_effective_yield(
    instrument: InstrumentWithMetrics,
    prefer_offer: bool,
    today: Date,
) -> Option<Candidate> {
    let offer = instrument
        .metrics
        .offer
        .as_ref()
        .filter(|o| prefer_offer && o.offer_date > today)
        .map(|o| (o.annual_yield_offer, o.offer_date, Basis::Offer));

    let (effective_yield, effective_target_date, basis) = match offer {
        Some(selected) => selected,
        None => {
            let maturity = instrument.snapshot.maturity_date.filter(|d| *d > today)?;
            (instrument.metrics.annual_yield, maturity, Basis::Maturity)
        }
    };

    let rating_code = instrument.snapshot.effective_rating_code();
    Some(Candidate {
        instrument,
        effective_yield,
        effective_target_date,
        basis,
        rating_code,
    })
}

/// Whole-percent yield bucket descending, then rating code ascending with
/// unrated last, then exact yield descending.
///
/// Unrated instruments trail the rated ones within their own yield bucket
/// only; a higher bucket still ranks an unrated instrument above a rated one
/// from a lower bucket.
fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.effective_yield
        .floor()
        .cmp(&a.effective_yield.floor())
        .then_with(|| match (a.rating_code, b.rating_code) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.effective_yield.cmp(&a.effective_yield))
}
