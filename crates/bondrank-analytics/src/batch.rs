//! Batch calculation over a universe of snapshots.
//!
//! Runs sequentially, or on the rayon pool when the `parallel` feature is
//! enabled and the batch is large enough. Input order is preserved either way.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use bondrank_config::BatchConfig;
use bondrank_core::{CalculationParams, Date, InstrumentSnapshot};

use crate::error::AnalyticsResult;
use crate::metrics::{calculate, MetricsResult, SkipKind, SkipReason};

/// Maps a function over items, using rayon when allowed.
///
/// Parallel iteration is used when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The slice holds at least `config.parallel_threshold` items
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &BatchConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.wants_parallel(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

/// A snapshot paired with its metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentWithMetrics {
    /// Input data.
    pub snapshot: InstrumentSnapshot,
    /// Derived metrics.
    pub metrics: MetricsResult,
}

impl InstrumentWithMetrics {
    /// The instrument's ISIN.
    #[must_use]
    pub fn isin(&self) -> &str {
        &self.snapshot.isin
    }
}

/// A snapshot that could not be valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInstrument {
    /// ISIN of the skipped snapshot.
    pub isin: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Skip counts for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipStats {
    /// Total skipped snapshots.
    pub total: usize,
    /// Count per reason category.
    pub by_kind: BTreeMap<SkipKind, usize>,
    /// Count per missing field name.
    pub missing_fields: BTreeMap<&'static str, usize>,
}

impl SkipStats {
    fn record(&mut self, reason: &SkipReason) {
        self.total += 1;
        *self.by_kind.entry(reason.kind()).or_default() += 1;
        if let SkipReason::MissingField(name) = reason {
            *self.missing_fields.entry(name).or_default() += 1;
        }
    }

    /// Number of skips in one category.
    #[must_use]
    pub fn count(&self, kind: SkipKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Evaluation date shared by every result.
    pub as_of: Date,
    /// Parameters shared by every result.
    pub params: CalculationParams,
    /// Calculable instruments, in input order.
    pub calculated: Vec<InstrumentWithMetrics>,
    /// Skipped instruments, in input order.
    pub skipped: Vec<SkippedInstrument>,
    /// Skip counts.
    pub stats: SkipStats,
}

impl BatchOutcome {
    /// Total input size.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.calculated.len() + self.skipped.len()
    }
}

/// Values every snapshot as of `today`.
///
/// Non-calculable snapshots are collected with their reason; they never
/// abort the run.
///
/// # Errors
///
/// Returns an error only if `params` are out of range.
pub fn calculate_batch(
    snapshots: &[InstrumentSnapshot],
    params: &CalculationParams,
    today: Date,
    config: &BatchConfig,
) -> AnalyticsResult<BatchOutcome> {
    params.check()?;

    let results = maybe_parallel_map(snapshots, config, |s| calculate(s, params, today));

    let mut calculated = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    let mut stats = SkipStats::default();

    for (snapshot, result) in snapshots.iter().zip(results) {
        match result {
            Ok(metrics) => calculated.push(InstrumentWithMetrics {
                snapshot: snapshot.clone(),
                metrics,
            }),
            Err(reason) => {
                debug!(isin = %snapshot.isin, %reason, "instrument skipped");
                stats.record(&reason);
                skipped.push(SkippedInstrument {
                    isin: snapshot.isin.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        as_of = %today,
        input = snapshots.len(),
        calculated = calculated.len(),
        skipped = stats.total,
        "batch calculated"
    );

    Ok(BatchOutcome {
        as_of: today,
        params: *params,
        calculated,
        skipped,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> Date {
        Date::from_ymd(2025, 3, 1).unwrap()
    }

    fn bond(isin: &str, days: i64) -> InstrumentSnapshot {
        InstrumentSnapshot::new(isin)
            .with_coupon(dec!(40), 182, 90)
            .with_face_value(dec!(1000))
            .with_price(dec!(980))
            .with_maturity_date(today().add_days(days))
    }

    #[test]
    fn test_batch_splits_and_counts() {
        let mut no_price = bond("C", 365);
        no_price.price = None;
        let universe = vec![
            bond("A", 365),
            bond("B", -10),
            no_price,
            bond("D", 90),
            bond("E", 365).with_price(dec!(0)),
        ];

        let outcome = calculate_batch(
            &universe,
            &CalculationParams::default(),
            today(),
            &BatchConfig::sequential(),
        )
        .unwrap();

        let isins: Vec<&str> = outcome.calculated.iter().map(|c| c.isin()).collect();
        assert_eq!(isins, vec!["A", "D"]);
        assert_eq!(outcome.input_count(), 5);
        assert_eq!(outcome.stats.total, 3);
        assert_eq!(outcome.stats.count(SkipKind::MaturityNotInFuture), 1);
        assert_eq!(outcome.stats.count(SkipKind::NonPositivePrice), 1);
        assert_eq!(outcome.stats.count(SkipKind::MissingField), 1);
        assert_eq!(outcome.stats.missing_fields.get("price"), Some(&1));
        assert_eq!(outcome.skipped[0].isin, "B");
    }

    #[test]
    fn test_overflow_skips_one_instrument() {
        let universe = vec![
            bond("A", 365),
            bond("HUGE", 365).with_price(Decimal::MAX),
            bond("B", 180),
        ];

        let outcome = calculate_batch(
            &universe,
            &CalculationParams::default(),
            today(),
            &BatchConfig::sequential(),
        )
        .unwrap();

        let isins: Vec<&str> = outcome.calculated.iter().map(|c| c.isin()).collect();
        assert_eq!(isins, vec!["A", "B"]);
        assert_eq!(outcome.stats.count(SkipKind::ArithmeticOverflow), 1);
        assert_eq!(outcome.skipped[0].reason, SkipReason::ArithmeticOverflow);
    }

    #[test]
    fn test_invalid_params_abort() {
        let params = CalculationParams::new(dec!(0.3), dec!(101));
        assert!(calculate_batch(&[bond("A", 365)], &params, today(), &BatchConfig::default())
            .is_err());
    }

    #[test]
    fn test_empty_batch() {
        let outcome = calculate_batch(
            &[],
            &CalculationParams::default(),
            today(),
            &BatchConfig::default(),
        )
        .unwrap();
        assert!(outcome.calculated.is_empty());
        assert_eq!(outcome.stats, SkipStats::default());
    }

    #[test]
    fn test_parallel_threshold_matches_sequential() {
        let universe: Vec<_> = (0..50)
            .map(|i| bond(&format!("RU{i:04}"), 30 + i * 7))
            .collect();
        let params = CalculationParams::default();

        let seq = calculate_batch(&universe, &params, today(), &BatchConfig::sequential()).unwrap();
        let par = calculate_batch(
            &universe,
            &params,
            today(),
            &BatchConfig::default().with_threshold(1),
        )
        .unwrap();

        assert_eq!(seq, par);
    }

    #[test]
    fn test_maybe_parallel_map_keeps_order() {
        let items: Vec<u32> = (0..200).collect();
        let doubled = maybe_parallel_map(&items, &BatchConfig::default().with_threshold(10), |x| {
            x * 2
        });
        assert_eq!(doubled, items.iter().map(|x| x * 2).collect::<Vec<_>>());
    }
}
