//! The published metrics book.
//!
//! Readers take an `Arc<MetricsBook>` and keep it for as long as they need;
//! writers build a new book and swap the pointer. A reader therefore sees
//! either the previous book or the next one, never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use bondrank_core::{CalculationParams, Date, InstrumentSnapshot};

use crate::batch::{BatchOutcome, InstrumentWithMetrics};
use crate::error::AnalyticsResult;
use crate::metrics::{calculate, SkipReason};

/// An immutable set of metrics, one record per ISIN.
#[derive(Debug, Clone, Default)]
pub struct MetricsBook {
    generation: u64,
    as_of: Option<Date>,
    records: Vec<InstrumentWithMetrics>,
    index: HashMap<String, usize>,
}

impl MetricsBook {
    fn from_records(
        generation: u64,
        as_of: Option<Date>,
        records: Vec<InstrumentWithMetrics>,
    ) -> Self {
        let mut book = Self {
            generation,
            as_of,
            records: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
        };
        for record in records {
            book.upsert(record);
        }
        book
    }

    fn upsert(&mut self, record: InstrumentWithMetrics) {
        match self.index.get(record.isin()) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(record.isin().to_string(), self.records.len());
                self.records.push(record);
            }
        }
    }

    fn remove(&mut self, isin: &str) -> bool {
        let Some(pos) = self.index.remove(isin) else {
            return false;
        };
        self.records.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        true
    }

    /// Publication counter; zero for the empty initial book.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Evaluation date of the last full batch, if any.
    #[must_use]
    pub fn as_of(&self) -> Option<Date> {
        self.as_of
    }

    /// All records, in publication order.
    #[must_use]
    pub fn records(&self) -> &[InstrumentWithMetrics] {
        &self.records
    }

    /// Looks up one instrument.
    #[must_use]
    pub fn get(&self, isin: &str) -> Option<&InstrumentWithMetrics> {
        self.index.get(isin).map(|&pos| &self.records[pos])
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the book holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shared holder of the current [`MetricsBook`].
#[derive(Debug, Default)]
pub struct MetricsStore {
    current: RwLock<Arc<MetricsBook>>,
}

impl MetricsStore {
    /// Creates a store holding an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The book readers should use right now.
    #[must_use]
    pub fn current(&self) -> Arc<MetricsBook> {
        Arc::clone(&*self.current.read())
    }

    /// Replaces the whole book with a batch outcome.
    ///
    /// A duplicate ISIN keeps the later record.
    pub fn publish(&self, outcome: BatchOutcome) -> Arc<MetricsBook> {
        let mut guard = self.current.write();
        let generation = guard.generation + 1;
        let count = outcome.calculated.len();

        let book = MetricsBook::from_records(generation, Some(outcome.as_of), outcome.calculated);
        if book.len() < count {
            warn!(
                duplicates = count - book.len(),
                "duplicate ISINs in batch, later records kept"
            );
        }

        let book = Arc::new(book);
        *guard = Arc::clone(&book);
        info!(generation, records = book.len(), as_of = %outcome.as_of, "metrics book published");
        book
    }

    /// Recomputes one instrument and publishes a book with that record replaced.
    ///
    /// If the snapshot is no longer calculable its record is removed and the
    /// skip reason is returned alongside the new book.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` are out of range; the book is untouched.
    pub fn recalculate(
        &self,
        snapshot: &InstrumentSnapshot,
        params: &CalculationParams,
        today: Date,
    ) -> AnalyticsResult<(Arc<MetricsBook>, Option<SkipReason>)> {
        params.check()?;
        let result = calculate(snapshot, params, today);

        let mut guard = self.current.write();
        let mut next = MetricsBook::clone(&**guard);
        next.generation += 1;

        let skip = match result {
            Ok(metrics) => {
                next.upsert(InstrumentWithMetrics {
                    snapshot: snapshot.clone(),
                    metrics,
                });
                None
            }
            Err(reason) => {
                let removed = next.remove(&snapshot.isin);
                debug!(isin = %snapshot.isin, %reason, removed, "recalculated instrument skipped");
                Some(reason)
            }
        };

        let book = Arc::new(next);
        *guard = Arc::clone(&book);
        Ok((book, skip))
    }
}
