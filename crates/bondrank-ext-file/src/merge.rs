//! Folding several feeds into one snapshot per ISIN.

use std::collections::HashMap;

use tracing::info;

use bondrank_core::InstrumentSnapshot;

use crate::error::ExtResult;
use crate::record::SnapshotRecord;
use crate::source::SnapshotSource;

/// Merges records in order.
///
/// A later present value overrides an earlier one; absent values never
/// erase. Output keeps the order in which ISINs first appeared.
pub fn merge_records<I>(source_name: &str, records: I, into: &mut SnapshotBook) -> ExtResult<()>
where
    I: IntoIterator<Item = SnapshotRecord>,
{
    for (i, record) in records.into_iter().enumerate() {
        let isin = record.require_isin(source_name, i + 1)?;
        let slot = match into.index.get(&isin) {
            Some(&pos) => pos,
            None => {
                into.index.insert(isin.clone(), into.snapshots.len());
                into.snapshots.push(InstrumentSnapshot::new(isin));
                into.snapshots.len() - 1
            }
        };
        record.apply_to(&mut into.snapshots[slot]);
    }
    Ok(())
}

/// Snapshots accumulated from feeds, keyed by ISIN.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBook {
    snapshots: Vec<InstrumentSnapshot>,
    index: HashMap<String, usize>,
}

impl SnapshotBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up one snapshot.
    #[must_use]
    pub fn get(&self, isin: &str) -> Option<&InstrumentSnapshot> {
        self.index.get(isin).map(|&pos| &self.snapshots[pos])
    }

    /// Number of distinct ISINs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True if nothing was merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The merged snapshots in first-seen order.
    #[must_use]
    pub fn into_snapshots(self) -> Vec<InstrumentSnapshot> {
        self.snapshots
    }
}

/// Loads every source in order and merges them.
///
/// # Errors
///
/// Stops at the first feed that fails to load, naming it.
pub fn merge_feeds<S>(sources: &[S]) -> ExtResult<Vec<InstrumentSnapshot>>
where
    S: AsRef<dyn SnapshotSource + Send + Sync>,
{
    let mut book = SnapshotBook::new();
    for source in sources {
        let source = source.as_ref();
        let records = source.load()?;
        let count = records.len();
        merge_records(source.name(), records, &mut book)?;
        info!(source = source.name(), records = count, instruments = book.len(), "feed merged");
    }
    Ok(book.into_snapshots())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtError;
    use rust_decimal_macros::dec;

    fn record(isin: &str) -> SnapshotRecord {
        SnapshotRecord {
            isin: Some(isin.to_string()),
            ..SnapshotRecord::default()
        }
    }

    #[test]
    fn test_later_present_value_wins() {
        let mut book = SnapshotBook::new();
        let first = SnapshotRecord {
            price: Some(dec!(980)),
            face_value: Some(dec!(1000)),
            ..record("RU1")
        };
        let second = SnapshotRecord {
            price: Some(dec!(990)),
            ..record("RU1")
        };

        merge_records("a", [first], &mut book).unwrap();
        merge_records("b", [second], &mut book).unwrap();

        let snapshot = book.get("RU1").unwrap();
        assert_eq!(snapshot.price, Some(dec!(990)));
        assert_eq!(snapshot.face_value, Some(dec!(1000)));
    }

    #[test]
    fn test_first_seen_order() {
        let mut book = SnapshotBook::new();
        merge_records("a", [record("B"), record("A")], &mut book).unwrap();
        merge_records("b", [record("C"), record("B")], &mut book).unwrap();

        let isins: Vec<String> = book.into_snapshots().into_iter().map(|s| s.isin).collect();
        assert_eq!(isins, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_isin_less_record_rejected() {
        let mut book = SnapshotBook::new();
        let err = merge_records("feed", [record("A"), SnapshotRecord::default()], &mut book)
            .unwrap_err();
        assert_eq!(
            err,
            ExtError::MissingIsin {
                source_name: "feed".to_string(),
                row: 2
            }
        );
    }
}
