//! # Bondrank Ext File
//!
//! File-based instrument feeds for the Bondrank engine.
//!
//! Upstream data arrives split across feeds (exchange reference data,
//! broker prices, rating scrapes). This crate reads each feed as partial
//! [`SnapshotRecord`]s and merges them into one
//! [`bondrank_core::InstrumentSnapshot`] per ISIN:
//! - CSV feeds: header row, snake_case columns, empty cell = absent
//! - JSON feeds: an array of objects
//!
//! Feeds are merged in the order given; a later feed's present value
//! overrides an earlier one and an absent value never erases.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod merge;
mod record;
mod source;

pub use error::{ExtError, ExtResult};
pub use merge::{merge_feeds, merge_records, SnapshotBook};
pub use record::SnapshotRecord;
pub use source::{source_for_path, CsvSnapshotSource, JsonSnapshotSource, SnapshotSource};

use std::path::Path;

use bondrank_core::InstrumentSnapshot;

/// Loads and merges the files at `paths`, picking each reader by extension.
///
/// # Errors
///
/// Fails on an unsupported extension or the first feed that cannot be read.
pub fn load_snapshots<P: AsRef<Path>>(paths: &[P]) -> ExtResult<Vec<InstrumentSnapshot>> {
    let sources = paths
        .iter()
        .map(|p| source_for_path(p))
        .collect::<ExtResult<Vec<_>>>()?;
    merge_feeds(&sources)
}
