//! Snapshot feeds backed by files.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ExtError, ExtResult};
use crate::record::{CsvRow, SnapshotRecord};

/// A feed of partial snapshot records.
pub trait SnapshotSource {
    /// Name used in errors and logs.
    fn name(&self) -> &str;

    /// Reads every record. Each returned record carries an ISIN.
    fn load(&self) -> ExtResult<Vec<SnapshotRecord>>;
}

// =============================================================================
// CSV SNAPSHOT SOURCE
// =============================================================================

/// CSV feed: header row, snake_case column names, empty cell = absent.
///
/// Only the `isin` column is required; other columns may be omitted.
#[derive(Debug, Clone)]
pub struct CsvSnapshotSource {
    file_path: PathBuf,
    name: String,
}

impl CsvSnapshotSource {
    /// Creates a source reading `file_path`.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let name = file_path.display().to_string();
        Self { file_path, name }
    }
}

impl SnapshotSource for CsvSnapshotSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ExtResult<Vec<SnapshotRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.file_path)
            .map_err(|e| ExtError::io(&self.name, e))?;

        let mut records = Vec::new();
        for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
            let row = i + 1;
            let raw = result.map_err(|e| ExtError::parse(&self.name, row, e.to_string()))?;
            let record = raw.into_record(&self.name, row)?;
            record.require_isin(&self.name, row)?;
            records.push(record);
        }

        debug!(source = %self.name, records = records.len(), "csv feed loaded");
        Ok(records)
    }
}

// =============================================================================
// JSON SNAPSHOT SOURCE
// =============================================================================

/// JSON feed: an array of objects with snake_case keys.
///
/// Decimal fields accept strings (exact) or numbers.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    file_path: PathBuf,
    name: String,
}

impl JsonSnapshotSource {
    /// Creates a source reading `file_path`.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let name = file_path.display().to_string();
        Self { file_path, name }
    }
}

impl SnapshotSource for JsonSnapshotSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ExtResult<Vec<SnapshotRecord>> {
        let content =
            std::fs::read_to_string(&self.file_path).map_err(|e| ExtError::io(&self.name, e))?;

        let values: Vec<serde_json::Value> =
            serde_json::from_str(&content).map_err(|e| ExtError::parse(&self.name, 0, e.to_string()))?;

        let mut records = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let row = i + 1;
            let record: SnapshotRecord = serde_json::from_value(value)
                .map_err(|e| ExtError::parse(&self.name, row, e.to_string()))?;
            record.require_isin(&self.name, row)?;
            records.push(record);
        }

        debug!(source = %self.name, records = records.len(), "json feed loaded");
        Ok(records)
    }
}

/// Picks a source by file extension (`.csv` or `.json`, any case).
pub fn source_for_path(path: impl AsRef<Path>) -> ExtResult<Box<dyn SnapshotSource + Send + Sync>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(Box::new(CsvSnapshotSource::new(path))),
        "json" => Ok(Box::new(JsonSnapshotSource::new(path))),
        _ => Err(ExtError::UnsupportedFormat(path.display().to_string())),
    }
}
