//! Error types for file feeds.

use thiserror::Error;

/// Result type for file feed operations.
pub type ExtResult<T> = Result<T, ExtError>;

/// Errors raised while reading a feed.
///
/// Every variant names the feed it came from; row numbers count data rows
/// from 1, header excluded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtError {
    /// The file could not be opened or read.
    #[error("{source_name}: {message}")]
    Io {
        /// Feed name (usually the file path).
        source_name: String,
        /// Underlying error text.
        message: String,
    },

    /// A row or document could not be parsed.
    #[error("{source_name}: row {row}: {message}")]
    Parse {
        /// Feed name.
        source_name: String,
        /// 1-based data row; 0 for document-level errors.
        row: usize,
        /// What failed.
        message: String,
    },

    /// A row has no ISIN.
    #[error("{source_name}: row {row}: missing isin")]
    MissingIsin {
        /// Feed name.
        source_name: String,
        /// 1-based data row.
        row: usize,
    },

    /// The file extension is not `.csv` or `.json`.
    #[error("Unsupported feed format: {0}")]
    UnsupportedFormat(String),
}

impl ExtError {
    pub(crate) fn io(source_name: &str, err: impl std::fmt::Display) -> Self {
        Self::Io {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(source_name: &str, row: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.to_string(),
            row,
            message: message.into(),
        }
    }
}
