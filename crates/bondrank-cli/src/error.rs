//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command-line overrides produced invalid calculation parameters.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
