//! Error types for the analytics crate.
//!
//! Skipped instruments are not errors; see [`crate::metrics::SkipReason`].

use thiserror::Error;

use bondrank_core::CoreError;

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors that abort a whole calculation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Fee rate, tax rate or precision out of range.
    #[error("Invalid calculation parameters: {0}")]
    InvalidParams(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: AnalyticsError = CoreError::invalid_value("tax_rate_pct", "too high").into();
        assert_eq!(
            err.to_string(),
            "Invalid calculation parameters: Invalid tax_rate_pct: too high"
        );
    }
}
