//! Error types for the screening crate.

use thiserror::Error;

use bondrank_analytics::AnalyticsError;

/// Result type for screening operations.
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Errors raised by [`crate::rank`].
///
/// An empty ranking is not an error; these mean the query itself was malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// A filter field is out of range or contradicts another.
    #[error("Invalid filter spec: {field}: {reason}")]
    InvalidSpec {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Calculation parameters used for a fee override are out of range.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl ScreenError {
    /// Creates an invalid spec error.
    pub fn invalid_spec(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScreenError::invalid_spec("min_yield", "5 exceeds max_yield 4");
        assert_eq!(
            err.to_string(),
            "Invalid filter spec: min_yield: 5 exceeds max_yield 4"
        );
    }
}
