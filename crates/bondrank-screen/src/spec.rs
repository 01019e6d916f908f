//! Per-query filter specification.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bondrank_config::ScreenDefaults;
use bondrank_core::Date;

use crate::error::{ScreenError, ScreenResult};

/// Constraints and options for one ranking query.
///
/// Bounds are inclusive. Build one from configured defaults and override
/// what the caller supplied:
///
/// ```rust
/// use bondrank_config::ScreenDefaults;
/// use bondrank_screen::FilterSpec;
/// use rust_decimal_macros::dec;
///
/// let spec = FilterSpec::from_defaults(&ScreenDefaults::default())
///     .with_yield_band(dec!(10), dec!(25))
///     .with_rating_whitelist(["ruAA", "ruA+"])
///     .with_limit(Some(5));
/// assert!(spec.validate().is_ok());
///
/// let bad = spec.with_yield_band(dec!(5), dec!(4));
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Earliest accepted target date, in weeks from today.
    pub min_maturity_weeks: u32,
    /// Latest accepted target date, in weeks from today.
    pub max_maturity_weeks: u32,
    /// Lowest accepted effective yield, percent.
    pub min_yield: Decimal,
    /// Highest accepted effective yield, percent.
    pub max_yield: Decimal,
    /// Rank by the offer branch when an offer is pending.
    pub prefer_offer_yield: bool,
    /// Fee rate to recompute metrics with before filtering, percent.
    #[serde(default)]
    pub custom_fee_rate: Option<Decimal>,
    /// Accepted rating labels; empty accepts everything.
    #[serde(default)]
    pub rating_whitelist: BTreeSet<String>,
    /// Case-insensitive substring of ticker or short name.
    #[serde(default)]
    pub text_filter: Option<String>,
    /// Result size cap; `None` returns everything that matched.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::from_defaults(&ScreenDefaults::default())
    }
}

impl FilterSpec {
    /// A spec carrying the configured defaults and no optional filters.
    #[must_use]
    pub fn from_defaults(defaults: &ScreenDefaults) -> Self {
        Self {
            min_maturity_weeks: defaults.min_maturity_weeks,
            max_maturity_weeks: defaults.max_maturity_weeks,
            min_yield: defaults.min_yield,
            max_yield: defaults.max_yield,
            prefer_offer_yield: defaults.prefer_offer_yield,
            custom_fee_rate: None,
            rating_whitelist: BTreeSet::new(),
            text_filter: None,
            limit: defaults.limit,
        }
    }

    /// Sets the maturity window in weeks.
    #[must_use]
    pub fn with_maturity_weeks(mut self, min: u32, max: u32) -> Self {
        self.min_maturity_weeks = min;
        self.max_maturity_weeks = max;
        self
    }

    /// Sets the yield band in percent.
    #[must_use]
    pub fn with_yield_band(mut self, min: Decimal, max: Decimal) -> Self {
        self.min_yield = min;
        self.max_yield = max;
        self
    }

    /// Sets offer-yield preference.
    #[must_use]
    pub fn with_prefer_offer(mut self, prefer: bool) -> Self {
        self.prefer_offer_yield = prefer;
        self
    }

    /// Sets the fee override.
    #[must_use]
    pub fn with_custom_fee_rate(mut self, fee_rate_pct: Decimal) -> Self {
        self.custom_fee_rate = Some(fee_rate_pct);
        self
    }

    /// Sets the rating whitelist.
    #[must_use]
    pub fn with_rating_whitelist<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rating_whitelist = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the text filter.
    #[must_use]
    pub fn with_text_filter(mut self, text: impl Into<String>) -> Self {
        self.text_filter = Some(text.into());
        self
    }

    /// Sets the result cap.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Rejects contradictory or out-of-range fields.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidSpec`] naming the first offending field.
    pub fn validate(&self) -> ScreenResult<()> {
        if self.min_maturity_weeks > self.max_maturity_weeks {
            return Err(ScreenError::invalid_spec(
                "min_maturity_weeks",
                format!(
                    "{} exceeds max_maturity_weeks {}",
                    self.min_maturity_weeks, self.max_maturity_weeks
                ),
            ));
        }
        if self.min_yield > self.max_yield {
            return Err(ScreenError::invalid_spec(
                "min_yield",
                format!("{} exceeds max_yield {}", self.min_yield, self.max_yield),
            ));
        }
        if let Some(fee) = self.custom_fee_rate {
            if fee < Decimal::ZERO {
                return Err(ScreenError::invalid_spec(
                    "custom_fee_rate",
                    format!("{fee} must not be negative"),
                ));
            }
        }
        if self.limit == Some(0) {
            return Err(ScreenError::invalid_spec("limit", "must be positive"));
        }
        Ok(())
    }

    /// Inclusive date window for the effective target date.
    ///
    /// Bounds beyond the calendar range clamp to the latest representable
    /// date, so `u32::MAX` weeks acts as "no upper bound".
    #[must_use]
    pub fn target_window(&self, today: Date) -> (Date, Date) {
        (
            today.saturating_add_weeks(self.min_maturity_weeks),
            today.saturating_add_weeks(self.max_maturity_weeks),
        )
    }

    /// Lowercased needle, or `None` if the filter is unset or blank.
    pub(crate) fn text_needle(&self) -> Option<String> {
        self.text_filter
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Normalized whitelist labels (trimmed, lowercased).
    pub(crate) fn normalized_whitelist(&self) -> BTreeSet<String> {
        self.rating_whitelist
            .iter()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect()
    }
}
