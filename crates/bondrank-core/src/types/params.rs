//! Parameters for one metrics evaluation run.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::Precision;
use crate::error::{CoreError, CoreResult};

/// Fee rate, tax rate and precision applied to every instrument in a run.
///
/// Rates are percentages (`0.3` means 0.3%), matching how brokers quote
/// commissions and how the flat income tax is usually stated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationParams {
    /// Broker fee as a percentage of the pre-fee cost.
    pub fee_rate_pct: Decimal,
    /// Flat tax rate on positive profit, in percent.
    pub tax_rate_pct: Decimal,
    /// Rounding scales.
    pub precision: Precision,
}

impl Default for CalculationParams {
    fn default() -> Self {
        Self {
            fee_rate_pct: dec!(0.3),
            tax_rate_pct: dec!(13),
            precision: Precision::default(),
        }
    }
}

impl CalculationParams {
    /// Creates parameters with the default precision.
    #[must_use]
    pub fn new(fee_rate_pct: Decimal, tax_rate_pct: Decimal) -> Self {
        Self {
            fee_rate_pct,
            tax_rate_pct,
            precision: Precision::default(),
        }
    }

    /// Returns a copy with a different fee rate; tax and precision unchanged.
    #[must_use]
    pub fn with_fee_rate(mut self, fee_rate_pct: Decimal) -> Self {
        self.fee_rate_pct = fee_rate_pct;
        self
    }

    /// Returns a copy with a different tax rate.
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate_pct: Decimal) -> Self {
        self.tax_rate_pct = tax_rate_pct;
        self
    }

    /// Returns a copy with different rounding scales.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Checks that rates are in range and the precision is representable.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` naming the first offending field.
    pub fn check(&self) -> CoreResult<()> {
        if self.fee_rate_pct < Decimal::ZERO {
            return Err(CoreError::invalid_value(
                "fee_rate_pct",
                format!("{} must not be negative", self.fee_rate_pct),
            ));
        }
        if self.tax_rate_pct < Decimal::ZERO || self.tax_rate_pct > Decimal::ONE_HUNDRED {
            return Err(CoreError::invalid_value(
                "tax_rate_pct",
                format!("{} must be between 0 and 100", self.tax_rate_pct),
            ));
        }
        self.precision.check()
    }
}
