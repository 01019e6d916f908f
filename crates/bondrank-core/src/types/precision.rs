//! Fixed-scale decimal rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Largest scale `rust_decimal` can represent.
pub const MAX_SCALE: u32 = 28;

/// Decimal scales used by the metrics calculation.
///
/// All rounding is round-half-up (midpoint away from zero):
///
/// - `working_scale`: every division result and the daily coupon
/// - `money_scale`: stored currency amounts (accrued interest, fee, cost, profits)
/// - `yield_scale`: the final annual yield percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    /// Scale for intermediate quotients.
    #[serde(default = "default_working_scale")]
    pub working_scale: u32,

    /// Scale for stored currency amounts.
    #[serde(default = "default_money_scale")]
    pub money_scale: u32,

    /// Scale for yields in percent.
    #[serde(default = "default_yield_scale")]
    pub yield_scale: u32,
}

fn default_working_scale() -> u32 {
    10
}

fn default_money_scale() -> u32 {
    4
}

fn default_yield_scale() -> u32 {
    4
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            working_scale: default_working_scale(),
            money_scale: default_money_scale(),
            yield_scale: default_yield_scale(),
        }
    }
}

impl Precision {
    /// Creates a precision with explicit scales.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` if any scale exceeds [`MAX_SCALE`] or
    /// the money/yield scale is finer than the working scale.
    pub fn new(working_scale: u32, money_scale: u32, yield_scale: u32) -> CoreResult<Self> {
        let precision = Self {
            working_scale,
            money_scale,
            yield_scale,
        };
        precision.check()?;
        Ok(precision)
    }

    /// Checks the scale invariants.
    ///
    /// # Errors
    ///
    /// See [`Precision::new`].
    pub fn check(&self) -> CoreResult<()> {
        for (field, scale) in [
            ("working_scale", self.working_scale),
            ("money_scale", self.money_scale),
            ("yield_scale", self.yield_scale),
        ] {
            if scale > MAX_SCALE {
                return Err(CoreError::invalid_value(
                    field,
                    format!("{scale} exceeds the maximum scale of {MAX_SCALE}"),
                ));
            }
        }
        if self.money_scale > self.working_scale {
            return Err(CoreError::invalid_value(
                "money_scale",
                "must not exceed working_scale",
            ));
        }
        if self.yield_scale > self.working_scale {
            return Err(CoreError::invalid_value(
                "yield_scale",
                "must not exceed working_scale",
            ));
        }
        Ok(())
    }

    /// Rounds to the working scale.
    #[must_use]
    pub fn working(&self, value: Decimal) -> Decimal {
        round_half_up(value, self.working_scale)
    }

    /// Rounds to the money scale.
    #[must_use]
    pub fn money(&self, value: Decimal) -> Decimal {
        round_half_up(value, self.money_scale)
    }

    /// Rounds to the yield scale.
    #[must_use]
    pub fn yield_pct(&self, value: Decimal) -> Decimal {
        round_half_up(value, self.yield_scale)
    }

    /// Divides and rounds the quotient to the working scale.
    ///
    /// Returns `None` when the divisor is zero.
    #[must_use]
    pub fn div(&self, numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
        numerator
            .checked_div(denominator)
            .map(|quotient| self.working(quotient))
    }
}

/// Rounds half away from zero at `scale` decimal places.
#[must_use]
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_scales() {
        let p = Precision::default();
        assert_eq!(p.working_scale, 10);
        assert_eq!(p.money_scale, 4);
        assert_eq!(p.yield_scale, 4);
        assert!(p.check().is_ok());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(dec!(1.23445), 4), dec!(1.2345));
        assert_eq!(round_half_up(dec!(1.23444), 4), dec!(1.2344));
        assert_eq!(round_half_up(dec!(-1.23445), 4), dec!(-1.2345));
        assert_eq!(round_half_up(dec!(2.5), 0), dec!(3));
    }

    #[test]
    fn test_div_rounds_to_working_scale() {
        let p = Precision::default();
        assert_eq!(p.div(dec!(40), dec!(182)), Some(dec!(0.2197802198)));
        assert_eq!(p.div(dec!(2), dec!(3)), Some(dec!(0.6666666667)));
        assert_eq!(p.div(dec!(1), Decimal::ZERO), None);
    }

    #[test]
    fn test_invalid_scales() {
        assert!(Precision::new(29, 4, 4).is_err());
        assert!(Precision::new(10, 12, 4).is_err());
        assert!(Precision::new(10, 4, 11).is_err());
        assert!(Precision::new(12, 2, 2).is_ok());
    }

    #[test]
    fn test_serde_fills_defaults() {
        let p: Precision = serde_json::from_str(r#"{"yield_scale": 2}"#).unwrap();
        assert_eq!(p.working_scale, 10);
        assert_eq!(p.money_scale, 4);
        assert_eq!(p.yield_scale, 2);
    }

    proptest::proptest! {
        #[test]
        fn test_money_rounding_bounded(mantissa in -10_000_000_000i64..10_000_000_000, scale in 0u32..10) {
            let value = Decimal::new(mantissa, scale);
            let rounded = Precision::default().money(value);
            proptest::prop_assert!(rounded.scale() <= 4);
            proptest::prop_assert!((rounded - value).abs() <= dec!(0.00005));
        }
    }
}
