//! Per-instrument valuation metrics.
//!
//! # Formula
//!
//! ```text
//! daily_coupon      = coupon_value / coupon_length_days
//! accrued_interest  = daily_coupon × (coupon_days_passed + 1)
//! fee               = (price + accrued_interest) × fee_rate / 100
//! total_cost        = price + accrued_interest + fee
//! income(T)         = daily_coupon × (days_to_T − 1) + accrued_interest
//! gross_profit(T)   = face_value + income(T) − total_cost
//! net_profit(T)     = gross_profit(T) × (1 − tax_rate / 100)   if gross_profit(T) > 0
//! annual_yield(T)   = net_profit(T) / total_cost × 365 / days_to_T × 100
//! ```
//!
//! The `+1` counts the settlement day as accruing; the `−1` keeps that day
//! from being counted twice in the projected income. With `days_to_T == 1`
//! the projected income is exactly the accrued interest.
//!
//! Every quotient is rounded half-up to the working scale; stored currency
//! amounts are rounded to the money scale and later steps consume the
//! rounded values, so `total_cost == price + accrued_interest + fee` exactly.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bondrank_core::{CalculationParams, Date, InstrumentSnapshot, Precision};

use crate::error::AnalyticsResult;

const DAYS_PER_YEAR: i64 = 365;

// ============================================================================
// Results
// ============================================================================

/// Derived metrics for one instrument, evaluated on `as_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Evaluation date.
    pub as_of: Date,
    /// Fee rate the cost figures were computed with, percent.
    pub fee_rate_pct: Decimal,
    /// Coupon accrual per day (working scale).
    pub daily_coupon: Decimal,
    /// Accrued coupon interest (NKD) owed to the seller.
    pub accrued_interest: Decimal,
    /// Broker fee.
    pub fee: Decimal,
    /// Price plus accrued interest plus fee.
    pub total_cost: Decimal,
    /// Calendar days from `as_of` to maturity (always positive).
    pub days_to_maturity: i64,
    /// Coupon income expected up to maturity, accrued interest included.
    pub projected_coupon_income_to_maturity: Decimal,
    /// Profit at maturity before tax.
    pub gross_profit: Decimal,
    /// Profit at maturity after tax.
    pub net_profit: Decimal,
    /// Annualized net return on total cost, percent.
    pub annual_yield: Decimal,
    /// Offer-date branch; present only while the offer date is in the future.
    pub offer: Option<OfferMetrics>,
}

/// The offer-date mirror of the maturity figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferMetrics {
    /// Offer date the figures are computed for.
    pub offer_date: Date,
    /// Calendar days from `as_of` to the offer date (always positive).
    pub days_to_offer: i64,
    /// Coupon income expected up to the offer date.
    pub projected_coupon_income_to_offer: Decimal,
    /// Profit at the offer date before tax.
    pub gross_profit_offer: Decimal,
    /// Profit at the offer date after tax.
    pub net_profit_offer: Decimal,
    /// Annualized net return to the offer date, percent.
    pub annual_yield_offer: Decimal,
}

impl MetricsResult {
    /// Offer-date annual yield, if the offer branch exists.
    #[must_use]
    pub fn annual_yield_offer(&self) -> Option<Decimal> {
        self.offer.as_ref().map(|o| o.annual_yield_offer)
    }

    /// Offer-date net profit, if the offer branch exists.
    #[must_use]
    pub fn net_profit_offer(&self) -> Option<Decimal> {
        self.offer.as_ref().map(|o| o.net_profit_offer)
    }
}

// ============================================================================
// Skip reasons
// ============================================================================

/// Why a snapshot could not be valued.
///
/// These are expected outcomes, counted by the batch runner; they never
/// abort a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    /// A required input is absent.
    MissingField(&'static str),
    /// Price is zero or negative.
    NonPositivePrice,
    /// Maturity date is today or earlier.
    MaturityNotInFuture,
    /// Coupon period length is zero.
    InvalidCouponLength,
    /// An intermediate amount does not fit in a decimal.
    ArithmeticOverflow,
}

/// Reason category used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkipKind {
    /// See [`SkipReason::MissingField`].
    MissingField,
    /// See [`SkipReason::NonPositivePrice`].
    NonPositivePrice,
    /// See [`SkipReason::MaturityNotInFuture`].
    MaturityNotInFuture,
    /// See [`SkipReason::InvalidCouponLength`].
    InvalidCouponLength,
    /// See [`SkipReason::ArithmeticOverflow`].
    ArithmeticOverflow,
}

impl SkipReason {
    /// The reason's category.
    #[must_use]
    pub fn kind(&self) -> SkipKind {
        match self {
            Self::MissingField(_) => SkipKind::MissingField,
            Self::NonPositivePrice => SkipKind::NonPositivePrice,
            Self::MaturityNotInFuture => SkipKind::MaturityNotInFuture,
            Self::InvalidCouponLength => SkipKind::InvalidCouponLength,
            Self::ArithmeticOverflow => SkipKind::ArithmeticOverflow,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "missing field '{name}'"),
            Self::NonPositivePrice => write!(f, "price is not positive"),
            Self::MaturityNotInFuture => write!(f, "maturity date is not in the future"),
            Self::InvalidCouponLength => write!(f, "coupon length is zero"),
            Self::ArithmeticOverflow => write!(f, "amounts overflow decimal range"),
        }
    }
}

impl fmt::Display for SkipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingField => "missing_field",
            Self::NonPositivePrice => "non_positive_price",
            Self::MaturityNotInFuture => "maturity_not_in_future",
            Self::InvalidCouponLength => "invalid_coupon_length",
            Self::ArithmeticOverflow => "arithmetic_overflow",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Inputs that passed validation.
struct Inputs {
    coupon_value: Decimal,
    coupon_length_days: u32,
    coupon_days_passed: u32,
    face_value: Decimal,
    maturity_date: Date,
    price: Decimal,
}

fn require<T: Copy>(value: Option<T>, name: &'static str) -> Result<T, SkipReason> {
    value.ok_or(SkipReason::MissingField(name))
}

fn validate(snapshot: &InstrumentSnapshot, today: Date) -> Result<Inputs, SkipReason> {
    let inputs = Inputs {
        price: require(snapshot.price, "price")?,
        face_value: require(snapshot.face_value, "face_value")?,
        coupon_value: require(snapshot.coupon_value, "coupon_value")?,
        maturity_date: require(snapshot.maturity_date, "maturity_date")?,
        coupon_length_days: require(snapshot.coupon_length_days, "coupon_length_days")?,
        coupon_days_passed: require(snapshot.coupon_days_passed, "coupon_days_passed")?,
    };

    if inputs.price <= Decimal::ZERO {
        return Err(SkipReason::NonPositivePrice);
    }
    if inputs.coupon_length_days == 0 {
        return Err(SkipReason::InvalidCouponLength);
    }
    if today.days_between(&inputs.maturity_date) <= 0 {
        return Err(SkipReason::MaturityNotInFuture);
    }
    Ok(inputs)
}

/// Cost basis shared by the maturity and offer branches.
struct CostBasis {
    daily_coupon: Decimal,
    accrued_interest: Decimal,
    fee: Decimal,
    total_cost: Decimal,
}

struct Branch {
    income: Decimal,
    gross_profit: Decimal,
    net_profit: Decimal,
    annual_yield: Decimal,
}

fn fits(value: Option<Decimal>) -> Result<Decimal, SkipReason> {
    value.ok_or(SkipReason::ArithmeticOverflow)
}

fn cost_basis(inputs: &Inputs, params: &CalculationParams) -> Result<CostBasis, SkipReason> {
    let p = &params.precision;

    let daily_coupon = fits(p.div(inputs.coupon_value, Decimal::from(inputs.coupon_length_days)))?;
    let accrued_days = Decimal::from(u64::from(inputs.coupon_days_passed) + 1);
    let accrued_interest = p.money(fits(daily_coupon.checked_mul(accrued_days))?);
    let pre_fee_cost = fits(inputs.price.checked_add(accrued_interest))?;
    let fee = p.money(fits(pre_fee_cost.checked_mul(percent(p, params.fee_rate_pct)?))?);
    let total_cost = fits(pre_fee_cost.checked_add(fee))?;

    Ok(CostBasis {
        daily_coupon,
        accrued_interest,
        fee,
        total_cost,
    })
}

/// Projects income and profit to a target `days` ahead. `Ok(None)` if
/// `days <= 0`.
fn branch(
    basis: &CostBasis,
    face_value: Decimal,
    days: i64,
    params: &CalculationParams,
) -> Result<Option<Branch>, SkipReason> {
    if days <= 0 {
        return Ok(None);
    }
    let p = &params.precision;

    let coupons_ahead = fits(basis.daily_coupon.checked_mul(Decimal::from(days - 1)))?;
    let income = p.money(fits(coupons_ahead.checked_add(basis.accrued_interest))?);
    let redemption = fits(face_value.checked_add(income))?;
    let gross_profit = p.money(fits(redemption.checked_sub(basis.total_cost))?);
    let net_profit = if gross_profit <= Decimal::ZERO {
        gross_profit
    } else {
        let kept = fits(Decimal::ONE.checked_sub(percent(p, params.tax_rate_pct)?))?;
        p.money(fits(gross_profit.checked_mul(kept))?)
    };
    let annual_yield = fits(checked_annualized_yield(net_profit, basis.total_cost, days, p))?;

    Ok(Some(Branch {
        income,
        gross_profit,
        net_profit,
        annual_yield,
    }))
}

fn percent(p: &Precision, rate_pct: Decimal) -> Result<Decimal, SkipReason> {
    fits(p.div(rate_pct, Decimal::ONE_HUNDRED))
}

/// Zero for the guarded cases, `None` if the quotient overflows.
fn checked_annualized_yield(
    net_profit: Decimal,
    total_cost: Decimal,
    days: i64,
    precision: &Precision,
) -> Option<Decimal> {
    if days <= 0 || total_cost.is_zero() {
        return Some(Decimal::ZERO);
    }
    let ratio = precision.div(net_profit, total_cost)?;
    let annualization = precision.div(Decimal::from(DAYS_PER_YEAR), Decimal::from(days))?;
    ratio
        .checked_mul(annualization)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|y| precision.yield_pct(y))
}

/// Annualized return on `total_cost`, in percent.
///
/// Returns zero when `total_cost` is zero or `days` is not positive; batch
/// runs rely on this instead of an error. A result outside the decimal range
/// is also reported as zero.
#[must_use]
pub fn annualized_yield(
    net_profit: Decimal,
    total_cost: Decimal,
    days: i64,
    precision: &Precision,
) -> Decimal {
    checked_annualized_yield(net_profit, total_cost, days, precision).unwrap_or(Decimal::ZERO)
}

/// Values one snapshot as of `today`.
///
/// The offer branch is computed iff `offer_date` is set and strictly after
/// `today`.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the snapshot is not calculable. Parameters
/// are assumed valid; use [`MetricsCalculator`] to have them checked.
pub fn calculate(
    snapshot: &InstrumentSnapshot,
    params: &CalculationParams,
    today: Date,
) -> Result<MetricsResult, SkipReason> {
    let inputs = validate(snapshot, today)?;
    let basis = cost_basis(&inputs, params)?;

    let days_to_maturity = today.days_between(&inputs.maturity_date);
    let maturity = branch(&basis, inputs.face_value, days_to_maturity, params)?
        .ok_or(SkipReason::MaturityNotInFuture)?;

    let offer = match snapshot.offer_date {
        Some(offer_date) => {
            let days_to_offer = today.days_between(&offer_date);
            branch(&basis, inputs.face_value, days_to_offer, params)?.map(|b| OfferMetrics {
                offer_date,
                days_to_offer,
                projected_coupon_income_to_offer: b.income,
                gross_profit_offer: b.gross_profit,
                net_profit_offer: b.net_profit,
                annual_yield_offer: b.annual_yield,
            })
        }
        None => None,
    };

    Ok(MetricsResult {
        as_of: today,
        fee_rate_pct: params.fee_rate_pct,
        daily_coupon: basis.daily_coupon,
        accrued_interest: basis.accrued_interest,
        fee: basis.fee,
        total_cost: basis.total_cost,
        days_to_maturity,
        projected_coupon_income_to_maturity: maturity.income,
        gross_profit: maturity.gross_profit,
        net_profit: maturity.net_profit,
        annual_yield: maturity.annual_yield,
        offer,
    })
}

/// A calculator bound to checked parameters.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCalculator {
    params: CalculationParams,
}

impl MetricsCalculator {
    /// Creates a calculator, checking rates and precision.
    pub fn new(params: CalculationParams) -> AnalyticsResult<Self> {
        params.check()?;
        Ok(Self { params })
    }

    /// The parameters in use.
    #[must_use]
    pub fn params(&self) -> &CalculationParams {
        &self.params
    }

    /// A calculator identical except for the fee rate.
    pub fn with_fee_rate(&self, fee_rate_pct: Decimal) -> AnalyticsResult<Self> {
        Self::new(self.params.with_fee_rate(fee_rate_pct))
    }

    /// Values one snapshot. See [`calculate`].
    pub fn calculate(
        &self,
        snapshot: &InstrumentSnapshot,
        today: Date,
    ) -> Result<MetricsResult, SkipReason> {
        calculate(snapshot, &self.params, today)
    }
}
