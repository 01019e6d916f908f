//! Domain types for bond valuation and ranking.
//!
//! - [`Date`]: Calendar date used for maturity, offer and evaluation dates
//! - [`InstrumentSnapshot`]: Raw, merged reference data for one bond
//! - [`CreditRating`]: Agency-agnostic ordinal rating scale
//! - [`Precision`]: Decimal scales and round-half-up rounding
//! - [`CalculationParams`]: Fee rate, tax rate and precision for one run

mod date;
mod params;
mod precision;
mod rating;
mod snapshot;

pub use date::Date;
pub use params::CalculationParams;
pub use precision::{round_half_up, Precision, MAX_SCALE};
pub use rating::{CreditRating, RatingBucket};
pub use snapshot::InstrumentSnapshot;
