//! # Bondrank Core
//!
//! Core types shared by every Bondrank crate.
//!
//! - **Types**: [`Date`], [`InstrumentSnapshot`], [`CreditRating`]
//! - **Precision**: fixed-scale, round-half-up decimal rounding via [`Precision`]
//! - **Parameters**: [`CalculationParams`] (fee rate, tax rate, precision)
//!
//! All currency and percentage quantities are `rust_decimal::Decimal`;
//! nothing in the engine touches binary floating point.
//!
//! ## Example
//!
//! ```rust
//! use bondrank_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let today = Date::from_ymd(2025, 3, 1).unwrap();
//! let snapshot = InstrumentSnapshot::new("RU000A0JX0J2")
//!     .with_coupon(dec!(40), 182, 90)
//!     .with_face_value(dec!(1000))
//!     .with_price(dec!(980))
//!     .with_maturity_date(today.add_days(365));
//!
//! assert!(snapshot.offer_date.is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        CalculationParams, CreditRating, Date, InstrumentSnapshot, Precision, RatingBucket,
    };
}

pub use error::{CoreError, CoreResult};
pub use types::{CalculationParams, CreditRating, Date, InstrumentSnapshot, Precision};
