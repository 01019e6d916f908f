//! # Bondrank Screen
//!
//! The ranking and filter engine: takes instruments with computed metrics
//! and a [`FilterSpec`], and returns an ordered, size-bounded list.
//!
//! ## Ranking policy
//!
//! Rows are sorted by:
//!
//! 1. whole-percent effective yield, descending
//! 2. rating code, ascending (better credit first, unrated last)
//! 3. exact effective yield, descending
//!
//! so a marginally higher yield never lets a riskier bond displace a safer
//! one inside the same whole-percent bucket.
//!
//! ## Usage
//!
//! ```rust
//! use bondrank_analytics::calculate_batch;
//! use bondrank_config::BatchConfig;
//! use bondrank_core::prelude::*;
//! use bondrank_screen::{rank, FilterSpec};
//! use rust_decimal_macros::dec;
//!
//! let today = Date::from_ymd(2025, 3, 1).unwrap();
//! let bond = InstrumentSnapshot::new("RU000A0JX0J2")
//!     .with_coupon(dec!(40), 182, 90)
//!     .with_face_value(dec!(1000))
//!     .with_price(dec!(980))
//!     .with_maturity_date(today.add_days(365));
//!
//! let params = CalculationParams::default();
//! let outcome = calculate_batch(&[bond], &params, today, &BatchConfig::default()).unwrap();
//!
//! let spec = FilterSpec::default().with_yield_band(dec!(5), dec!(20));
//! let ranked = rank(&outcome.calculated, &spec, &params, today).unwrap();
//! assert_eq!(ranked[0].position, 1);
//! assert_eq!(ranked[0].effective_yield, dec!(8.4138));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod digest;
pub mod error;
pub mod rank;
pub mod spec;

pub use digest::RankingDigest;
pub use error::{ScreenError, ScreenResult};
pub use rank::{rank, Basis, RankedInstrument};
pub use spec::FilterSpec;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::digest::RankingDigest;
    pub use crate::error::{ScreenError, ScreenResult};
    pub use crate::rank::{rank, Basis, RankedInstrument};
    pub use crate::spec::FilterSpec;
}
