//! # Bondrank Analytics
//!
//! The metrics calculator: turns an [`InstrumentSnapshot`] into a
//! [`MetricsResult`] (daily coupon, accrued interest, fee, total cost,
//! projected coupon income, gross/net profit and annual yield), once for
//! the maturity date and, when an offer is pending, once more for the
//! offer date.
//!
//! ## Architecture
//!
//! - [`metrics`]: the pure per-instrument calculation and [`SkipReason`]
//! - [`batch`]: maps a universe of snapshots through the calculator,
//!   optionally in parallel, and counts skips
//! - [`store`]: holds the last published batch and swaps it atomically
//!
//! ## Usage
//!
//! ```rust
//! use bondrank_analytics::prelude::*;
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
//! let params = CalculationParams::new(dec!(0.3), dec!(13));
//! let metrics = calculate(&snapshot, &params, today).unwrap();
//! assert_eq!(metrics.total_cost, dec!(1003.0000));
//! assert_eq!(metrics.annual_yield, dec!(8.4138));
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: rayon-backed batch calculation above a size threshold

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod error;
pub mod metrics;
pub mod store;

pub use batch::{
    calculate_batch, maybe_parallel_map, BatchOutcome, InstrumentWithMetrics, SkipStats,
    SkippedInstrument,
};
pub use error::{AnalyticsError, AnalyticsResult};
pub use metrics::{
    annualized_yield, calculate, MetricsCalculator, MetricsResult, OfferMetrics, SkipKind,
    SkipReason,
};
pub use store::{MetricsBook, MetricsStore};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{calculate_batch, BatchOutcome, InstrumentWithMetrics, SkipStats};
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::metrics::{
        calculate, MetricsCalculator, MetricsResult, OfferMetrics, SkipKind, SkipReason,
    };
    pub use crate::store::{MetricsBook, MetricsStore};
}
