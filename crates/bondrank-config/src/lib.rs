//! Bondrank Configuration Layer
//!
//! Everything the engine consumes from its caller: fee rate, tax rate,
//! calculation precision, default screening bounds and batch parallelism.
//! Nothing here is hard-coded into the calculation itself.
//!
//! # Example
//!
//! ```rust
//! use bondrank_config::{EngineConfig, Validate};
//! use rust_decimal_macros::dec;
//!
//! let config = EngineConfig::default();
//! assert!(config.is_valid());
//! assert_eq!(config.fee_rate_pct, dec!(0.3));
//!
//! let toml = r#"
//!     fee_rate_pct = 0.05
//!     [screen]
//!     max_maturity_weeks = 104
//! "#;
//! let config = EngineConfig::from_toml_str(toml).unwrap();
//! assert_eq!(config.screen.max_maturity_weeks, 104);
//! assert_eq!(config.tax_rate_pct, dec!(13));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod engine;
mod error;

pub use engine::{BatchConfig, EngineConfig, ScreenDefaults};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{BatchConfig, EngineConfig, ScreenDefaults};
    pub use crate::error::{ConfigError, ConfigResult, Validate};
}
