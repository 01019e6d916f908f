//! Engine configuration types.

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use bondrank_core::{CalculationParams, Precision};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// ENGINE CONFIGURATION
// =============================================================================

/// Top-level engine configuration.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Broker fee in percent of the pre-fee cost.
    #[serde(default = "default_fee_rate")]
    pub fee_rate_pct: Decimal,

    /// Flat tax on positive profit, in percent.
    #[serde(default = "default_tax_rate")]
    pub tax_rate_pct: Decimal,

    /// Rounding scales.
    #[serde(default)]
    pub precision: Precision,

    /// Defaults for screening queries.
    #[serde(default)]
    pub screen: ScreenDefaults,

    /// Batch calculation settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

fn default_fee_rate() -> Decimal {
    dec!(0.3)
}

fn default_tax_rate() -> Decimal {
    dec!(13)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee_rate_pct: default_fee_rate(),
            tax_rate_pct: default_tax_rate(),
            precision: Precision::default(),
            screen: ScreenDefaults::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parameters for the metrics calculator.
    #[must_use]
    pub fn calculation_params(&self) -> CalculationParams {
        CalculationParams {
            fee_rate_pct: self.fee_rate_pct,
            tax_rate_pct: self.tax_rate_pct,
            precision: self.precision,
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a `.toml` or `.json` file and validates it.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = std::fs::read_to_string(path)?;
        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "json" => Self::from_json_str(&content),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.fee_rate_pct < Decimal::ZERO {
            errors.push(ValidationError::new(
                "fee_rate_pct",
                format!("{} must not be negative", self.fee_rate_pct),
            ));
        }
        if self.tax_rate_pct < Decimal::ZERO || self.tax_rate_pct > Decimal::ONE_HUNDRED {
            errors.push(ValidationError::new(
                "tax_rate_pct",
                format!("{} must be between 0 and 100", self.tax_rate_pct),
            ));
        }
        if let Err(e) = self.precision.check() {
            errors.push(ValidationError::new("precision", e.to_string()));
        }

        errors.extend(self.screen.validate());
        errors.extend(self.batch.validate());
        errors
    }
}

// =============================================================================
// SCREEN DEFAULTS
// =============================================================================

/// Default bounds applied to a screening query when the caller leaves them unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDefaults {
    /// Earliest target date, in weeks from today.
    #[serde(default)]
    pub min_maturity_weeks: u32,

    /// Latest target date, in weeks from today.
    #[serde(default = "default_max_weeks")]
    pub max_maturity_weeks: u32,

    /// Lowest accepted yield, percent.
    #[serde(default)]
    pub min_yield: Decimal,

    /// Highest accepted yield, percent.
    #[serde(default = "default_max_yield")]
    pub max_yield: Decimal,

    /// Rank by offer-date yield when an offer is pending.
    #[serde(default)]
    pub prefer_offer_yield: bool,

    /// Result size cap.
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
}

fn default_max_weeks() -> u32 {
    260
}

fn default_max_yield() -> Decimal {
    dec!(100)
}

#[allow(clippy::unnecessary_wraps)]
fn default_limit() -> Option<usize> {
    Some(20)
}

impl Default for ScreenDefaults {
    fn default() -> Self {
        Self {
            min_maturity_weeks: 0,
            max_maturity_weeks: default_max_weeks(),
            min_yield: Decimal::ZERO,
            max_yield: default_max_yield(),
            prefer_offer_yield: false,
            limit: default_limit(),
        }
    }
}

impl Validate for ScreenDefaults {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.min_maturity_weeks > self.max_maturity_weeks {
            errors.push(ValidationError::new(
                "screen.min_maturity_weeks",
                format!(
                    "{} exceeds max_maturity_weeks {}",
                    self.min_maturity_weeks, self.max_maturity_weeks
                ),
            ));
        }
        if self.min_yield > self.max_yield {
            errors.push(ValidationError::new(
                "screen.min_yield",
                format!("{} exceeds max_yield {}", self.min_yield, self.max_yield),
            ));
        }
        if self.limit == Some(0) {
            errors.push(ValidationError::new("screen.limit", "must be positive"));
        }
        errors
    }
}

// =============================================================================
// BATCH CONFIGURATION
// =============================================================================

/// Controls how a batch of snapshots is mapped through the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Allow parallel processing (requires the analytics `parallel` feature).
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Minimum batch size before going parallel.
    /// Below this threshold, sequential is faster due to thread overhead.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_true() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    100
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl BatchConfig {
    /// A config that always runs sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the parallel threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// True if a batch of `count` items qualifies for parallel processing.
    ///
    /// Whether parallel code is compiled in is decided by the caller.
    #[must_use]
    pub fn wants_parallel(&self, count: usize) -> bool {
        self.parallel && count >= self.parallel_threshold
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Vec<ValidationError> {
        if self.parallel && self.parallel_threshold == 0 {
            vec![ValidationError::new(
                "batch.parallel_threshold",
                "must be at least 1 when parallel is enabled",
            )]
        } else {
            Vec::new()
        }
    }
}
