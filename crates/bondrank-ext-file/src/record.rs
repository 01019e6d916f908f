//! Partial snapshot records as they arrive from a feed.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bondrank_core::{Date, InstrumentSnapshot};

use crate::error::{ExtError, ExtResult};

/// One feed row: any subset of snapshot fields, keyed by ISIN.
///
/// An absent field means "this feed does not know", never "clear it".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotRecord {
    /// ISIN; rows without one are rejected.
    pub isin: Option<String>,
    /// Exchange ticker.
    pub ticker: Option<String>,
    /// Short display name.
    pub short_name: Option<String>,
    /// Coupon amount per period.
    pub coupon_value: Option<Decimal>,
    /// Coupon period length in days.
    pub coupon_length_days: Option<u32>,
    /// Days since the last coupon.
    pub coupon_days_passed: Option<u32>,
    /// Redemption value.
    pub face_value: Option<Decimal>,
    /// Maturity date.
    pub maturity_date: Option<Date>,
    /// Offer date.
    pub offer_date: Option<Date>,
    /// Market price.
    pub price: Option<Decimal>,
    /// Ordinal rating code.
    pub rating_code: Option<u32>,
    /// Agency rating label.
    pub rating_label: Option<String>,
}

impl SnapshotRecord {
    /// The trimmed ISIN, or an error naming the row.
    pub(crate) fn require_isin(&self, source_name: &str, row: usize) -> ExtResult<String> {
        self.isin
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ExtError::MissingIsin {
                source_name: source_name.to_string(),
                row,
            })
    }

    /// Copies every present field onto `snapshot`.
    pub fn apply_to(&self, snapshot: &mut InstrumentSnapshot) {
        fn set<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *target = Some(v.clone());
            }
        }

        set(&mut snapshot.ticker, &self.ticker);
        set(&mut snapshot.short_name, &self.short_name);
        set(&mut snapshot.coupon_value, &self.coupon_value);
        set(&mut snapshot.coupon_length_days, &self.coupon_length_days);
        set(&mut snapshot.coupon_days_passed, &self.coupon_days_passed);
        set(&mut snapshot.face_value, &self.face_value);
        set(&mut snapshot.maturity_date, &self.maturity_date);
        set(&mut snapshot.offer_date, &self.offer_date);
        set(&mut snapshot.price, &self.price);
        set(&mut snapshot.rating_code, &self.rating_code);
        set(&mut snapshot.rating_label, &self.rating_label);
    }
}

/// CSV row with every cell as text; empty cells arrive as `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct CsvRow {
    isin: Option<String>,
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    coupon_value: Option<String>,
    #[serde(default)]
    coupon_length_days: Option<String>,
    #[serde(default)]
    coupon_days_passed: Option<String>,
    #[serde(default)]
    face_value: Option<String>,
    #[serde(default)]
    maturity_date: Option<String>,
    #[serde(default)]
    offer_date: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    rating_code: Option<String>,
    #[serde(default)]
    rating_label: Option<String>,
}

impl CsvRow {
    pub(crate) fn into_record(self, source_name: &str, row: usize) -> ExtResult<SnapshotRecord> {
        let field = |name: &str, value: Option<String>| -> Option<(String, String)> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (name.to_string(), v))
        };

        Ok(SnapshotRecord {
            isin: text(self.isin),
            ticker: text(self.ticker),
            short_name: text(self.short_name),
            coupon_value: parse_cell::<Decimal>(field("coupon_value", self.coupon_value), source_name, row)?,
            coupon_length_days: parse_cell::<u32>(
                field("coupon_length_days", self.coupon_length_days),
                source_name,
                row,
            )?,
            coupon_days_passed: parse_cell::<u32>(
                field("coupon_days_passed", self.coupon_days_passed),
                source_name,
                row,
            )?,
            face_value: parse_cell::<Decimal>(field("face_value", self.face_value), source_name, row)?,
            maturity_date: parse_cell::<Date>(field("maturity_date", self.maturity_date), source_name, row)?,
            offer_date: parse_cell::<Date>(field("offer_date", self.offer_date), source_name, row)?,
            price: parse_cell::<Decimal>(field("price", self.price), source_name, row)?,
            rating_code: parse_cell::<u32>(field("rating_code", self.rating_code), source_name, row)?,
            rating_label: text(self.rating_label),
        })
    }
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_cell<T>(cell: Option<(String, String)>, source_name: &str, row: usize) -> ExtResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some((name, raw)) = cell else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| ExtError::parse(source_name, row, format!("invalid {name} '{raw}': {e}")))
}
