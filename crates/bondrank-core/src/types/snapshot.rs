//! Raw instrument reference data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CreditRating, Date};

/// Raw reference data for one bond, merged from all upstream feeds.
///
/// Every valuation input is optional because feeds are incomplete; the
/// metrics calculator decides whether a snapshot is calculable and never
/// substitutes defaults for missing values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    /// ISIN, the unique key.
    pub isin: String,

    /// Exchange ticker (SECID).
    #[serde(default)]
    pub ticker: Option<String>,

    /// Short display name.
    #[serde(default)]
    pub short_name: Option<String>,

    /// Coupon amount per period, in currency units.
    #[serde(default)]
    pub coupon_value: Option<Decimal>,

    /// Length of the current coupon period in days.
    #[serde(default)]
    pub coupon_length_days: Option<u32>,

    /// Days elapsed since the last coupon payment.
    #[serde(default)]
    pub coupon_days_passed: Option<u32>,

    /// Redemption value.
    #[serde(default)]
    pub face_value: Option<Decimal>,

    /// Legal maturity date.
    #[serde(default)]
    pub maturity_date: Option<Date>,

    /// Put/offer date, if the bond has one.
    #[serde(default)]
    pub offer_date: Option<Date>,

    /// Current market price, in currency units.
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Ordinal rating code; lower is better.
    #[serde(default)]
    pub rating_code: Option<u32>,

    /// Rating label as published by the agency.
    #[serde(default)]
    pub rating_label: Option<String>,
}

impl InstrumentSnapshot {
    /// Creates an empty snapshot for `isin`.
    pub fn new(isin: impl Into<String>) -> Self {
        Self {
            isin: isin.into(),
            ..Self::default()
        }
    }

    /// Sets ticker and short name.
    #[must_use]
    pub fn with_names(mut self, ticker: impl Into<String>, short_name: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self.short_name = Some(short_name.into());
        self
    }

    /// Sets the coupon amount, period length and days elapsed.
    #[must_use]
    pub fn with_coupon(mut self, value: Decimal, length_days: u32, days_passed: u32) -> Self {
        self.coupon_value = Some(value);
        self.coupon_length_days = Some(length_days);
        self.coupon_days_passed = Some(days_passed);
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn with_face_value(mut self, face_value: Decimal) -> Self {
        self.face_value = Some(face_value);
        self
    }

    /// Sets the market price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn with_maturity_date(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Sets the offer date.
    #[must_use]
    pub fn with_offer_date(mut self, date: Date) -> Self {
        self.offer_date = Some(date);
        self
    }

    /// Sets an explicit rating code.
    #[must_use]
    pub fn with_rating_code(mut self, code: u32) -> Self {
        self.rating_code = Some(code);
        self
    }

    /// Sets the rating label.
    #[must_use]
    pub fn with_rating_label(mut self, label: impl Into<String>) -> Self {
        self.rating_label = Some(label.into());
        self
    }

    /// Rating code used for ranking.
    ///
    /// An explicit code wins; otherwise the code is derived from a parseable
    /// label. `None` means unrated.
    #[must_use]
    pub fn effective_rating_code(&self) -> Option<u32> {
        self.rating_code.or_else(|| {
            self.rating_label
                .as_deref()
                .and_then(CreditRating::parse)
                .map(|r| r.code())
        })
    }

    /// True if `needle_lower` (already lowercased) occurs in the ticker or short name.
    #[must_use]
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        [self.ticker.as_deref(), self.short_name.as_deref()]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase().contains(needle_lower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder() {
        let maturity = Date::from_ymd(2027, 5, 20).unwrap();
        let s = InstrumentSnapshot::new("RU000A105SG2")
            .with_names("RU000A105SG2", "Sample 1P4")
            .with_coupon(dec!(40), 182, 90)
            .with_face_value(dec!(1000))
            .with_price(dec!(980))
            .with_maturity_date(maturity);

        assert_eq!(s.isin, "RU000A105SG2");
        assert_eq!(s.coupon_length_days, Some(182));
        assert_eq!(s.maturity_date, Some(maturity));
        assert!(s.offer_date.is_none());
        assert!(s.effective_rating_code().is_none());
    }

    #[test]
    fn test_effective_rating_code() {
        let labelled = InstrumentSnapshot::new("X").with_rating_label("ruA+");
        assert_eq!(labelled.effective_rating_code(), Some(50));

        let explicit = labelled.clone().with_rating_code(55);
        assert_eq!(explicit.effective_rating_code(), Some(55));

        let unparseable = InstrumentSnapshot::new("Y").with_rating_label("NR");
        assert_eq!(unparseable.effective_rating_code(), None);
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let s = InstrumentSnapshot::new("X").with_names("SBER-B1", "Сбербанк Б1");
        assert!(s.name_contains("sber"));
        assert!(s.name_contains("сбер"));
        assert!(!s.name_contains("vtb"));

        let unnamed = InstrumentSnapshot::new("Z");
        assert!(!unnamed.name_contains("z"));
    }

    #[test]
    fn test_deserialize_partial() {
        let s: InstrumentSnapshot =
            serde_json::from_str(r#"{"isin": "X", "price": "101.5", "maturity_date": "2030-01-01"}"#)
                .unwrap();
        assert_eq!(s.price, Some(dec!(101.5)));
        assert_eq!(s.maturity_date, Some(Date::from_ymd(2030, 1, 1).unwrap()));
        assert!(s.coupon_value.is_none());
    }
}
