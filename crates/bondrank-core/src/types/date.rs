//! Calendar date type.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A calendar date.
///
/// Newtype over `chrono::NaiveDate`. Serializes as ISO 8601 (`YYYY-MM-DD`).
///
/// # Example
///
/// ```rust
/// use bondrank_core::types::Date;
///
/// let today = Date::from_ymd(2025, 6, 15).unwrap();
/// let maturity = Date::parse("2026-06-15").unwrap();
/// assert_eq!(today.days_between(&maturity), 365);
/// assert_eq!(today.add_weeks(2), Date::from_ymd(2025, 6, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses an ISO 8601 date (`YYYY-MM-DD`). Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns today's local date.
    #[must_use]
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a (possibly negative) number of calendar days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of whole weeks.
    #[must_use]
    pub fn add_weeks(&self, weeks: u32) -> Self {
        self.add_days(i64::from(weeks) * 7)
    }

    /// Adds days, returning `None` past the representable calendar range.
    #[must_use]
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        chrono::Duration::try_days(days)
            .and_then(|d| self.0.checked_add_signed(d))
            .map(Date)
    }

    /// Adds whole weeks, clamping to the latest representable date.
    #[must_use]
    pub fn saturating_add_weeks(&self, weeks: u32) -> Self {
        self.checked_add_days(i64::from(weeks) * 7)
            .unwrap_or(Date(NaiveDate::MAX))
    }

    /// Number of calendar days from `self` to `other`.
    ///
    /// Positive when `other` is later.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Self;

    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Self;

    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days from `other` to `self`.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
        assert!(Date::parse("2025-02-30").is_err());
        assert!(Date::parse("15.06.2025").is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let date = Date::parse(" 2024-02-29 ").unwrap();
        assert_eq!(date.to_string(), "2024-02-29");
        assert_eq!("2024-02-29".parse::<Date>().unwrap(), date);
    }

    #[test]
    fn test_day_arithmetic() {
        let start = Date::from_ymd(2024, 2, 28).unwrap();
        assert_eq!(start.add_days(1), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(start + 2, Date::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(start - 28, Date::from_ymd(2024, 1, 31).unwrap());
        assert_eq!(start.add_weeks(1), Date::from_ymd(2024, 3, 6).unwrap());
    }

    #[test]
    fn test_checked_and_saturating_arithmetic() {
        let start = Date::from_ymd(2025, 3, 1).unwrap();
        assert_eq!(start.checked_add_days(7), Some(start.add_weeks(1)));
        assert_eq!(start.checked_add_days(-1), Some(start - 1));
        assert_eq!(start.checked_add_days(i64::from(u32::MAX) * 7), None);
        assert_eq!(start.checked_add_days(i64::MAX), None);

        assert_eq!(start.saturating_add_weeks(2), start.add_weeks(2));
        assert_eq!(start.saturating_add_weeks(u32::MAX), Date(NaiveDate::MAX));
    }

    #[test]
    fn test_days_between_sign() {
        let a = Date::from_ymd(2025, 1, 1).unwrap();
        let b = Date::from_ymd(2026, 1, 1).unwrap();
        assert_eq!(a.days_between(&b), 365);
        assert_eq!(b.days_between(&a), -365);
        assert_eq!(b - a, 365);
        assert_eq!(a.days_between(&a), 0);
    }

    #[test]
    fn test_serde_is_iso_string() {
        let date = Date::from_ymd(2030, 1, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2030-01-15\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);
    }
}
