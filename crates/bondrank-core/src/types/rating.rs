//! Credit rating scale.
//!
//! - [`CreditRating`]: Normalized notch scale (AAA to D) with an ordinal code
//! - [`RatingBucket`]: Letter-grade grouping of notches
//!
//! Ranking only ever looks at the numeric rating code carried on a snapshot;
//! this module is how a label scraped from an agency page turns into that code.

use serde::{Deserialize, Serialize};

/// Normalized credit rating (agency-agnostic).
///
/// Parses S&P-style (`BBB-`), Moody's-style (`Baa3`) and national-scale
/// labels (`ruBBB-`, `BBB-(RU)`, `BBB-.ru`). Ordering runs from best (AAA)
/// to worst (D).
///
/// # Examples
///
/// ```
/// use bondrank_core::types::CreditRating;
///
/// let rating = CreditRating::parse("ruA+").unwrap();
/// assert_eq!(rating, CreditRating::APlus);
/// assert_eq!(rating.code(), 50);
/// assert!(rating.is_investment_grade());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditRating {
    /// Highest quality
    AAA = 1,
    /// AA+
    AAPlus = 2,
    /// AA
    AA = 3,
    /// AA-
    AAMinus = 4,
    /// A+
    APlus = 5,
    /// A
    A = 6,
    /// A-
    AMinus = 7,
    /// BBB+
    BBBPlus = 8,
    /// BBB
    BBB = 9,
    /// BBB- (lowest investment grade)
    BBBMinus = 10,
    /// BB+ (highest high yield)
    BBPlus = 11,
    /// BB
    BB = 12,
    /// BB-
    BBMinus = 13,
    /// B+
    BPlus = 14,
    /// B
    B = 15,
    /// B-
    BMinus = 16,
    /// CCC+
    CCCPlus = 17,
    /// CCC
    CCC = 18,
    /// CCC-
    CCCMinus = 19,
    /// CC
    CC = 20,
    /// C
    C = 21,
    /// Default
    D = 22,
}

impl CreditRating {
    /// Returns the notch number (1 = AAA, 22 = D).
    #[must_use]
    pub fn notch(&self) -> u8 {
        *self as u8
    }

    /// Returns the ordinal rating code (notch × 10, lower is better).
    ///
    /// The gaps leave room for provider-specific codes between notches.
    #[must_use]
    pub fn code(&self) -> u32 {
        u32::from(self.notch()) * 10
    }

    /// Returns true if this is investment grade (BBB- or better).
    #[must_use]
    pub fn is_investment_grade(&self) -> bool {
        *self <= CreditRating::BBBMinus
    }

    /// Returns true if this is high yield (BB+ down to C).
    #[must_use]
    pub fn is_high_yield(&self) -> bool {
        *self >= CreditRating::BBPlus && *self <= CreditRating::C
    }

    /// Returns the letter-grade bucket.
    #[must_use]
    pub fn bucket(&self) -> RatingBucket {
        match self {
            Self::AAA => RatingBucket::AAA,
            Self::AAPlus | Self::AA | Self::AAMinus => RatingBucket::AA,
            Self::APlus | Self::A | Self::AMinus => RatingBucket::A,
            Self::BBBPlus | Self::BBB | Self::BBBMinus => RatingBucket::BBB,
            Self::BBPlus | Self::BB | Self::BBMinus => RatingBucket::BB,
            Self::BPlus | Self::B | Self::BMinus => RatingBucket::B,
            Self::CCCPlus | Self::CCC | Self::CCCMinus | Self::CC | Self::C => RatingBucket::CCC,
            Self::D => RatingBucket::Default,
        }
    }

    /// Returns the S&P-style notation.
    #[must_use]
    pub fn sp_notation(&self) -> &'static str {
        match self {
            Self::AAA => "AAA",
            Self::AAPlus => "AA+",
            Self::AA => "AA",
            Self::AAMinus => "AA-",
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BBBPlus => "BBB+",
            Self::BBB => "BBB",
            Self::BBBMinus => "BBB-",
            Self::BBPlus => "BB+",
            Self::BB => "BB",
            Self::BBMinus => "BB-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CCCPlus => "CCC+",
            Self::CCC => "CCC",
            Self::CCCMinus => "CCC-",
            Self::CC => "CC",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Parses a rating label.
    ///
    /// Returns `None` for unrecognized labels and for explicit "not rated"
    /// markers (`NR`, `WD`, `-`): an unrated instrument has no code.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let core = strip_national_scale(label.trim());

        // Moody's notation is case-sensitive
        match core {
            "Aaa" => return Some(Self::AAA),
            "Aa1" => return Some(Self::AAPlus),
            "Aa2" => return Some(Self::AA),
            "Aa3" => return Some(Self::AAMinus),
            "A1" => return Some(Self::APlus),
            "A2" => return Some(Self::A),
            "A3" => return Some(Self::AMinus),
            "Baa1" => return Some(Self::BBBPlus),
            "Baa2" => return Some(Self::BBB),
            "Baa3" => return Some(Self::BBBMinus),
            "Ba1" => return Some(Self::BBPlus),
            "Ba2" => return Some(Self::BB),
            "Ba3" => return Some(Self::BBMinus),
            "B1" => return Some(Self::BPlus),
            "B2" => return Some(Self::B),
            "B3" => return Some(Self::BMinus),
            "Caa1" => return Some(Self::CCCPlus),
            "Caa2" => return Some(Self::CCC),
            "Caa3" => return Some(Self::CCCMinus),
            "Ca" => return Some(Self::CC),
            _ => {}
        }

        match core.to_uppercase().as_str() {
            "AAA" => Some(Self::AAA),
            "AA+" => Some(Self::AAPlus),
            "AA" => Some(Self::AA),
            "AA-" => Some(Self::AAMinus),
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "A-" => Some(Self::AMinus),
            "BBB+" => Some(Self::BBBPlus),
            "BBB" => Some(Self::BBB),
            "BBB-" => Some(Self::BBBMinus),
            "BB+" => Some(Self::BBPlus),
            "BB" => Some(Self::BB),
            "BB-" => Some(Self::BBMinus),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "B-" => Some(Self::BMinus),
            "CCC+" => Some(Self::CCCPlus),
            "CCC" => Some(Self::CCC),
            "CCC-" => Some(Self::CCCMinus),
            "CC" => Some(Self::CC),
            "C" => Some(Self::C),
            "D" | "SD" | "RD" => Some(Self::D),
            _ => None,
        }
    }

    /// Looks up the rating whose code is exactly `code`.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.code() == code)
    }

    /// All notches from best to worst.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::AAA,
            Self::AAPlus,
            Self::AA,
            Self::AAMinus,
            Self::APlus,
            Self::A,
            Self::AMinus,
            Self::BBBPlus,
            Self::BBB,
            Self::BBBMinus,
            Self::BBPlus,
            Self::BB,
            Self::BBMinus,
            Self::BPlus,
            Self::B,
            Self::BMinus,
            Self::CCCPlus,
            Self::CCC,
            Self::CCCMinus,
            Self::CC,
            Self::C,
            Self::D,
        ]
    }
}

impl std::fmt::Display for CreditRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sp_notation())
    }
}

/// Strips national-scale decorations: `ruAA-`, `AA-(RU)`, `AA-.ru`, `AA-|ru|`.
fn strip_national_scale(label: &str) -> &str {
    let mut core = label;
    if core.len() > 2 && core.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("ru")) {
        core = &core[2..];
    }
    for suffix in ["(RU)", "(ru)", ".ru", ".RU", "|ru|", "|RU|"] {
        if let Some(stripped) = core.strip_suffix(suffix) {
            core = stripped;
            break;
        }
    }
    core.trim()
}

/// Letter-grade grouping of notches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingBucket {
    /// AAA
    AAA,
    /// AA+, AA, AA-
    AA,
    /// A+, A, A-
    A,
    /// BBB+, BBB, BBB-
    BBB,
    /// BB+, BB, BB-
    BB,
    /// B+, B, B-
    B,
    /// CCC+ down to C
    CCC,
    /// D
    Default,
}

impl RatingBucket {
    /// Returns the label for this bucket.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AAA => "AAA",
            Self::AA => "AA",
            Self::A => "A",
            Self::BBB => "BBB",
            Self::BB => "BB",
            Self::B => "B",
            Self::CCC => "CCC & Below",
            Self::Default => "Default",
        }
    }

    /// Returns true if this bucket is investment grade.
    #[must_use]
    pub fn is_investment_grade(&self) -> bool {
        matches!(self, Self::AAA | Self::AA | Self::A | Self::BBB)
    }
}

impl std::fmt::Display for RatingBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_ordinal() {
        assert_eq!(CreditRating::AAA.code(), 10);
        assert_eq!(CreditRating::APlus.code(), 50);
        assert_eq!(CreditRating::BBMinus.code(), 130);
        assert_eq!(CreditRating::D.code(), 220);

        let codes: Vec<u32> = CreditRating::all().iter().map(CreditRating::code).collect();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_agency_notations() {
        assert_eq!(CreditRating::parse("AAA"), Some(CreditRating::AAA));
        assert_eq!(CreditRating::parse("Aa1"), Some(CreditRating::AAPlus));
        assert_eq!(CreditRating::parse("Baa2"), Some(CreditRating::BBB));
        assert_eq!(CreditRating::parse("bbb-"), Some(CreditRating::BBBMinus));
        assert_eq!(CreditRating::parse("XXX"), None);
    }

    #[test]
    fn test_parse_national_scale() {
        assert_eq!(CreditRating::parse("ruAAA"), Some(CreditRating::AAA));
        assert_eq!(CreditRating::parse("ruBB+"), Some(CreditRating::BBPlus));
        assert_eq!(CreditRating::parse("A-(RU)"), Some(CreditRating::AMinus));
        assert_eq!(CreditRating::parse("BBB.ru"), Some(CreditRating::BBB));
        assert_eq!(CreditRating::parse("  ruA  "), Some(CreditRating::A));
    }

    #[test]
    fn test_not_rated_has_no_rating() {
        assert_eq!(CreditRating::parse("NR"), None);
        assert_eq!(CreditRating::parse("WD"), None);
        assert_eq!(CreditRating::parse("-"), None);
        assert_eq!(CreditRating::parse(""), None);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(CreditRating::from_code(50), Some(CreditRating::APlus));
        assert_eq!(CreditRating::from_code(55), None);
    }

    #[test]
    fn test_grade_helpers() {
        assert!(CreditRating::BBBMinus.is_investment_grade());
        assert!(!CreditRating::BBPlus.is_investment_grade());
        assert!(CreditRating::BBPlus.is_high_yield());
        assert!(!CreditRating::D.is_high_yield());
        assert_eq!(CreditRating::AAMinus.bucket(), RatingBucket::AA);
        assert_eq!(CreditRating::CC.bucket(), RatingBucket::CCC);
        assert!(RatingBucket::BBB.is_investment_grade());
    }
}
