//! Changes between two consecutive rankings.

use std::collections::HashSet;

use serde::Serialize;

use crate::rank::RankedInstrument;

/// ISINs that entered, left or stayed in a top-N list between two runs.
///
/// A subscription notifier publishes this after each scheduled ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankingDigest {
    /// New in the current list, in current rank order.
    pub entered: Vec<String>,
    /// Gone from the current list, in previous order.
    pub exited: Vec<String>,
    /// Present in both, in current rank order.
    pub retained: Vec<String>,
}

impl RankingDigest {
    /// Compares the previously published ISINs with a fresh ranking.
    pub fn between<I, S>(previous: I, current: &[RankedInstrument]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let previous: Vec<String> = previous
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let before: HashSet<&str> = previous.iter().map(String::as_str).collect();
        let after: HashSet<&str> = current.iter().map(RankedInstrument::isin).collect();

        let mut digest = Self::default();
        for ranked in current {
            if before.contains(ranked.isin()) {
                digest.retained.push(ranked.isin().to_string());
            } else {
                digest.entered.push(ranked.isin().to_string());
            }
        }
        digest.exited = previous
            .iter()
            .filter(|isin| !after.contains(isin.as_str()))
            .cloned()
            .collect();
        digest
    }

    /// True if the list membership did not change.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}
