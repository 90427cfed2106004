//! Ordered risk levels
//!
//! Risk fields carry textual levels; reconciliation keeps the most
//! conservative one, so levels need a total order. Strings outside the
//! table rank below `low` (rank 0).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Risk level, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RiskLevel {
    Low = 1,
    MediumLow = 2,
    Medium = 3,
    MediumHigh = 4,
    High = 5,
    Critical = 6,
}

impl RiskLevel {
    /// Rank used for conservative comparisons; unrecognized labels rank 0.
    pub fn rank(label: &str) -> u8 {
        label.parse::<RiskLevel>().map(|l| l as u8).unwrap_or(0)
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}
