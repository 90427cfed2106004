//! Textual score bands
//!
//! Callers without credit-score visibility get a band instead of the raw
//! number.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Credit-score band, coarsest useful granularity for redacted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl ScoreBand {
    /// Band a numeric score
    pub fn from_score(score: f64) -> Self {
        if score >= 750.0 {
            ScoreBand::Excellent
        } else if score >= 700.0 {
            ScoreBand::Good
        } else if score >= 650.0 {
            ScoreBand::Fair
        } else if score >= 600.0 {
            ScoreBand::Poor
        } else {
            ScoreBand::VeryPoor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ScoreBand::from_score(800.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(750.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(749.9), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(700.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(650.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(600.0), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(599.9), ScoreBand::VeryPoor);
        assert_eq!(ScoreBand::from_score(300.0), ScoreBand::VeryPoor);
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(ScoreBand::Excellent.to_string(), "excellent");
        assert_eq!(ScoreBand::VeryPoor.to_string(), "very_poor");
    }
}
