//! Risk band classification over prediction scores.

use serde::{Deserialize, Serialize};

/// Scores below this are low risk; at or above, at least medium.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.5;

/// Scores at or above this are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.75;

/// Ordinal risk classification derived from a prediction score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Classify a prediction score into a band.
    ///
    /// Band lower bounds are inclusive: exactly 0.5 is `Medium` and
    /// exactly 0.75 is `High`.
    pub fn classify(score: f64) -> Self {
        if score < MEDIUM_RISK_THRESHOLD {
            RiskBand::Low
        } else if score < HIGH_RISK_THRESHOLD {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    /// Human-readable label for log and display output.
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk",
            RiskBand::Medium => "Medium Risk",
            RiskBand::High => "High Risk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_below_half_are_low() {
        assert_eq!(RiskBand::classify(0.0), RiskBand::Low);
        assert_eq!(RiskBand::classify(0.42), RiskBand::Low);
        assert_eq!(RiskBand::classify(0.499999), RiskBand::Low);
    }

    #[test]
    fn medium_band_lower_bound_is_inclusive() {
        assert_eq!(RiskBand::classify(0.5), RiskBand::Medium);
        assert_eq!(RiskBand::classify(0.6), RiskBand::Medium);
        assert_eq!(RiskBand::classify(0.749999), RiskBand::Medium);
    }

    #[test]
    fn high_band_lower_bound_is_inclusive() {
        assert_eq!(RiskBand::classify(0.75), RiskBand::High);
        assert_eq!(RiskBand::classify(0.9), RiskBand::High);
        assert_eq!(RiskBand::classify(1.0), RiskBand::High);
    }

    #[test]
    fn labels_match_bands() {
        assert_eq!(RiskBand::Low.label(), "Low Risk");
        assert_eq!(RiskBand::Medium.label(), "Medium Risk");
        assert_eq!(RiskBand::High.label(), "High Risk");
    }
}
