use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RiskThresholds;

/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

pub struct RiskService;

impl RiskService {
    /// Projected spend relative to the limit. A zero limit is infinitely exceeded by any spend.
    pub fn ratio(projected_spend: f64, current_spend: f64, budget_limit: f64) -> f64 {
        if budget_limit > 0.0 {
            projected_spend / budget_limit
        } else if current_spend > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    /// Maps a ratio onto a band; each band includes its lower bound.
    pub fn classify_ratio(ratio: f64, thresholds: &RiskThresholds) -> RiskLevel {
        if ratio >= thresholds.high {
            RiskLevel::High
        } else if ratio >= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn classify(
        projected_spend: f64,
        current_spend: f64,
        budget_limit: f64,
        thresholds: &RiskThresholds,
    ) -> RiskLevel {
        Self::classify_ratio(
            Self::ratio(projected_spend, current_spend, budget_limit),
            thresholds,
        )
    }
}
