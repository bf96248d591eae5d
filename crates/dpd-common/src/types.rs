//! Domain types shared by the estimator and the decision simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One ad impression and whether it converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionRecord {
    /// Opaque campaign identifier.
    pub campaign_id: String,
    pub converted: bool,
}

impl ImpressionRecord {
    pub fn new(campaign_id: impl Into<String>, converted: bool) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            converted,
        }
    }
}

/// Per-campaign conversion counts.
///
/// Always holds at least one impression and no more conversions than
/// impressions; construction enforces both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignAggregate {
    pub campaign_id: String,
    pub num_impressions: u64,
    pub num_conversions: u64,
    pub conversion_rate: f64,
}

impl CampaignAggregate {
    /// Returns None for an empty group or conversions exceeding impressions.
    pub fn new(
        campaign_id: impl Into<String>,
        num_impressions: u64,
        num_conversions: u64,
    ) -> Option<Self> {
        if num_impressions == 0 || num_conversions > num_impressions {
            return None;
        }
        Some(Self {
            campaign_id: campaign_id.into(),
            num_impressions,
            num_conversions,
            conversion_rate: num_conversions as f64 / num_impressions as f64,
        })
    }

    /// True when the rate is exactly 0 or 1.
    pub fn is_boundary(&self) -> bool {
        self.num_conversions == 0 || self.num_conversions == self.num_impressions
    }
}

/// Outcome of a threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Increase,
    Decrease,
    Maintain,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Increase => write!(f, "INCREASE"),
            Decision::Decrease => write!(f, "DECREASE"),
            Decision::Maintain => write!(f, "MAINTAIN"),
        }
    }
}

/// Matching-decision count for one privacy budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonMatches {
    pub epsilon: f64,
    pub matches: u64,
}

/// Per-ε agreement counts out of `size` trials, in ε input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTally {
    pub size: u64,
    pub entries: Vec<EpsilonMatches>,
}

impl DecisionTally {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, epsilon: f64, matches: u64) {
        self.entries.push(EpsilonMatches { epsilon, matches });
    }

    pub fn epsilons(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.epsilon).collect()
    }

    /// matches / size for each ε, in order.
    pub fn probabilities(&self) -> Vec<f64> {
        if self.size == 0 {
            return vec![0.0; self.entries.len()];
        }
        self.entries
            .iter()
            .map(|e| e.matches as f64 / self.size as f64)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_rejects_empty_groups() {
        assert!(CampaignAggregate::new("c1", 0, 0).is_none());
        assert!(CampaignAggregate::new("c1", 3, 4).is_none());
    }

    #[test]
    fn aggregate_computes_rate() {
        let agg = CampaignAggregate::new("c1", 4, 1).unwrap();
        assert_eq!(agg.conversion_rate, 0.25);
        assert!(!agg.is_boundary());
        assert!(CampaignAggregate::new("c2", 5, 0).unwrap().is_boundary());
        assert!(CampaignAggregate::new("c3", 5, 5).unwrap().is_boundary());
    }

    #[test]
    fn decision_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&Decision::Maintain).unwrap(),
            "\"MAINTAIN\""
        );
        assert_eq!(Decision::Increase.to_string(), "INCREASE");
    }

    #[test]
    fn tally_preserves_order() {
        let mut tally = DecisionTally::new(4);
        tally.push(8.0, 4);
        tally.push(0.5, 2);
        tally.push(2.0, 3);
        assert_eq!(tally.epsilons(), vec![8.0, 0.5, 2.0]);
        assert_eq!(tally.probabilities(), vec![1.0, 0.5, 0.75]);
        assert_eq!(tally.len(), 3);
    }
}
