//! Decision-simulation scenario: Beta prior, ε grid, N grid and named rules.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Half-open range of base-10 exponents: N = 10^x for x in `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExponentRange {
    pub start: u32,
    pub end: u32,
}

impl ExponentRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn exponents(&self) -> impl Iterator<Item = u32> {
        self.start..self.end
    }

    /// (x, 10^x) pairs. Exponents whose power overflows u64 are dropped.
    pub fn sizes(&self) -> Vec<(u32, u64)> {
        self.exponents()
            .filter_map(|x| 10u64.checked_pow(x).map(|n| (x, n)))
            .collect()
    }
}

/// Privacy budgets to sweep.
///
/// Either explicit values or powers `base^x` for x in `[exp_start, exp_end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EpsilonGrid {
    Values {
        values: Vec<f64>,
    },
    Powers {
        base: f64,
        exp_start: i32,
        exp_end: i32,
    },
}

impl EpsilonGrid {
    pub fn powers_of_two(exp_start: i32, exp_end: i32) -> Self {
        EpsilonGrid::Powers {
            base: 2.0,
            exp_start,
            exp_end,
        }
    }

    /// Materialize the grid in sweep order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            EpsilonGrid::Values { values } => values.clone(),
            EpsilonGrid::Powers {
                base,
                exp_start,
                exp_end,
            } => (*exp_start..*exp_end).map(|x| base.powi(x)).collect(),
        }
    }
}

/// One-cutoff rule: INCREASE above the Beta-Binomial quantile at `percentile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SingleRuleEntry {
    pub name: String,
    pub percentile: f64,
}

/// Two-cutoff rule with a MAINTAIN band between `lower` and `upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BandRuleEntry {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

/// Named rule configurations, all of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "entries", rename_all = "lowercase")]
pub enum RuleSet {
    Single(Vec<SingleRuleEntry>),
    Band(Vec<BandRuleEntry>),
}

impl RuleSet {
    pub fn kind(&self) -> &'static str {
        match self {
            RuleSet::Single(_) => "single",
            RuleSet::Band(_) => "band",
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            RuleSet::Single(entries) => entries.iter().map(|e| e.name.as_str()).collect(),
            RuleSet::Band(entries) => entries.iter().map(|e| e.name.as_str()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RuleSet::Single(entries) => entries.len(),
            RuleSet::Band(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Full sweep definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SimulationScenario {
    pub title: String,
    pub alpha: f64,
    pub beta: f64,
    pub sensitivity: f64,
    /// Trials per (N, rule, ε).
    pub trials: u64,
    /// Fixed RNG seed; a fresh one is drawn and reported when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub n_exponents: ExponentRange,
    pub epsilons: EpsilonGrid,
    pub rules: RuleSet,
}

impl Default for SimulationScenario {
    fn default() -> Self {
        crate::preset::get_preset(crate::preset::PresetName::Median)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_range_is_half_open() {
        let range = ExponentRange::new(4, 8);
        assert_eq!(range.exponents().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
        assert_eq!(range.sizes()[0], (4, 10_000));
        assert!(ExponentRange::new(5, 5).is_empty());
    }

    #[test]
    fn exponent_range_drops_overflowing_powers() {
        let sizes = ExponentRange::new(18, 22).sizes();
        assert_eq!(
            sizes,
            vec![
                (18, 1_000_000_000_000_000_000),
                (19, 10_000_000_000_000_000_000),
            ]
        );
    }

    #[test]
    fn powers_grid_matches_exponents() {
        let grid = EpsilonGrid::powers_of_two(-2, 2);
        assert_eq!(grid.values(), vec![0.25, 0.5, 1.0, 2.0]);
    }

    #[test]
    fn epsilon_grid_parses_both_forms() {
        let values: EpsilonGrid = serde_json::from_str(r#"{"values": [0.5, 8.0]}"#).unwrap();
        assert_eq!(values.values(), vec![0.5, 8.0]);
        let powers: EpsilonGrid =
            serde_json::from_str(r#"{"base": 2.0, "exp_start": 0, "exp_end": 3}"#).unwrap();
        assert_eq!(powers.values(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn rule_set_is_tagged_by_kind() {
        let rules: RuleSet = serde_json::from_str(
            r#"{"kind": "band", "entries": [{"name": "P50/P60", "lower": 0.5, "upper": 0.6}]}"#,
        )
        .unwrap();
        assert_eq!(rules.kind(), "band");
        assert_eq!(rules.names(), vec!["P50/P60"]);
    }

    #[test]
    fn scenario_parses_from_toml() {
        let text = r#"
            title = "Custom"
            alpha = 3.0
            beta = 97.0
            sensitivity = 1.0
            trials = 500
            seed = 7
            n_exponents = { start = 3, end = 5 }
            epsilons = { values = [1.0, 4.0] }
            rules = { kind = "single", entries = [{ name = "p90", percentile = 0.9 }] }
        "#;
        let scenario: SimulationScenario = toml::from_str(text).unwrap();
        assert_eq!(scenario.seed, Some(7));
        assert_eq!(scenario.n_exponents, ExponentRange::new(3, 5));
        assert_eq!(scenario.rules.len(), 1);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let scenario: SimulationScenario = toml::from_str("trials = 10").unwrap();
        assert_eq!(scenario.trials, 10);
        assert_eq!(scenario.alpha, 2.0);
        assert_eq!(scenario.rules.kind(), "single");
    }
}
