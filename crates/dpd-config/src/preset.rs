//! Named simulation scenarios.
//!
//! All presets share the prior Beta(2, 198), sensitivity 1, 100 000 trials
//! and ε = 2^x for x in [-23, 4). They differ in the rule family, the rule
//! set and the N range:
//! - median: one single-threshold rule at the median, N = 10^4..10^7
//! - various-rules: single-threshold rules at P1, P10, P50, P90, P99
//! - various-rules-limited-n: the same rules at N = 10^4 only
//! - maintain: one P50/P60 band rule, N = 10^4..10^7
//! - maintain-various-rules: four band rules at N = 10^4 only

use crate::scenario::{
    BandRuleEntry, EpsilonGrid, ExponentRange, RuleSet, SimulationScenario, SingleRuleEntry,
};
use serde::{Deserialize, Serialize};
use std::fmt;

const PRESET_ALPHA: f64 = 2.0;
const PRESET_BETA: f64 = 198.0;
const PRESET_TRIALS: u64 = 100_000;
const PRESET_EPS_EXP_START: i32 = -23;
const PRESET_EPS_EXP_END: i32 = 4;

/// Available scenario presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetName {
    Median,
    VariousRules,
    VariousRulesLimitedN,
    Maintain,
    MaintainVariousRules,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::Median,
        PresetName::VariousRules,
        PresetName::VariousRulesLimitedN,
        PresetName::Maintain,
        PresetName::MaintainVariousRules,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Median => "median",
            PresetName::VariousRules => "various-rules",
            PresetName::VariousRulesLimitedN => "various-rules-limited-n",
            PresetName::Maintain => "maintain",
            PresetName::MaintainVariousRules => "maintain-various-rules",
        }
    }

    /// Parse a preset name. Underscores and spaces are accepted for dashes.
    pub fn parse(s: &str) -> Option<PresetName> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        match normalized.as_str() {
            "median" => Some(PresetName::Median),
            "various-rules" | "various" => Some(PresetName::VariousRules),
            "various-rules-limited-n" => Some(PresetName::VariousRulesLimitedN),
            "maintain" => Some(PresetName::Maintain),
            "maintain-various-rules" => Some(PresetName::MaintainVariousRules),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Median => "Median single-threshold rule across N = 10^4..10^7",
            PresetName::VariousRules => "P1/P10/P50/P90/P99 single-threshold rules across N = 10^4..10^7",
            PresetName::VariousRulesLimitedN => "P1/P10/P50/P90/P99 single-threshold rules at N = 10^4",
            PresetName::Maintain => "P50/P60 band rule with a MAINTAIN zone across N = 10^4..10^7",
            PresetName::MaintainVariousRules => "Four band rules with a MAINTAIN zone at N = 10^4",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    UnknownPreset(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownPreset(name) => {
                write!(
                    f,
                    "Unknown preset '{}'. Available: {}",
                    name,
                    PresetName::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PresetError {}

/// Get the scenario for a preset.
pub fn get_preset(name: PresetName) -> SimulationScenario {
    match name {
        PresetName::Median => base_scenario(
            "DP Effect on Median Decision Rule",
            ExponentRange::new(4, 8),
            RuleSet::Single(vec![single("median", 0.5)]),
        ),
        PresetName::VariousRules => base_scenario(
            "DP Effect on Various Decision Rules",
            ExponentRange::new(4, 8),
            RuleSet::Single(percentile_rules()),
        ),
        PresetName::VariousRulesLimitedN => base_scenario(
            "DP Effect on Various Decision Rules",
            ExponentRange::new(4, 5),
            RuleSet::Single(percentile_rules()),
        ),
        PresetName::Maintain => base_scenario(
            "DP Effect on Decision Rules",
            ExponentRange::new(4, 8),
            RuleSet::Band(vec![band("P50/P60", 0.5, 0.6)]),
        ),
        PresetName::MaintainVariousRules => base_scenario(
            "DP Effect on Decision Rules",
            ExponentRange::new(4, 5),
            RuleSet::Band(vec![
                band("P50/P60", 0.5, 0.6),
                band("P40/P60", 0.4, 0.6),
                band("P30/P50", 0.3, 0.5),
                band("P80/P90", 0.8, 0.9),
            ]),
        ),
    }
}

/// List all presets with descriptions.
pub fn list_presets() -> Vec<(PresetName, &'static str)> {
    PresetName::ALL
        .iter()
        .map(|p| (*p, p.description()))
        .collect()
}

fn base_scenario(title: &str, n_exponents: ExponentRange, rules: RuleSet) -> SimulationScenario {
    SimulationScenario {
        title: title.to_string(),
        alpha: PRESET_ALPHA,
        beta: PRESET_BETA,
        sensitivity: 1.0,
        trials: PRESET_TRIALS,
        seed: None,
        n_exponents,
        epsilons: EpsilonGrid::powers_of_two(PRESET_EPS_EXP_START, PRESET_EPS_EXP_END),
        rules,
    }
}

fn percentile_rules() -> Vec<SingleRuleEntry> {
    vec![
        single("p1", 0.01),
        single("p10", 0.1),
        single("median", 0.5),
        single("p90", 0.9),
        single("p99", 0.99),
    ]
}

fn single(name: &str, percentile: f64) -> SingleRuleEntry {
    SingleRuleEntry {
        name: name.to_string(),
        percentile,
    }
}

fn band(name: &str, lower: f64, upper: f64) -> BandRuleEntry {
    BandRuleEntry {
        name: name.to_string(),
        lower,
        upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_name_parse() {
        assert_eq!(PresetName::parse("median"), Some(PresetName::Median));
        assert_eq!(
            PresetName::parse("Maintain_Various_Rules"),
            Some(PresetName::MaintainVariousRules)
        );
        assert_eq!(
            PresetName::parse("various rules limited n"),
            Some(PresetName::VariousRulesLimitedN)
        );
        assert_eq!(PresetName::parse("unknown"), None);
    }

    #[test]
    fn test_preset_round_trips_through_str() {
        for preset in PresetName::ALL {
            assert_eq!(preset.as_str().parse::<PresetName>().ok(), Some(*preset));
        }
    }

    #[test]
    fn test_unknown_preset_lists_available() {
        let err = "bogus".parse::<PresetName>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("maintain-various-rules"));
    }

    #[test]
    fn test_limited_presets_use_single_n() {
        let scenario = get_preset(PresetName::VariousRulesLimitedN);
        assert_eq!(scenario.n_exponents, ExponentRange::new(4, 5));
        assert_eq!(scenario.rules.len(), 5);
        assert_eq!(
            get_preset(PresetName::MaintainVariousRules).rules.names(),
            vec!["P50/P60", "P40/P60", "P30/P50", "P80/P90"]
        );
    }

    #[test]
    fn test_presets_share_prior_and_grid() {
        for preset in PresetName::ALL {
            let scenario = get_preset(*preset);
            assert_eq!(scenario.alpha, 2.0);
            assert_eq!(scenario.beta, 198.0);
            let eps = scenario.epsilons.values();
            assert_eq!(eps.len(), 27);
            assert_eq!(eps[0], 2f64.powi(-23));
            assert_eq!(eps[26], 8.0);
        }
    }

    #[test]
    fn test_list_presets() {
        let presets = list_presets();
        assert_eq!(presets.len(), 5);
        assert!(presets.iter().all(|(_, desc)| !desc.is_empty()));
    }
}
