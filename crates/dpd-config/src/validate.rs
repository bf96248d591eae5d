//! Configuration validation errors and semantic validation.

use crate::analysis::{AnalysisConfig, PrivacyBoundConfig};
use crate::scenario::{EpsilonGrid, RuleSet, SimulationScenario};
use crate::Config;
use std::collections::HashSet;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    /// Field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidValue { field, .. } => Some(field.as_str()),
            ValidationError::VersionMismatch { .. } => Some("schema_version"),
            ValidationError::SemanticError(_) => None,
        }
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

/// Validate a full configuration.
pub fn validate_config(config: &Config) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }
    validate_analysis(&config.analysis)?;
    validate_scenario(&config.simulation)?;
    validate_privacy_bound(&config.privacy_bound)?;
    Ok(())
}

/// Validate the fitting/implied settings.
pub fn validate_analysis(analysis: &AnalysisConfig) -> ValidationResult<()> {
    for (idx, mean) in analysis.target_means.iter().enumerate() {
        if !(*mean > 0.0 && *mean < 1.0) {
            return Err(invalid(
                format!("analysis.target_means[{}]", idx),
                format!("Must be in (0, 1), got {}", mean),
            ));
        }
    }
    if analysis.campaign_column.trim().is_empty() {
        return Err(invalid("analysis.campaign_column", "Must not be empty"));
    }
    if analysis.conversion_column.trim().is_empty() {
        return Err(invalid("analysis.conversion_column", "Must not be empty"));
    }
    if analysis.campaign_column == analysis.conversion_column {
        return Err(ValidationError::SemanticError(
            "analysis.campaign_column and analysis.conversion_column must differ".to_string(),
        ));
    }
    if analysis.pdf_points < 2 {
        return Err(invalid(
            "analysis.pdf_points",
            format!("Must be >= 2, got {}", analysis.pdf_points),
        ));
    }
    Ok(())
}

/// Validate a simulation scenario.
///
/// Covers every precondition the simulator checks before sampling, so a
/// scenario that passes here never fails for setup reasons at run time.
pub fn validate_scenario(scenario: &SimulationScenario) -> ValidationResult<()> {
    validate_positive("simulation.alpha", scenario.alpha)?;
    validate_positive("simulation.beta", scenario.beta)?;
    validate_positive("simulation.sensitivity", scenario.sensitivity)?;

    if scenario.trials == 0 {
        return Err(invalid("simulation.trials", "Must be >= 1"));
    }

    let range = scenario.n_exponents;
    if range.is_empty() {
        return Err(invalid(
            "simulation.n_exponents",
            format!("Range [{}, {}) is empty", range.start, range.end),
        ));
    }
    if 10u64.checked_pow(range.end).is_none() {
        return Err(invalid(
            "simulation.n_exponents.end",
            format!("10^{} does not fit in 64 bits", range.end),
        ));
    }

    validate_epsilons(&scenario.epsilons, scenario.sensitivity)?;
    validate_rules(&scenario.rules)?;
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            field,
            format!("Must be finite and positive, got {}", value),
        ));
    }
    Ok(())
}

fn validate_epsilons(grid: &EpsilonGrid, sensitivity: f64) -> ValidationResult<()> {
    if let EpsilonGrid::Powers {
        base,
        exp_start,
        exp_end,
    } = grid
    {
        validate_positive("simulation.epsilons.base", *base)?;
        if exp_start >= exp_end {
            return Err(invalid(
                "simulation.epsilons",
                format!("Exponent range [{}, {}) is empty", exp_start, exp_end),
            ));
        }
    }

    let values = grid.values();
    if values.is_empty() {
        return Err(invalid("simulation.epsilons", "Must not be empty"));
    }
    for (idx, eps) in values.iter().enumerate() {
        if !(eps.is_finite() && *eps > 0.0) {
            return Err(invalid(
                format!("simulation.epsilons[{}]", idx),
                format!("Must be finite and positive, got {}", eps),
            ));
        }
        if !(sensitivity / eps).is_finite() {
            return Err(invalid(
                format!("simulation.epsilons[{}]", idx),
                format!("Noise scale {} / {} overflows", sensitivity, eps),
            ));
        }
    }
    Ok(())
}

fn validate_percentile(field: String, p: f64) -> ValidationResult<()> {
    if !(p > 0.0 && p < 1.0) {
        return Err(invalid(field, format!("Must be in (0, 1), got {}", p)));
    }
    Ok(())
}

fn validate_rules(rules: &RuleSet) -> ValidationResult<()> {
    if rules.is_empty() {
        return Err(invalid("simulation.rules", "Must contain at least one rule"));
    }

    let mut seen = HashSet::new();
    for name in rules.names() {
        if name.trim().is_empty() {
            return Err(invalid("simulation.rules", "Rule names must not be empty"));
        }
        if !seen.insert(name) {
            return Err(ValidationError::SemanticError(format!(
                "duplicate rule name '{}'",
                name
            )));
        }
    }

    match rules {
        RuleSet::Single(entries) => {
            for entry in entries {
                validate_percentile(
                    format!("simulation.rules.{}.percentile", entry.name),
                    entry.percentile,
                )?;
            }
        }
        RuleSet::Band(entries) => {
            for entry in entries {
                validate_percentile(format!("simulation.rules.{}.lower", entry.name), entry.lower)?;
                validate_percentile(format!("simulation.rules.{}.upper", entry.name), entry.upper)?;
                if entry.lower > entry.upper {
                    return Err(invalid(
                        format!("simulation.rules.{}", entry.name),
                        format!(
                            "lower ({}) must not exceed upper ({})",
                            entry.lower, entry.upper
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Validate the privacy-bound illustration settings.
pub fn validate_privacy_bound(bound: &PrivacyBoundConfig) -> ValidationResult<()> {
    for (idx, mu) in bound.mu.iter().enumerate() {
        if !mu.is_finite() {
            return Err(invalid(
                format!("privacy_bound.mu[{}]", idx),
                format!("Must be finite, got {}", mu),
            ));
        }
    }
    validate_positive("privacy_bound.epsilon", bound.epsilon)?;
    if bound.points < 2 {
        return Err(invalid(
            "privacy_bound.points",
            format!("Must be >= 2, got {}", bound.points),
        ));
    }
    if bound.eps_exp_start >= bound.eps_exp_end {
        return Err(invalid(
            "privacy_bound.eps_exp_start",
            format!(
                "Exponent range [{}, {}) is empty",
                bound.eps_exp_start, bound.eps_exp_end
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{BandRuleEntry, ExponentRange, SingleRuleEntry};

    #[test]
    fn test_default_config_is_valid() {
        validate_config(&Config::default()).unwrap();
    }

    #[test]
    fn test_rejects_non_positive_shape() {
        let mut scenario = SimulationScenario::default();
        scenario.alpha = 0.0;
        let err = validate_scenario(&scenario).unwrap_err();
        assert_eq!(err.field(), Some("simulation.alpha"));
    }

    #[test]
    fn test_rejects_bad_epsilon_value() {
        let mut scenario = SimulationScenario::default();
        scenario.epsilons = EpsilonGrid::Values {
            values: vec![1.0, f64::INFINITY],
        };
        let err = validate_scenario(&scenario).unwrap_err();
        assert_eq!(err.field(), Some("simulation.epsilons[1]"));
    }

    #[test]
    fn test_rejects_epsilon_with_overflowing_noise_scale() {
        let mut scenario = SimulationScenario::default();
        scenario.epsilons = EpsilonGrid::Values {
            values: vec![1.0, 1e-310],
        };
        let err = validate_scenario(&scenario).unwrap_err();
        assert_eq!(err.field(), Some("simulation.epsilons[1]"));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let mut scenario = SimulationScenario::default();
        scenario.rules = RuleSet::Band(vec![BandRuleEntry {
            name: "P60/P50".to_string(),
            lower: 0.6,
            upper: 0.5,
        }]);
        let err = validate_scenario(&scenario).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_duplicate_rule_names() {
        let mut scenario = SimulationScenario::default();
        let rule = SingleRuleEntry {
            name: "median".to_string(),
            percentile: 0.5,
        };
        scenario.rules = RuleSet::Single(vec![rule.clone(), rule]);
        let err = validate_scenario(&scenario).unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError(_)));
    }

    #[test]
    fn test_rejects_overflowing_exponent() {
        let mut scenario = SimulationScenario::default();
        scenario.n_exponents = ExponentRange::new(4, 20);
        let err = validate_scenario(&scenario).unwrap_err();
        assert_eq!(err.field(), Some("simulation.n_exponents.end"));
    }

    #[test]
    fn test_rejects_percentile_at_boundary() {
        let mut scenario = SimulationScenario::default();
        scenario.rules = RuleSet::Single(vec![SingleRuleEntry {
            name: "max".to_string(),
            percentile: 1.0,
        }]);
        assert!(validate_scenario(&scenario).is_err());
    }

    #[test]
    fn test_rejects_version_mismatch() {
        let config = Config {
            schema_version: "0.9.0".to_string(),
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::VersionMismatch { .. }));
        assert_eq!(err.code(), 66);
    }
}
