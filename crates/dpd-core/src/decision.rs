//! Threshold decision rules over a (possibly noisy) observed count.
//!
//! A rule sees an [`Observation`]: a point value plus a confidence interval.
//! For an exact count all three coincide. Two rules exist:
//!
//! - [`SingleThreshold`]: INCREASE above the cutoff, DECREASE otherwise.
//!   Looks only at the point value.
//! - [`DualThreshold`]: INCREASE when the interval lies wholly above the
//!   upper cutoff, DECREASE when wholly below the lower cutoff, MAINTAIN in
//!   between.
//!
//! Cutoffs are Beta-Binomial percentiles of the count, computed once when a
//! [`RuleSpec`] is resolved for a given N.

use dpd_common::{Decision, Error, Result};
use dpd_config::RuleSet;
use dpd_math::{beta_binomial, BetaParams};
use serde::{Deserialize, Serialize};

/// A value with a two-sided interval around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Observation {
    /// An exact observation: value, lower and upper all equal `x`.
    pub fn exact(x: f64) -> Self {
        Self {
            value: x,
            lower: x,
            upper: x,
        }
    }

    /// `x + noise`, with an interval of ± `bound` around it.
    pub fn noisy(x: f64, noise: f64, bound: f64) -> Self {
        let value = x + noise;
        Self {
            value,
            lower: value - bound,
            upper: value + bound,
        }
    }
}

/// Maps an observation to a decision.
pub trait DecisionFunction {
    fn evaluate(&self, observation: &Observation) -> Decision;
}

/// INCREASE when the value exceeds the threshold, else DECREASE.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SingleThreshold {
    pub threshold: f64,
}

impl DecisionFunction for SingleThreshold {
    fn evaluate(&self, observation: &Observation) -> Decision {
        if observation.value > self.threshold {
            Decision::Increase
        } else {
            Decision::Decrease
        }
    }
}

/// Band rule with a MAINTAIN dead-zone between two thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DualThreshold {
    pub lower: f64,
    pub upper: f64,
}

impl DecisionFunction for DualThreshold {
    fn evaluate(&self, observation: &Observation) -> Decision {
        if observation.lower > self.upper {
            Decision::Increase
        } else if observation.upper < self.lower {
            Decision::Decrease
        } else {
            Decision::Maintain
        }
    }
}

/// A rule with its thresholds resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecisionRule {
    Single(SingleThreshold),
    Dual(DualThreshold),
}

impl DecisionRule {
    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> Vec<f64> {
        match self {
            DecisionRule::Single(rule) => vec![rule.threshold],
            DecisionRule::Dual(rule) => vec![rule.lower, rule.upper],
        }
    }
}

impl DecisionFunction for DecisionRule {
    fn evaluate(&self, observation: &Observation) -> Decision {
        match self {
            DecisionRule::Single(rule) => rule.evaluate(observation),
            DecisionRule::Dual(rule) => rule.evaluate(observation),
        }
    }
}

/// A rule expressed in percentiles, before N is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleSpec {
    Single { percentile: f64 },
    Dual { lower: f64, upper: f64 },
}

impl RuleSpec {
    pub fn median() -> Self {
        RuleSpec::Single { percentile: 0.5 }
    }

    /// Check that percentiles lie in (0, 1) and are ordered.
    pub fn validate(&self) -> Result<()> {
        fn check(field: &str, p: f64) -> Result<()> {
            if p > 0.0 && p < 1.0 {
                Ok(())
            } else {
                Err(Error::precondition(field, format!("percentile {} must be in (0, 1)", p)))
            }
        }
        match *self {
            RuleSpec::Single { percentile } => check("rule.percentile", percentile),
            RuleSpec::Dual { lower, upper } => {
                check("rule.lower", lower)?;
                check("rule.upper", upper)?;
                if lower > upper {
                    return Err(Error::precondition(
                        "rule.lower",
                        format!("lower percentile {} exceeds upper {}", lower, upper),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Resolve percentiles to count thresholds for Beta-Binomial(n, α, β).
    pub fn resolve(&self, n: u64, params: &BetaParams) -> Result<DecisionRule> {
        self.validate()?;
        Ok(match *self {
            RuleSpec::Single { percentile } => DecisionRule::Single(SingleThreshold {
                threshold: beta_binomial::quantile(percentile, n, params),
            }),
            RuleSpec::Dual { lower, upper } => DecisionRule::Dual(DualThreshold {
                lower: beta_binomial::quantile(lower, n, params),
                upper: beta_binomial::quantile(upper, n, params),
            }),
        })
    }
}

/// A named rule configuration, as listed in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRule {
    pub name: String,
    pub spec: RuleSpec,
}

impl NamedRule {
    /// Expand a scenario's rule set, preserving order.
    pub fn from_rule_set(rules: &RuleSet) -> Vec<NamedRule> {
        match rules {
            RuleSet::Single(entries) => entries
                .iter()
                .map(|e| NamedRule {
                    name: e.name.clone(),
                    spec: RuleSpec::Single {
                        percentile: e.percentile,
                    },
                })
                .collect(),
            RuleSet::Band(entries) => entries
                .iter()
                .map(|e| NamedRule {
                    name: e.name.clone(),
                    spec: RuleSpec::Dual {
                        lower: e.lower,
                        upper: e.upper,
                    },
                })
                .collect(),
        }
    }
}
