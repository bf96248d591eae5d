//! Sweep over N = 10^x and named rules.
//!
//! N is the outer axis and rules the inner one; curves come out in exactly
//! that order. Every combination is validated before any sampling starts.

use dpd_common::{DecisionTally, Error, Result};
use dpd_config::SimulationScenario;
use rand::Rng;
use serde::Serialize;

use crate::decision::NamedRule;
use crate::logging::event_names;
use crate::simulate::{simulate_with, SimulationConfig};

/// One match-probability curve.
#[derive(Debug, Clone, Serialize)]
pub struct SweepCurve {
    pub exponent: u32,
    pub n: u64,
    pub rule: String,
    pub label: String,
    /// Resolved count thresholds for this N.
    pub thresholds: Vec<f64>,
    pub epsilons: Vec<f64>,
    pub match_probability: Vec<f64>,
    pub tally: DecisionTally,
}

/// All curves of a sweep, plus the scenario they came from.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub title: String,
    pub alpha: f64,
    pub beta: f64,
    pub sensitivity: f64,
    pub trials: u64,
    pub curves: Vec<SweepCurve>,
}

/// Curve label for N = 10^exponent under a named rule.
pub fn curve_label(exponent: u32, rule_name: &str) -> String {
    format!("N = 10^{}, {} decision", exponent, rule_name)
}

/// Expand a scenario into its (exponent, rule, config) combinations.
fn plan(scenario: &SimulationScenario) -> Result<Vec<(u32, NamedRule, SimulationConfig)>> {
    let range = scenario.n_exponents;
    if range.is_empty() {
        return Err(Error::precondition(
            "n_exponents",
            format!("range [{}, {}) is empty", range.start, range.end),
        ));
    }
    let sizes = range.sizes();
    if sizes.len() != range.exponents().count() {
        return Err(Error::precondition(
            "n_exponents.end",
            format!("10^{} does not fit in 64 bits", range.end - 1),
        ));
    }
    let rules = NamedRule::from_rule_set(&scenario.rules);
    if rules.is_empty() {
        return Err(Error::precondition("rules", "must contain at least one rule"));
    }
    let epsilons = scenario.epsilons.values();

    let mut combos = Vec::with_capacity(sizes.len() * rules.len());
    for (exponent, n) in sizes {
        for rule in &rules {
            let config = SimulationConfig {
                n,
                alpha: scenario.alpha,
                beta: scenario.beta,
                epsilons: epsilons.clone(),
                sensitivity: scenario.sensitivity,
                size: scenario.trials,
                rule: rule.spec,
            };
            config.validate()?;
            combos.push((exponent, rule.clone(), config));
        }
    }
    Ok(combos)
}

/// Run every (N, rule) combination of the scenario.
pub fn run_sweep<R: Rng + ?Sized>(scenario: &SimulationScenario, rng: &mut R) -> Result<SweepResult> {
    let combos = plan(scenario)?;
    let mut curves = Vec::with_capacity(combos.len());

    for (exponent, rule, config) in combos {
        let params = config.validate()?;
        let resolved = rule.spec.resolve(config.n, &params)?;
        let tally = simulate_with(&config, &resolved, rng)?;
        let label = curve_label(exponent, &rule.name);

        tracing::debug!(
            target: event_names::SWEEP_CURVE,
            n = config.n,
            rule = %rule.name,
            thresholds = ?resolved.thresholds(),
            "sweep curve complete"
        );

        curves.push(SweepCurve {
            exponent,
            n: config.n,
            rule: rule.name,
            label,
            thresholds: resolved.thresholds(),
            epsilons: tally.epsilons(),
            match_probability: tally.probabilities(),
            tally,
        });
    }

    Ok(SweepResult {
        title: scenario.title.clone(),
        alpha: scenario.alpha,
        beta: scenario.beta,
        sensitivity: scenario.sensitivity,
        trials: scenario.trials,
        curves,
    })
}
