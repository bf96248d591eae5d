//! Monte-Carlo simulation of decision agreement under Laplace noise.
//!
//! For one N and one rule:
//!
//! 1. Draw `size` true counts X ~ Beta-Binomial(N, α, β).
//! 2. For each ε, draw `size` noise values from Laplace(0, s/ε).
//! 3. Compare the rule on the exact count against the rule on the noisy
//!    count with a ±bound interval, where bound is the 97.5th percentile of
//!    the noise distribution.
//! 4. Tally agreements per ε.
//!
//! All preconditions are checked before the first draw.

use dpd_common::{DecisionTally, Error, Result};
use dpd_math::{BetaBinomial, BetaParams, Laplace};
use rand::Rng;
use serde::Serialize;

use crate::decision::{DecisionFunction, Observation, RuleSpec};
use crate::logging::event_names;

/// Percentile of the noise distribution used as the interval half-width.
pub const NOISE_BOUND_PERCENTILE: f64 = 0.975;

/// Inputs for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    /// Number of Bernoulli trials behind each count.
    pub n: u64,
    pub alpha: f64,
    pub beta: f64,
    /// Privacy budgets, in output order.
    pub epsilons: Vec<f64>,
    pub sensitivity: f64,
    /// Trials per ε.
    pub size: u64,
    pub rule: RuleSpec,
}

impl SimulationConfig {
    /// Check every precondition, returning the Beta parameters on success.
    pub fn validate(&self) -> Result<BetaParams> {
        if self.n == 0 {
            return Err(Error::precondition("n", "must be >= 1"));
        }
        let params = BetaParams::new(self.alpha, self.beta).ok_or_else(|| {
            if self.alpha.is_finite() && self.alpha > 0.0 {
                Error::precondition("beta", format!("must be finite and > 0, got {}", self.beta))
            } else {
                Error::precondition("alpha", format!("must be finite and > 0, got {}", self.alpha))
            }
        })?;
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(Error::precondition(
                "sensitivity",
                format!("must be finite and > 0, got {}", self.sensitivity),
            ));
        }
        if self.epsilons.is_empty() {
            return Err(Error::precondition("epsilons", "must not be empty"));
        }
        self.noise_mechanisms()?;
        if self.size == 0 {
            return Err(Error::precondition("size", "must be >= 1"));
        }
        if usize::try_from(self.size).is_err() {
            return Err(Error::precondition("size", "exceeds addressable memory"));
        }
        self.rule.validate()?;
        Ok(params)
    }

    /// One Laplace mechanism per ε, in input order.
    ///
    /// Rejects ε that is not finite and positive, and ε so small that s/ε
    /// overflows.
    pub fn noise_mechanisms(&self) -> Result<Vec<Laplace>> {
        self.epsilons
            .iter()
            .enumerate()
            .map(|(idx, &eps)| {
                if !(eps.is_finite() && eps > 0.0) {
                    return Err(Error::precondition(
                        format!("epsilons[{}]", idx),
                        format!("must be finite and > 0, got {}", eps),
                    ));
                }
                Laplace::mechanism(self.sensitivity, eps).ok_or_else(|| {
                    Error::precondition(
                        format!("epsilons[{}]", idx),
                        format!("noise scale {} / {} is not finite", self.sensitivity, eps),
                    )
                })
            })
            .collect()
    }
}

/// Run the simulation, resolving the rule's thresholds for `config.n`.
pub fn simulate<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<DecisionTally> {
    let params = config.validate()?;
    let rule = config.rule.resolve(config.n, &params)?;
    simulate_with(config, &rule, rng)
}

/// Run the simulation with an already-resolved decision function.
///
/// The rule inside `config` is only validated; `decision` is what gets
/// evaluated.
pub fn simulate_with<D, R>(config: &SimulationConfig, decision: &D, rng: &mut R) -> Result<DecisionTally>
where
    D: DecisionFunction + ?Sized,
    R: Rng + ?Sized,
{
    let params = config.validate()?;
    let mechanisms = config.noise_mechanisms()?;
    let size = usize::try_from(config.size)
        .map_err(|_| Error::precondition("size", "exceeds addressable memory"))?;
    let latent = BetaBinomial::new(config.n, params)
        .ok_or_else(|| Error::precondition("alpha", "cannot parameterize a Beta distribution"))?;

    let truth: Vec<f64> = latent
        .sample_n(rng, size)
        .into_iter()
        .map(|k| k as f64)
        .collect();
    let exact: Vec<_> = truth
        .iter()
        .map(|&x| decision.evaluate(&Observation::exact(x)))
        .collect();

    let mut tally = DecisionTally::new(config.size);
    for (&epsilon, noise) in config.epsilons.iter().zip(&mechanisms) {
        let bound = noise.quantile(NOISE_BOUND_PERCENTILE);

        let mut matches = 0u64;
        for (x, expected) in truth.iter().zip(&exact) {
            let observed = Observation::noisy(*x, noise.sample(rng), bound);
            if decision.evaluate(&observed) == *expected {
                matches += 1;
            }
        }

        tracing::debug!(
            target: event_names::SIMULATE_EPSILON,
            n = config.n,
            epsilon,
            matches,
            size = config.size,
            "simulated privacy budget"
        );
        tally.push(epsilon, matches);
    }
    Ok(tally)
}
