//! Implied Beta distributions at hypothetical target means.
//!
//! Holding the fitted variance fixed, each target mean m maps to
//!
//! ```text
//! α' = m² · ((1 − m)/v − 1/m)
//! β' = α' · (1/m − 1)
//! ```
//!
//! Targets whose α' or β' is not strictly positive have no Beta with that
//! mean and variance. They are reported as skipped, never clamped.

use dpd_common::Error;
use dpd_math::{beta_params_from_moments, BetaParams};
use serde::Serialize;

use crate::logging::event_names;

/// A feasible implied distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpliedTarget {
    pub mean: f64,
    pub variance: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl ImpliedTarget {
    pub fn params(&self) -> BetaParams {
        BetaParams {
            alpha: self.alpha,
            beta: self.beta,
        }
    }
}

/// A target mean with no valid Beta at the fitted variance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTarget {
    pub mean: f64,
    pub alpha: f64,
    pub beta: f64,
    pub reason: String,
}

impl SkippedTarget {
    /// The skip as an error value, for callers that treat it as fatal.
    pub fn to_error(&self) -> Error {
        Error::InfeasibleImplied {
            mean: self.mean,
            alpha: self.alpha,
            beta: self.beta,
        }
    }
}

/// Result of deriving implied distributions for a batch of means.
#[derive(Debug, Clone, Serialize)]
pub struct ImpliedDerivation {
    pub fitted: BetaParams,
    pub variance: f64,
    /// Feasible targets, in input order.
    pub derived: Vec<ImpliedTarget>,
    /// Infeasible targets, in input order.
    pub skipped: Vec<SkippedTarget>,
}

impl ImpliedDerivation {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Derive (α', β') for one target mean at a fixed variance.
pub fn implied_params(mean: f64, variance: f64) -> std::result::Result<ImpliedTarget, SkippedTarget> {
    let (alpha, beta) = beta_params_from_moments(mean, variance);
    let reason = if !(mean > 0.0 && mean < 1.0) {
        Some(format!("target mean {} is outside (0, 1)", mean))
    } else if !(alpha > 0.0 && beta > 0.0) {
        Some(format!(
            "variance {:.3e} is too large for mean {}",
            variance, mean
        ))
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SkippedTarget {
            mean,
            alpha,
            beta,
            reason,
        }),
        None => Ok(ImpliedTarget {
            mean,
            variance,
            alpha,
            beta,
        }),
    }
}

/// Derive implied distributions for each target mean.
///
/// Infeasible targets are logged and collected; the rest of the batch
/// continues.
pub fn derive_implied(fitted: &BetaParams, target_means: &[f64]) -> ImpliedDerivation {
    let variance = fitted.variance();
    let mut derived = Vec::with_capacity(target_means.len());
    let mut skipped = Vec::new();

    for &mean in target_means {
        match implied_params(mean, variance) {
            Ok(target) => derived.push(target),
            Err(skip) => {
                tracing::warn!(
                    target: event_names::IMPLIED_SKIPPED,
                    mean = skip.mean,
                    alpha = skip.alpha,
                    beta = skip.beta,
                    reason = %skip.reason,
                    "implied target skipped"
                );
                skipped.push(skip);
            }
        }
    }

    ImpliedDerivation {
        fitted: *fitted,
        variance,
        derived,
        skipped,
    }
}
