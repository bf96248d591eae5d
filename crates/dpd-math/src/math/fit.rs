//! Maximum-likelihood fit of Beta shape parameters.
//!
//! The support is fixed to the unit interval (location 0, scale 1), so only
//! (α, β) are estimated. The score equations
//!
//! ```text
//! ψ(α) − ψ(α+β) = mean(ln x)
//! ψ(β) − ψ(α+β) = mean(ln(1−x))
//! ```
//!
//! are solved by Newton-Raphson, starting from the method-of-moments estimate.
//! Steps are halved whenever they would leave the positive quadrant.

use std::fmt;

use super::beta::BetaParams;
use super::stable::{digamma, log_beta, trigamma};

const FIT_MAX_ITERS: usize = 200;
const FIT_REL_TOL: f64 = 1e-10;
const FIT_MIN_STEP: f64 = 1e-12;

/// Result of a successful Beta fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaFit {
    /// Fitted shape parameters.
    pub params: BetaParams,
    /// Newton iterations used.
    pub iterations: usize,
    /// Total log-likelihood of the samples at the fitted parameters.
    pub log_likelihood: f64,
    /// Number of samples the fit used.
    pub sample_size: usize,
}

/// Reasons a Beta fit can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum BetaFitError {
    /// Fewer than two samples.
    InsufficientData { samples: usize },
    /// A sample lies outside the open unit interval.
    OutOfSupport { value: f64 },
    /// All samples are identical, so the likelihood has no finite maximum.
    ZeroVariance,
    /// Newton iteration did not settle.
    NoConvergence { iterations: usize },
}

impl fmt::Display for BetaFitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetaFitError::InsufficientData { samples } => {
                write!(f, "need at least 2 samples to fit a Beta distribution, got {}", samples)
            }
            BetaFitError::OutOfSupport { value } => {
                write!(f, "sample {} is outside the open interval (0, 1)", value)
            }
            BetaFitError::ZeroVariance => write!(f, "all samples are identical"),
            BetaFitError::NoConvergence { iterations } => {
                write!(f, "Beta fit did not converge after {} iterations", iterations)
            }
        }
    }
}

impl std::error::Error for BetaFitError {}

/// Fit Beta(α, β) to samples on (0, 1) by maximum likelihood.
pub fn fit_beta_mle(samples: &[f64]) -> Result<BetaFit, BetaFitError> {
    let n = samples.len();
    if n < 2 {
        return Err(BetaFitError::InsufficientData { samples: n });
    }
    if let Some(&value) = samples.iter().find(|x| !(**x > 0.0 && **x < 1.0)) {
        return Err(BetaFitError::OutOfSupport { value });
    }

    let n_f = n as f64;
    let mean = samples.iter().sum::<f64>() / n_f;
    let var = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n_f;
    if var <= 0.0 || samples.iter().all(|x| *x == samples[0]) {
        return Err(BetaFitError::ZeroVariance);
    }
    let mean_log = samples.iter().map(|x| x.ln()).sum::<f64>() / n_f;
    let mean_log1m = samples.iter().map(|x| (-x).ln_1p()).sum::<f64>() / n_f;

    // Method-of-moments start.
    let mut common = mean * (1.0 - mean) / var - 1.0;
    if !(common.is_finite() && common > 0.0) {
        common = 1.0;
    }
    let mut alpha = mean * common;
    let mut beta = (1.0 - mean) * common;

    for iteration in 1..=FIT_MAX_ITERS {
        let psi_sum = digamma(alpha + beta);
        let g_alpha = digamma(alpha) - psi_sum - mean_log;
        let g_beta = digamma(beta) - psi_sum - mean_log1m;

        let tri_sum = trigamma(alpha + beta);
        let h_aa = trigamma(alpha) - tri_sum;
        let h_bb = trigamma(beta) - tri_sum;
        let h_ab = -tri_sum;
        let det = h_aa * h_bb - h_ab * h_ab;
        if !det.is_finite() || det == 0.0 {
            return Err(BetaFitError::NoConvergence {
                iterations: iteration,
            });
        }
        let d_alpha = (h_bb * g_alpha - h_ab * g_beta) / det;
        let d_beta = (h_aa * g_beta - h_ab * g_alpha) / det;

        let mut step = 1.0;
        while alpha - step * d_alpha <= 0.0 || beta - step * d_beta <= 0.0 {
            step *= 0.5;
            if step < FIT_MIN_STEP {
                return Err(BetaFitError::NoConvergence {
                    iterations: iteration,
                });
            }
        }
        alpha -= step * d_alpha;
        beta -= step * d_beta;
        if !alpha.is_finite() || !beta.is_finite() {
            return Err(BetaFitError::NoConvergence {
                iterations: iteration,
            });
        }

        if (step * d_alpha).abs() <= FIT_REL_TOL * alpha
            && (step * d_beta).abs() <= FIT_REL_TOL * beta
        {
            let params = BetaParams::new(alpha, beta).ok_or(BetaFitError::NoConvergence {
                iterations: iteration,
            })?;
            let log_likelihood = n_f
                * ((alpha - 1.0) * mean_log + (beta - 1.0) * mean_log1m - log_beta(alpha, beta));
            return Ok(BetaFit {
                params,
                iterations: iteration,
                log_likelihood,
                sample_size: n,
            });
        }
    }

    Err(BetaFitError::NoConvergence {
        iterations: FIT_MAX_ITERS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Beta, Distribution};

    fn draw(alpha: f64, beta: f64, n: usize, seed: u64) -> Vec<f64> {
        let dist = Beta::new(alpha, beta).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| dist.sample(&mut rng))
            .filter(|x| *x > 0.0 && *x < 1.0)
            .collect()
    }

    #[test]
    fn recovers_known_shapes() {
        let samples = draw(2.0, 5.0, 20_000, 7);
        let fit = fit_beta_mle(&samples).unwrap();
        assert!((fit.params.alpha - 2.0).abs() < 0.15, "alpha={}", fit.params.alpha);
        assert!((fit.params.beta - 5.0).abs() < 0.4, "beta={}", fit.params.beta);
        assert_eq!(fit.sample_size, samples.len());
    }

    #[test]
    fn solution_satisfies_score_equations() {
        let samples = draw(0.8, 12.0, 5_000, 11);
        let fit = fit_beta_mle(&samples).unwrap();
        let n = samples.len() as f64;
        let mean_log = samples.iter().map(|x| x.ln()).sum::<f64>() / n;
        let (a, b) = (fit.params.alpha, fit.params.beta);
        let score = digamma(a) - digamma(a + b) - mean_log;
        assert!(score.abs() < 1e-8, "score={}", score);
    }

    #[test]
    fn fit_maximizes_likelihood_locally() {
        let samples = draw(3.0, 3.0, 2_000, 3);
        let fit = fit_beta_mle(&samples).unwrap();
        let ll = |a: f64, b: f64| -> f64 {
            samples
                .iter()
                .map(|x| (a - 1.0) * x.ln() + (b - 1.0) * (1.0 - x).ln() - log_beta(a, b))
                .sum()
        };
        let nudged = ll(fit.params.alpha * 1.05, fit.params.beta);
        assert!(fit.log_likelihood >= nudged);
        assert!((fit.log_likelihood - ll(fit.params.alpha, fit.params.beta)).abs() < 1e-6);
    }

    #[test]
    fn two_distinct_samples_fit() {
        let fit = fit_beta_mle(&[0.2, 0.4]).unwrap();
        assert!(fit.params.alpha > 0.0 && fit.params.beta > 0.0);
    }

    #[test]
    fn rejects_too_few_samples() {
        assert_eq!(
            fit_beta_mle(&[0.3]),
            Err(BetaFitError::InsufficientData { samples: 1 })
        );
        assert_eq!(
            fit_beta_mle(&[]),
            Err(BetaFitError::InsufficientData { samples: 0 })
        );
    }

    #[test]
    fn rejects_boundary_samples() {
        assert_eq!(
            fit_beta_mle(&[0.0, 0.5, 0.2]),
            Err(BetaFitError::OutOfSupport { value: 0.0 })
        );
        assert!(matches!(
            fit_beta_mle(&[0.5, 1.0]),
            Err(BetaFitError::OutOfSupport { .. })
        ));
    }

    #[test]
    fn rejects_identical_samples() {
        assert_eq!(
            fit_beta_mle(&[0.25, 0.25, 0.25]),
            Err(BetaFitError::ZeroVariance)
        );
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = BetaFitError::NoConvergence { iterations: 200 };
        assert!(err.to_string().contains("200"));
    }
}
