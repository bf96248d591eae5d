//! Beta-Binomial distribution for latent conversion counts.
//!
//! The model is a two-stage draw:
//! - Rate: `p ~ Beta(α, β)`
//! - Count: `k | p ~ Binomial(n, p)`
//!
//! The marginal PMF is
//!
//! ```text
//! P(k | n, α, β) = C(n, k) · B(α + k, β + n − k) / B(α, β)
//! ```
//!
//! CDF and quantile walk the support from k = 0 using the PMF ratio
//!
//! ```text
//! P(k+1) / P(k) = (n − k)(k + α) / ((k + 1)(n − k − 1 + β))
//! ```
//!
//! in the log domain: two logarithms per step instead of three log-gamma
//! evaluations.

use rand::Rng;
use rand_distr::{Beta, Binomial, Distribution};

use super::beta::BetaParams;
use super::stable::{log_beta, log_binomial};

/// Log probability mass at k for Beta-Binomial(n, α, β).
///
/// Returns NEG_INFINITY for k > n.
pub fn log_pmf(k: u64, n: u64, params: &BetaParams) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    log_binomial(n, k) + log_beta(params.alpha + k as f64, params.beta + (n - k) as f64)
        - log_beta(params.alpha, params.beta)
}

/// Probability mass at k.
pub fn pmf(k: u64, n: u64, params: &BetaParams) -> f64 {
    log_pmf(k, n, params).exp()
}

/// Cumulative probability P(K ≤ k). Linear in k, like [`quantile`].
pub fn cdf(k: u64, n: u64, params: &BetaParams) -> f64 {
    if k >= n {
        return 1.0;
    }
    let mut log_p = log_pmf(0, n, params);
    let mut total = log_p.exp();
    for j in 0..k {
        log_p += log_pmf_ratio(j, n, params);
        total += log_p.exp();
    }
    total.min(1.0)
}

/// Quantile (inverse CDF): the smallest k with P(K ≤ k) ≥ p.
///
/// Returns NaN for NaN p, 0 for p ≤ 0 and n for p ≥ 1.
///
/// Cost is linear in the returned k. Up to n ≈ 10^9 that takes seconds at
/// most; beyond that the walk is impractical for percentiles away from 0.
pub fn quantile(p: f64, n: u64, params: &BetaParams) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return n as f64;
    }

    let mut log_p = log_pmf(0, n, params);
    let mut total = log_p.exp();
    if total >= p {
        return 0.0;
    }
    for k in 0..n {
        log_p += log_pmf_ratio(k, n, params);
        total += log_p.exp();
        if total >= p {
            return (k + 1) as f64;
        }
    }
    n as f64
}

/// Mean count n·α/(α+β).
pub fn mean(n: u64, params: &BetaParams) -> f64 {
    n as f64 * params.mean()
}

/// Count variance n·αβ(α+β+n) / ((α+β)²(α+β+1)).
pub fn variance(n: u64, params: &BetaParams) -> f64 {
    let n_f = n as f64;
    let sum = params.alpha + params.beta;
    n_f * (params.alpha * params.beta / (sum * sum)) * ((sum + n_f) / (sum + 1.0))
}

/// log(P(k+1) / P(k)).
fn log_pmf_ratio(k: u64, n: u64, params: &BetaParams) -> f64 {
    let k_f = k as f64;
    let remaining = (n - k) as f64;
    (remaining * (k_f + params.alpha)).ln() - ((k_f + 1.0) * (remaining - 1.0 + params.beta)).ln()
}

/// Sampler for Beta-Binomial(n, α, β).
#[derive(Debug, Clone)]
pub struct BetaBinomial {
    n: u64,
    params: BetaParams,
    rate: Beta<f64>,
}

impl BetaBinomial {
    /// Build a sampler. Returns None if the shapes cannot parameterize a Beta.
    pub fn new(n: u64, params: BetaParams) -> Option<Self> {
        let rate = Beta::new(params.alpha, params.beta).ok()?;
        Some(Self { n, params, rate })
    }

    /// Number of trials.
    pub fn trials(&self) -> u64 {
        self.n
    }

    /// Shape parameters of the rate distribution.
    pub fn params(&self) -> BetaParams {
        self.params
    }

    /// Draw one count.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let p = self.rate.sample(rng).clamp(0.0, 1.0);
        match Binomial::new(self.n, p) {
            Ok(binomial) => binomial.sample(rng),
            // p is clamped into [0, 1], which Binomial always accepts.
            Err(_) => 0,
        }
    }

    /// Draw `size` i.i.d. counts.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, size: usize) -> Vec<u64> {
        (0..size).map(|_| self.sample(rng)).collect()
    }
}
