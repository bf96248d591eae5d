//! Beta distribution utilities.
//!
//! Provides the PDF plus mean/variance helpers and the inverse mapping from
//! (mean, variance) back to shape parameters, which is what the implied
//! distribution analysis relies on.

use serde::{Deserialize, Serialize};

use super::stable::log_beta;

/// Shape parameters of a Beta distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Shape parameter alpha.
    pub alpha: f64,
    /// Shape parameter beta.
    pub beta: f64,
}

impl BetaParams {
    /// Create new Beta parameters with validation.
    ///
    /// Returns None if either parameter is non-positive, NaN, or infinite.
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return None;
        }
        Some(Self { alpha, beta })
    }

    /// Create Beta(1, 1), the uniform distribution.
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Mean E[p] = α / (α + β).
    pub fn mean(&self) -> f64 {
        beta_mean(self.alpha, self.beta)
    }

    /// Variance Var[p] = αβ / ((α+β)²(α+β+1)).
    pub fn variance(&self) -> f64 {
        beta_var(self.alpha, self.beta)
    }

    /// Density at x.
    pub fn pdf(&self, x: f64) -> f64 {
        beta_pdf(x, self.alpha, self.beta)
    }
}

impl std::fmt::Display for BetaParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Beta({}, {})", self.alpha, self.beta)
    }
}

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Shape parameters matching a given mean and variance.
///
/// `α = m²((1−m)/v − 1/m)` and `β = α(1/m − 1)`. The raw solution is returned
/// unclamped: when the variance is too large for the requested mean, one or
/// both values come back non-positive and the caller decides what to do.
pub fn beta_params_from_moments(mean: f64, variance: f64) -> (f64, f64) {
    if mean.is_nan() || variance.is_nan() || mean == 0.0 || variance <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let alpha = (mean * mean) * ((1.0 - mean) / variance - 1.0 / mean);
    (alpha, alpha * (1.0 / mean - 1.0))
}

/// Rescale a reference variance to a new mean.
///
/// Assumes the spread behaves like a Bernoulli process, variance ∝ p(1−p):
/// with `k = mean / reference_mean`, the result is
/// `k(1 − k·reference_mean) / (1 − reference_mean) · reference_variance`.
pub fn adjusted_variance(mean: f64, reference_mean: f64, reference_variance: f64) -> f64 {
    if mean.is_nan() || reference_mean.is_nan() || reference_variance.is_nan() {
        return f64::NAN;
    }
    if reference_mean <= 0.0 || reference_mean >= 1.0 {
        return f64::NAN;
    }
    let k = mean / reference_mean;
    let j = (k * (1.0 - k * reference_mean)) / (1.0 - reference_mean);
    j * reference_variance
}

/// Log of the Beta PDF at x.
pub fn log_beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() {
        return f64::NAN;
    }
    if alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        if alpha < 1.0 {
            return f64::INFINITY;
        }
        if alpha > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(1.0, beta);
    }
    if x == 1.0 {
        if beta < 1.0 {
            return f64::INFINITY;
        }
        if beta > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(alpha, 1.0);
    }
    let log_x = x.ln();
    let log_one_minus = (-x).ln_1p();
    (alpha - 1.0) * log_x + (beta - 1.0) * log_one_minus - log_beta(alpha, beta)
}

/// Beta PDF at x.
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    let log_pdf = log_beta_pdf(x, alpha, beta);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    if log_pdf == f64::INFINITY {
        return f64::INFINITY;
    }
    if log_pdf == f64::NEG_INFINITY {
        return 0.0;
    }
    log_pdf.exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn mean_and_var_match_closed_form() {
        let mean = beta_mean(2.0, 5.0);
        let var = beta_var(2.0, 5.0);
        assert!(approx_eq(mean, 2.0 / 7.0, 1e-12));
        assert!(approx_eq(var, 10.0 / 392.0, 1e-12));
    }

    #[test]
    fn params_reject_invalid_shapes() {
        assert!(BetaParams::new(0.0, 1.0).is_none());
        assert!(BetaParams::new(1.0, -2.0).is_none());
        assert!(BetaParams::new(f64::NAN, 1.0).is_none());
        assert!(BetaParams::new(f64::INFINITY, 1.0).is_none());
        assert!(BetaParams::new(2.0, 198.0).is_some());
    }

    #[test]
    fn moments_round_trip_recovers_shapes() {
        let (alpha, beta) = (2.0, 198.0);
        let (a, b) = beta_params_from_moments(beta_mean(alpha, beta), beta_var(alpha, beta));
        assert!(approx_eq(a, alpha, 1e-8));
        assert!(approx_eq(b, beta, 1e-6));
    }

    #[test]
    fn moments_with_oversized_variance_go_negative() {
        // Beta(0.5, 0.5) has variance 0.125; a mean of 0.5 with variance
        // 0.3 exceeds the Bernoulli bound m(1-m) = 0.25.
        let (a, b) = beta_params_from_moments(0.5, 0.3);
        assert!(a < 0.0);
        assert!(b < 0.0);
    }

    #[test]
    fn moments_reject_degenerate_input() {
        let (a, b) = beta_params_from_moments(0.0, 0.01);
        assert!(a.is_nan() && b.is_nan());
        let (a, b) = beta_params_from_moments(0.3, 0.0);
        assert!(a.is_nan() && b.is_nan());
    }

    #[test]
    fn adjusted_variance_is_identity_at_reference_mean() {
        let reference_mean = 0.045_104_528_828_597_9;
        let reference_variance = 0.001_477_718_655_290_317;
        let v = adjusted_variance(reference_mean, reference_mean, reference_variance);
        assert!(approx_eq(v, reference_variance, 1e-15));
    }

    #[test]
    fn adjusted_variance_tracks_bernoulli_shape() {
        let v1 = adjusted_variance(0.02, 0.05, 0.001);
        let v2 = adjusted_variance(0.1, 0.05, 0.001);
        assert!(v1 < 0.001);
        assert!(v2 > 0.001);
    }

    #[test]
    fn pdf_uniform_is_one() {
        let pdf = beta_pdf(0.33, 1.0, 1.0);
        assert!(approx_eq(pdf, 1.0, 1e-12));
    }

    #[test]
    fn pdf_known_value_beta_2_5() {
        let pdf = beta_pdf(0.2, 2.0, 5.0);
        assert!(approx_eq(pdf, 2.4576, 1e-6));
    }

    #[test]
    fn pdf_symmetry() {
        let left = beta_pdf(0.27, 2.3, 4.7);
        let right = beta_pdf(0.73, 4.7, 2.3);
        assert!(approx_eq(left, right, 1e-10));
    }

    #[test]
    fn pdf_outside_support_is_zero() {
        assert_eq!(beta_pdf(-0.1, 2.0, 2.0), 0.0);
        assert_eq!(beta_pdf(1.1, 2.0, 2.0), 0.0);
    }

    #[test]
    fn log_pdf_edge_behavior_at_zero() {
        let log_pdf = log_beta_pdf(0.0, 0.5, 2.0);
        assert!(log_pdf.is_infinite() && log_pdf.is_sign_positive());

        let log_pdf2 = log_beta_pdf(0.0, 2.0, 2.0);
        assert!(log_pdf2.is_infinite() && log_pdf2.is_sign_negative());
    }

    #[test]
    fn display_names_shapes() {
        let params = BetaParams::new(2.0, 198.0).unwrap();
        assert_eq!(params.to_string(), "Beta(2, 198)");
    }
}
