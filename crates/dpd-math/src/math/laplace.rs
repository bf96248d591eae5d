//! Laplace distribution and the Laplace mechanism noise model.
//!
//! For a query with sensitivity s released under ε-differential privacy, the
//! mechanism adds noise drawn from Laplace(0, b) with b = s/ε:
//!
//! ```text
//! p(x) = (1/2b) · exp(−|x − μ| / b)
//! F(x) = ½ · exp((x − μ)/b)           for x < μ
//!        1 − ½ · exp(−(x − μ)/b)      for x ≥ μ
//! ```
//!
//! Sampling uses the inverse CDF on an open uniform draw.

use rand::distr::Open01;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Density of Laplace(loc, scale) at x.
pub fn laplace_pdf(x: f64, loc: f64, scale: f64) -> f64 {
    if x.is_nan() || loc.is_nan() || scale.is_nan() || scale <= 0.0 {
        return f64::NAN;
    }
    (-(x - loc).abs() / scale).exp() / (2.0 * scale)
}

/// CDF of Laplace(loc, scale) at x.
pub fn laplace_cdf(x: f64, loc: f64, scale: f64) -> f64 {
    if x.is_nan() || loc.is_nan() || scale.is_nan() || scale <= 0.0 {
        return f64::NAN;
    }
    let z = (x - loc) / scale;
    if z < 0.0 {
        0.5 * z.exp()
    } else {
        1.0 - 0.5 * (-z).exp()
    }
}

/// Quantile of Laplace(loc, scale) at probability p.
///
/// Returns −∞ at p = 0, +∞ at p = 1, and NaN outside [0, 1].
pub fn laplace_quantile(p: f64, loc: f64, scale: f64) -> f64 {
    if p.is_nan() || loc.is_nan() || scale.is_nan() || scale <= 0.0 {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p < 0.5 {
        loc + scale * (2.0 * p).ln()
    } else {
        loc - scale * (2.0 * (1.0 - p)).ln()
    }
}

/// Scale of the Laplace mechanism: sensitivity / ε.
pub fn mechanism_scale(sensitivity: f64, epsilon: f64) -> f64 {
    sensitivity / epsilon
}

/// Laplace(loc, scale) with a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Laplace {
    pub loc: f64,
    pub scale: f64,
}

impl Laplace {
    /// Returns None unless loc is finite and scale is finite and positive.
    pub fn new(loc: f64, scale: f64) -> Option<Self> {
        if !loc.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        Some(Self { loc, scale })
    }

    /// Zero-centered noise for the ε-DP Laplace mechanism.
    pub fn mechanism(sensitivity: f64, epsilon: f64) -> Option<Self> {
        if !(epsilon > 0.0) || !(sensitivity > 0.0) {
            return None;
        }
        Self::new(0.0, mechanism_scale(sensitivity, epsilon))
    }

    pub fn pdf(&self, x: f64) -> f64 {
        laplace_pdf(x, self.loc, self.scale)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        laplace_cdf(x, self.loc, self.scale)
    }

    pub fn quantile(&self, p: f64) -> f64 {
        laplace_quantile(p, self.loc, self.scale)
    }

    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.sample(Open01);
        let centered = u - 0.5;
        self.loc - self.scale * centered.signum() * (1.0 - 2.0 * centered.abs()).ln()
    }

    /// Draw `size` i.i.d. values.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, size: usize) -> Vec<f64> {
        (0..size).map(|_| self.sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn pdf_peak_and_symmetry() {
        assert!(approx_eq(laplace_pdf(0.0, 0.0, 1.0), 0.5, 1e-15));
        assert!(approx_eq(
            laplace_pdf(1.3, 0.2, 0.7),
            laplace_pdf(-0.9, 0.2, 0.7),
            1e-15
        ));
    }

    #[test]
    fn cdf_is_half_at_location() {
        assert!(approx_eq(laplace_cdf(3.0, 3.0, 2.0), 0.5, 1e-15));
        assert!(approx_eq(laplace_cdf(1.0, 0.0, 1.0), 1.0 - 0.5 / 1.0f64.exp(), 1e-15));
    }

    #[test]
    fn quantile_inverts_cdf() {
        for p in [0.01, 0.25, 0.5, 0.8, 0.975] {
            let x = laplace_quantile(p, 1.5, 0.4);
            assert!(approx_eq(laplace_cdf(x, 1.5, 0.4), p, 1e-12), "p={}", p);
        }
    }

    #[test]
    fn upper_975_point_is_scale_times_ln_20() {
        let scale = 1.0 / 8.0;
        let bound = laplace_quantile(0.975, 0.0, scale);
        assert!(approx_eq(bound, scale * 20.0f64.ln(), 1e-12));
    }

    #[test]
    fn invalid_parameters_yield_nan() {
        assert!(laplace_pdf(0.0, 0.0, 0.0).is_nan());
        assert!(laplace_cdf(0.0, 0.0, -1.0).is_nan());
        assert!(laplace_quantile(1.5, 0.0, 1.0).is_nan());
        assert_eq!(laplace_quantile(1.0, 0.0, 1.0), f64::INFINITY);
    }

    #[test]
    fn mechanism_requires_positive_budget() {
        assert!(Laplace::mechanism(1.0, 0.0).is_none());
        assert!(Laplace::mechanism(1.0, -2.0).is_none());
        assert!(Laplace::mechanism(0.0, 1.0).is_none());
        let noise = Laplace::mechanism(1.0, 4.0).unwrap();
        assert!(approx_eq(noise.scale, 0.25, 1e-15));
        assert_eq!(noise.loc, 0.0);
    }

    #[test]
    fn samples_match_moments() {
        let noise = Laplace::new(0.0, 2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        let draws = noise.sample_n(&mut rng, 50_000);
        assert!(draws.iter().all(|x| x.is_finite()));
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let mean_abs = draws.iter().map(|x| x.abs()).sum::<f64>() / n;
        // E|X| = b for Laplace(0, b).
        assert!(mean.abs() < 0.05, "mean={}", mean);
        assert!((mean_abs - 2.0).abs() < 0.05, "mean_abs={}", mean_abs);
    }
}
