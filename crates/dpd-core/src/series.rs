//! Numeric plot series for an external plotting tool.
//!
//! Every series is a label plus matching x and y vectors. Nothing here
//! knows about colors, line styles or axes.

use dpd_math::{fit_beta_mle, laplace, BetaBinomial, BetaParams};
use rand::Rng;
use serde::Serialize;

use crate::implied::ImpliedDerivation;
use crate::sweep::SweepResult;

/// A labeled (x, y) series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PlotSeries {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// `points` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Format with `digits` significant digits, printf `%g` style.
///
/// Trailing zeros are dropped; exponents below -4 or at least `digits`
/// switch to scientific notation with a signed two-digit exponent.
pub fn format_sig(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, x);
    let parsed = sci
        .split_once('e')
        .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|e| (mantissa, e)));
    let (mantissa, exp) = match parsed {
        Some(parts) => parts,
        None => return sci,
    };

    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_trailing_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, x))
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

fn beta_pdf_series(label: String, params: &BetaParams, grid: &[f64]) -> PlotSeries {
    let y = grid.iter().map(|&x| params.pdf(x)).collect();
    PlotSeries::new(label, grid.to_vec(), y)
}

/// Label for the fitted distribution.
pub fn fitted_label(params: &BetaParams) -> String {
    format!(
        "Beta({}, {}) fit from data.",
        format_sig(params.alpha, 3),
        format_sig(params.beta, 3)
    )
}

/// Label for an implied distribution.
pub fn implied_label(params: &BetaParams, mean: f64) -> String {
    format!(
        "Implied Beta({}, {}) with mean {}.",
        format_sig(params.alpha, 3),
        format_sig(params.beta, 3),
        mean
    )
}

/// Fitted PDF followed by each feasible implied PDF, on `linspace(0, 1, points)`.
///
/// Skipped targets produce no series.
pub fn implied_pdf_series(derivation: &ImpliedDerivation, points: usize) -> Vec<PlotSeries> {
    let grid = linspace(0.0, 1.0, points);
    let mut series = Vec::with_capacity(derivation.derived.len() + 1);
    series.push(beta_pdf_series(
        fitted_label(&derivation.fitted),
        &derivation.fitted,
        &grid,
    ));
    for target in &derivation.derived {
        let params = target.params();
        series.push(beta_pdf_series(
            implied_label(&params, target.mean),
            &params,
            &grid,
        ));
    }
    series
}

/// One match-probability series per sweep curve, x = ε.
pub fn sweep_series(result: &SweepResult) -> Vec<PlotSeries> {
    result
        .curves
        .iter()
        .map(|c| PlotSeries::new(c.label.clone(), c.epsilons.clone(), c.match_probability.clone()))
        .collect()
}

/// Two Laplace densities at μ0 and μ1 with scale 1/ε, their overlap and the
/// probability that a released value lands on the wrong side of the midpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LaplaceCurves {
    pub mu: [f64; 2],
    pub epsilon: f64,
    pub midpoint: f64,
    pub prob_incorrect: f64,
    pub series: Vec<PlotSeries>,
}

/// P(value from Laplace(μ1, 1/ε) falls at or below the midpoint of μ0 and μ1).
pub fn prob_incorrect(mu: [f64; 2], epsilon: f64) -> f64 {
    let lo = mu[0].min(mu[1]);
    let hi = mu[0].max(mu[1]);
    laplace::laplace_cdf((hi + lo) / 2.0, mu[1], 1.0 / epsilon)
}

/// Density curves over `[min μ − 2, max μ + 2]`.
pub fn laplace_curves(mu: [f64; 2], epsilon: f64, points: usize) -> LaplaceCurves {
    let lo = mu[0].min(mu[1]);
    let hi = mu[0].max(mu[1]);
    let scale = 1.0 / epsilon;
    let grid = linspace(lo - 2.0, hi + 2.0, points);

    let pdf0: Vec<f64> = grid.iter().map(|&x| laplace::laplace_pdf(x, mu[0], scale)).collect();
    let pdf1: Vec<f64> = grid.iter().map(|&x| laplace::laplace_pdf(x, mu[1], scale)).collect();
    let overlap: Vec<f64> = pdf0.iter().zip(&pdf1).map(|(a, b)| a.min(*b)).collect();
    let p_incorrect = prob_incorrect(mu, epsilon);

    let series = vec![
        PlotSeries::new(
            format!("Laplace PDF (μ={}, ε={:.2})", mu[0], epsilon),
            grid.clone(),
            pdf0,
        ),
        PlotSeries::new(
            format!("Laplace PDF (μ={}, ε={:.2})", mu[1], epsilon),
            grid.clone(),
            pdf1,
        ),
        PlotSeries::new(format!("Prob Incorrect: {:.2}", p_incorrect), grid, overlap),
    ];

    LaplaceCurves {
        mu,
        epsilon,
        midpoint: (lo + hi) / 2.0,
        prob_incorrect: p_incorrect,
        series,
    }
}

/// P(correct individual decision) over ε = 2^x for x in `[exp_start, exp_end)`.
pub fn prob_correct_by_epsilon(mu: [f64; 2], exp_start: i32, exp_end: i32) -> PlotSeries {
    let epsilons: Vec<f64> = (exp_start..exp_end).map(|x| 2f64.powi(x)).collect();
    let y = epsilons.iter().map(|&eps| 1.0 - prob_incorrect(mu, eps)).collect();
    PlotSeries::new("Prob of correct individual decision", epsilons, y)
}

/// Histogram of simulated rates against the generating and re-fitted PDFs.
#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceIllustration {
    pub generating: BetaParams,
    /// None when the simulated rates could not be fitted.
    pub refit: Option<BetaParams>,
    pub impressions: u64,
    pub rounds: usize,
    /// Left edges of the histogram bins.
    pub bin_edges: Vec<f64>,
    /// Density-normalized bin heights.
    pub density: Vec<f64>,
    pub series: Vec<PlotSeries>,
}

/// Density-normalized histogram of `values` over [0, 1].
///
/// Returns (left edges, heights). A value of exactly 1 falls in the last bin.
pub fn histogram_density(values: &[f64], bins: usize) -> (Vec<f64>, Vec<f64>) {
    if bins == 0 {
        return (Vec::new(), Vec::new());
    }
    let width = 1.0 / bins as f64;
    let mut counts = vec![0u64; bins];
    for &v in values {
        if !(0.0..=1.0).contains(&v) {
            continue;
        }
        let idx = ((v / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let total = values.len().max(1) as f64;
    let edges = (0..bins).map(|i| i as f64 * width).collect();
    let density = counts.iter().map(|&c| c as f64 / (total * width)).collect();
    (edges, density)
}

/// Simulate `rounds` observed rates k/impressions with
/// k ~ Beta-Binomial(impressions, α, β), then compare their histogram with
/// the generating Beta and the Beta fitted back from the rates.
pub fn convergence_illustration<R: Rng + ?Sized>(
    params: &BetaParams,
    impressions: u64,
    rounds: usize,
    bins: usize,
    points: usize,
    rng: &mut R,
) -> Option<ConvergenceIllustration> {
    let sampler = BetaBinomial::new(impressions, *params)?;
    let n = impressions as f64;
    let rates: Vec<f64> = sampler
        .sample_n(rng, rounds)
        .into_iter()
        .map(|k| k as f64 / n)
        .collect();

    let (edges, density) = histogram_density(&rates, bins);
    let interior: Vec<f64> = rates.iter().copied().filter(|r| *r > 0.0 && *r < 1.0).collect();
    let refit = match fit_beta_mle(&interior) {
        Ok(fit) => Some(fit.params),
        Err(err) => {
            tracing::warn!(error = %err, "could not re-fit simulated rates");
            None
        }
    };

    let grid = linspace(0.0, 1.0, points);
    let mut series = vec![
        PlotSeries::new("Simulated conversion rates", edges.clone(), density.clone()),
        beta_pdf_series(format!("Generating {}", display_params(params)), params, &grid),
    ];
    if let Some(refit) = &refit {
        series.push(beta_pdf_series(
            format!("Re-fitted {}", display_params(refit)),
            refit,
            &grid,
        ));
    }

    Some(ConvergenceIllustration {
        generating: *params,
        refit,
        impressions,
        rounds,
        bin_edges: edges,
        density,
        series,
    })
}

fn display_params(params: &BetaParams) -> String {
    format!(
        "Beta({}, {})",
        format_sig(params.alpha, 3),
        format_sig(params.beta, 3)
    )
}
