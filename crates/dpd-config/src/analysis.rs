//! Settings for the distribution-fitting analysis and the privacy-bound
//! illustration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hypothetical campaign means the implied distributions are derived for.
pub const DEFAULT_TARGET_MEANS: [f64; 4] = [0.01, 0.02, 0.05, 0.1];

/// Dataset column names and plotting resolution for `dpd fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    pub target_means: Vec<f64>,
    pub campaign_column: String,
    pub conversion_column: String,
    /// Points on the [0, 1] grid of each PDF series.
    pub pdf_points: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_means: DEFAULT_TARGET_MEANS.to_vec(),
            campaign_column: "campaign".to_string(),
            conversion_column: "conversion".to_string(),
            pdf_points: 1000,
        }
    }
}

/// Two-location Laplace illustration of a single noisy decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PrivacyBoundConfig {
    /// True values of the two hypotheses.
    pub mu: [f64; 2],
    /// Budget used for the PDF curves.
    pub epsilon: f64,
    pub points: usize,
    /// ε = 2^x for x in `[eps_exp_start, eps_exp_end)` on the probability curve.
    pub eps_exp_start: i32,
    pub eps_exp_end: i32,
}

impl Default for PrivacyBoundConfig {
    fn default() -> Self {
        Self {
            mu: [0.0, 1.0],
            epsilon: 3.0,
            points: 1000,
            eps_exp_start: -18,
            eps_exp_end: 10,
        }
    }
}
