//! dp-decisions math utilities.

pub mod math;

pub use math::beta::*;
pub use math::beta_binomial::{self, BetaBinomial};
pub use math::fit::{fit_beta_mle, BetaFit, BetaFitError};
pub use math::laplace::{self, Laplace};
pub use math::stable::*;
