//! dp-decisions core library
//!
//! This library provides:
//! - Dataset readers and campaign aggregation
//! - Beta parameter estimation and implied distributions
//! - Threshold decision rules and the differential-privacy decision simulator
//! - N × rule sweeps and numeric plot series
//! - JSON Schemas for configuration files
//! - Exit codes, logging and output rendering for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod dataset;
pub mod decision;
pub mod estimate;
pub mod exit_codes;
pub mod implied;
pub mod logging;
pub mod output;
pub mod schema;
pub mod series;
pub mod simulate;
pub mod sweep;

pub use decision::{
    DecisionFunction, DecisionRule, DualThreshold, NamedRule, Observation, RuleSpec,
    SingleThreshold,
};
pub use estimate::{aggregate_campaigns, aggregate_from_counts, estimate_beta_parameters, BetaEstimate};
pub use implied::{derive_implied, ImpliedDerivation, ImpliedTarget, SkippedTarget};
pub use simulate::{simulate, simulate_with, SimulationConfig};
pub use sweep::{run_sweep, SweepCurve, SweepResult};
