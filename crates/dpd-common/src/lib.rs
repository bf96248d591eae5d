//! dp-decisions common types and errors.
//!
//! This crate provides foundational types shared across dpd-core modules:
//! - Impression, campaign and decision types
//! - Common error types with stable codes
//! - Output formats for command results
//! - Schema versioning for JSON payloads

pub mod error;
pub mod output;
pub mod types;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
pub use types::{CampaignAggregate, Decision, DecisionTally, EpsilonMatches, ImpressionRecord};

/// Schema version stamped on every JSON payload and expected in config files.
pub const SCHEMA_VERSION: &str = "1.0.0";
