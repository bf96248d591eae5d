//! Error types for dp-decisions.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Simulation Setup
//!   Reason: precondition violated for epsilons: every epsilon must be finite and > 0
//!   Fix: Correct the named field in the scenario and rerun.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 40,
//!   "category": "simulation",
//!   "message": "precondition violated for epsilons: every epsilon must be finite and > 0",
//!   "recoverable": true,
//!   "context": { "field": "epsilons" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for dp-decisions operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Scenario and analysis configuration errors.
    Config,
    /// Input dataset parsing and aggregation errors.
    Dataset,
    /// Beta fitting and implied-distribution errors.
    Estimation,
    /// Decision simulation setup errors.
    Simulation,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Dataset => write!(f, "dataset"),
            ErrorCategory::Estimation => write!(f, "estimation"),
            ErrorCategory::Simulation => write!(f, "simulation"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for dp-decisions.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Dataset errors (20-29)
    #[error("dataset error at line {line}: {message}")]
    Dataset { line: usize, message: String },

    #[error("dataset contains no campaigns with impressions")]
    EmptyDataset,

    // Estimation errors (30-39)
    #[error("need at least 2 campaigns with conversion rates in (0, 1), got {campaigns}")]
    InsufficientData { campaigns: usize },

    #[error("Beta fit failed: {0}")]
    FitConvergence(String),

    #[error("implied parameters for mean {mean} are infeasible: alpha={alpha}, beta={beta}")]
    InfeasibleImplied { mean: f64, alpha: f64, beta: f64 },

    // Simulation errors (40-49)
    #[error("precondition violated for {field}: {message}")]
    PreconditionViolation { field: String, message: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for precondition failures.
    pub fn precondition(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::PreconditionViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Dataset errors
    /// - 30-39: Estimation errors
    /// - 40-49: Simulation errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Dataset { .. } => 20,
            Error::EmptyDataset => 21,
            Error::InsufficientData { .. } => 30,
            Error::FitConvergence(_) => 31,
            Error::InfeasibleImplied { .. } => 32,
            Error::PreconditionViolation { .. } => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::Dataset { .. } | Error::EmptyDataset => ErrorCategory::Dataset,
            Error::InsufficientData { .. }
            | Error::FitConvergence(_)
            | Error::InfeasibleImplied { .. } => ErrorCategory::Estimation,
            Error::PreconditionViolation { .. } => ErrorCategory::Simulation,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether different input could make the same call succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::Dataset { .. } => true,
            Error::EmptyDataset => true,
            Error::InsufficientData { .. } => true,
            // Same data, same solver, same outcome.
            Error::FitConvergence(_) => false,
            Error::InfeasibleImplied { .. } => true,
            Error::PreconditionViolation { .. } => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'dpd config validate' to check the file, or 'dpd config show' to see the resolved scenario."
            }
            Error::Dataset { .. } => {
                "Check the delimiter and header row. The conversion column must hold 0/1 or true/false."
            }
            Error::EmptyDataset => {
                "The input has no data rows. Point --data at the impressions file, not its header."
            }
            Error::InsufficientData { .. } => {
                "Supply more campaigns. Campaigns with a 0% or 100% conversion rate cannot enter the fit."
            }
            Error::FitConvergence(_) => {
                "The rates may be nearly identical or extremely concentrated. Inspect the per-campaign rates."
            }
            Error::InfeasibleImplied { .. } => {
                "The fitted variance is too large for this mean. Choose a smaller target mean."
            }
            Error::PreconditionViolation { .. } => {
                "Correct the named field in the scenario and rerun."
            }
            Error::Io(_) => "Check that the path exists and is readable.",
            Error::Json(_) => "Internal serialization failure. Report with the command line used.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::Dataset { .. } => "Malformed Dataset",
            Error::EmptyDataset => "Empty Dataset",
            Error::InsufficientData { .. } => "Insufficient Data",
            Error::FitConvergence(_) => "Beta Fit Failed",
            Error::InfeasibleImplied { .. } => "Infeasible Implied Distribution",
            Error::PreconditionViolation { .. } => "Invalid Simulation Setup",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., line, field).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::Dataset { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::InsufficientData { campaigns } => {
                context.insert("campaigns".to_string(), serde_json::json!(campaigns));
            }
            Error::InfeasibleImplied { mean, alpha, beta } => {
                context.insert("mean".to_string(), serde_json::json!(mean));
                context.insert("alpha".to_string(), serde_json::json!(alpha));
                context.insert("beta".to_string(), serde_json::json!(beta));
            }
            Error::PreconditionViolation { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
