//! Exit codes for the dpd CLI.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes
//! - 10-19: User/input errors (recoverable by changing input)
//! - 20-29: Internal and I/O errors

use dpd_common::{Error, ErrorCategory};

/// Exit codes for dpd operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: every requested output produced
    Clean = 0,

    /// Output produced, but some implied targets were infeasible and skipped
    Partial = 1,

    /// Invalid arguments or simulation preconditions
    ArgsError = 10,

    /// Configuration file missing, unparsable or invalid
    ConfigError = 11,

    /// Input dataset malformed or empty
    DatasetError = 12,

    /// Beta fit failed or data insufficient
    EstimationError = 13,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates output was produced (codes 0-1).
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::Partial)
    }

    /// Check if this exit code is a user/input error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Check if this exit code indicates any error requiring attention.
    pub fn is_error(self) -> bool {
        self.as_i32() >= 10
    }

    /// Get the exit code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::Partial => "OK_PARTIAL",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::DatasetError => "ERR_DATASET",
            ExitCode::EstimationError => "ERR_ESTIMATION",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Json(_) => ExitCode::InternalError,
            _ => match err.category() {
                ErrorCategory::Config => ExitCode::ConfigError,
                ErrorCategory::Dataset => ExitCode::DatasetError,
                ErrorCategory::Estimation => ExitCode::EstimationError,
                ErrorCategory::Simulation => ExitCode::ArgsError,
                ErrorCategory::Io => ExitCode::IoError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
