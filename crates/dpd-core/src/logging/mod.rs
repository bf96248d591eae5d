//! Structured logging for dpd-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for scripted runs
//!
//! stdout is reserved for command payloads (JSON/MD output); every log line
//! goes to stderr. Each CLI invocation opens a root span carrying its
//! `run_id`, so all events of one run can be correlated.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Event targets, stable for log filtering.
pub mod event_names {
    pub const RUN_STARTED: &str = "dpd.run.started";
    pub const RUN_FINISHED: &str = "dpd.run.finished";
    pub const FIT_COMPLETED: &str = "dpd.fit.completed";
    pub const FIT_BOUNDARY_EXCLUDED: &str = "dpd.fit.boundary_excluded";
    pub const IMPLIED_SKIPPED: &str = "dpd.implied.skipped";
    pub const SIMULATE_EPSILON: &str = "dpd.simulate.epsilon";
    pub const SWEEP_CURVE: &str = "dpd.sweep.curve";
}

/// Initialize the logging subsystem.
///
/// Respects RUST_LOG when set; otherwise filters on the configured level.
/// The `dpd` directive prefix-matches both the `dpd.*` event targets and
/// the `dpd_*` crate modules.
/// A second call is a no-op.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dpd={}", config.level.as_str())));

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if !config.without_time {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init();
            } else {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init();
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(false);
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init();
        }
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // First 12 characters of the hyphenated form.
    format!("run-{}", &uuid.to_string()[..12])
}

/// Root span for one CLI invocation.
pub fn run_span(run_id: &str, command: &str) -> tracing::Span {
    tracing::info_span!("dpd", run_id = %run_id, command = %command)
}
