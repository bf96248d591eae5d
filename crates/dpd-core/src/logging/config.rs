//! Logging configuration.
//!
//! Level: `-v`/`-q` on the command line, else `DPD_LOG`, else `RUST_LOG`,
//! else info. Format: `DPD_LOG_FORMAT` (`human` or `jsonl`).

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "human" | "pretty" => Some(LogFormat::Human),
            "jsonl" | "json" => Some(LogFormat::Jsonl),
            _ => None,
        }
    }
}

/// Minimum level for `dpd` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Level requested by `-v` (repeatable) or `-q`. None leaves it to the environment.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "quiet" => Some(LogLevel::Off),
            _ => None,
        }
    }

    /// Most verbose level named anywhere in a `RUST_LOG` directive list.
    fn from_rust_log(directives: &str) -> Option<Self> {
        directives
            .split(',')
            .filter_map(|d| Self::from_name(d.rsplit('=').next().unwrap_or(d)))
            .min()
    }

    /// Level name as used in `EnvFilter` directives.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Omit timestamps from human output.
    pub without_time: bool,
}

impl LogConfig {
    /// Resolve from the process environment.
    pub fn from_env(cli_level: Option<LogLevel>) -> Self {
        Self::resolve(cli_level, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit variable lookup.
    pub fn resolve(cli_level: Option<LogLevel>, var: impl Fn(&str) -> Option<String>) -> Self {
        let env_level = match var("DPD_LOG") {
            Some(value) => LogLevel::from_name(&value),
            None => var("RUST_LOG").and_then(|value| LogLevel::from_rust_log(&value)),
        };
        LogConfig {
            format: var("DPD_LOG_FORMAT")
                .and_then(|value| LogFormat::from_name(&value))
                .unwrap_or_default(),
            level: cli_level.or(env_level).unwrap_or_default(),
            without_time: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(cli_level: Option<LogLevel>, vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::resolve(cli_level, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = resolve(None, &[]);
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn test_dpd_log_shadows_rust_log() {
        let config = resolve(None, &[("DPD_LOG", "warning"), ("RUST_LOG", "trace")]);
        assert_eq!(config.level, LogLevel::Warn);
    }

    #[test]
    fn test_rust_log_takes_most_verbose_directive() {
        let config = resolve(None, &[("RUST_LOG", "warn,dpd_core=debug")]);
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_level_wins_and_format_from_env() {
        let config = resolve(
            LogLevel::from_verbosity(2, false),
            &[("DPD_LOG", "error"), ("DPD_LOG_FORMAT", "JSON")],
        );
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LogLevel::from_verbosity(0, false), None);
        assert_eq!(LogLevel::from_verbosity(1, false), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_verbosity(3, true), Some(LogLevel::Error));
    }
}
