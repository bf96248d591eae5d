//! dp-decisions configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the analysis, simulation and privacy-bound settings
//! - Named simulation presets
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod analysis;
pub mod preset;
pub mod resolve;
pub mod scenario;
pub mod validate;

pub use analysis::{AnalysisConfig, PrivacyBoundConfig};
pub use preset::{get_preset, list_presets, PresetError, PresetName};
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use scenario::{
    BandRuleEntry, EpsilonGrid, ExponentRange, RuleSet, SimulationScenario, SingleRuleEntry,
};
pub use validate::{validate_config, ValidationError, ValidationResult};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Preset(#[from] PresetError),
}

/// Complete configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub analysis: AnalysisConfig,
    pub simulation: SimulationScenario,
    pub privacy_bound: PrivacyBoundConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            analysis: AnalysisConfig::default(),
            simulation: SimulationScenario::default(),
            privacy_bound: PrivacyBoundConfig::default(),
        }
    }
}

impl Config {
    /// Load from a file: TOML for `.toml`, JSON otherwise. Not validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            Self::from_toml_str(&content).map_err(|message| ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            })
        } else {
            Self::from_json_str(&content).map_err(|message| ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            })
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_json_str(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Load and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::from_file(path)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Resolve, load and validate; built-in defaults when nothing is found.
    pub fn load_resolved(cli_path: Option<&Path>) -> Result<(Self, ConfigPath), ConfigError> {
        let resolved = resolve_config(cli_path);
        let config = match &resolved.path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok((config, resolved))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }
}
