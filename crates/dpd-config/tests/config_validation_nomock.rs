//! No-mock configuration validation + resolution tests.
//!
//! Covers:
//! - Loading TOML and JSON files from disk
//! - Semantic validation failures surfacing through `Config::load`
//! - Resolution order (CLI > DPD_CONFIG > DPD_CONFIG_DIR > defaults)
//! - Preset determinism

use dpd_config::preset::{get_preset, list_presets, PresetName};
use dpd_config::resolve::{resolve_config, ConfigSource, ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use dpd_config::{Config, ConfigError, RuleSet, ValidationError};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const VALID_TOML: &str = r#"
schema_version = "1.0.0"

[analysis]
target_means = [0.01, 0.05]
campaign_column = "campaign"
conversion_column = "conversion"
pdf_points = 200

[simulation]
title = "Band rules"
alpha = 2.0
beta = 198.0
sensitivity = 1.0
trials = 2000
seed = 42
n_exponents = { start = 3, end = 5 }
epsilons = { base = 2.0, exp_start = -4, exp_end = 4 }

[simulation.rules]
kind = "band"
entries = [
    { name = "P50/P60", lower = 0.5, upper = 0.6 },
    { name = "P30/P50", lower = 0.3, upper = 0.5 },
]

[privacy_bound]
mu = [0.0, 1.0]
epsilon = 3.0
points = 500
"#;

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write config");
}

#[test]
fn test_load_valid_toml() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scenario.toml");
    write_file(&path, VALID_TOML);

    let config = Config::load(&path).expect("valid config should load");
    assert_eq!(config.simulation.seed, Some(42));
    assert_eq!(config.simulation.epsilons.values().len(), 8);
    match &config.simulation.rules {
        RuleSet::Band(entries) => assert_eq!(entries.len(), 2),
        other => panic!("expected band rules, got {:?}", other),
    }
    assert_eq!(config.privacy_bound.points, 500);
}

#[test]
fn test_load_json_by_extension() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scenario.json");
    let json = serde_json::to_string_pretty(&Config::default()).expect("serialize");
    write_file(&path, &json);

    let config = Config::load(&path).expect("json config should load");
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_rejects_invalid_percentile() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bad.toml");
    write_file(
        &path,
        &VALID_TOML.replace("lower = 0.3, upper = 0.5", "lower = 0.3, upper = 1.5"),
    );

    let err = Config::load(&path).expect_err("percentile > 1 should fail");
    match err {
        ConfigError::Invalid(ValidationError::InvalidValue { field, .. }) => {
            assert_eq!(field, "simulation.rules.P30/P50.upper");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_load_reports_parse_errors_with_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.toml");
    write_file(&path, "[simulation\nalpha = 2.0");

    let err = Config::load(&path).expect_err("broken toml should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_load_missing_file_is_read_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = Config::load(&dir.path().join("absent.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_resolution_prefers_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().expect("tempdir");
        let cli = dir.path().join("cli.toml");
        let env_path = dir.path().join("env.toml");
        write_file(&cli, VALID_TOML);
        write_file(&env_path, VALID_TOML);
        env::set_var(ENV_CONFIG_PATH, &env_path);

        let resolved = resolve_config(Some(&cli));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path.as_deref(), Some(cli.as_path()));

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.as_deref(), Some(env_path.as_path()));
    });
}

#[test]
fn test_resolution_uses_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().expect("tempdir");
        write_file(&dir.path().join("config.toml"), VALID_TOML);
        env::remove_var(ENV_CONFIG_PATH);
        env::set_var(ENV_CONFIG_DIR, dir.path());

        let (config, resolved) = Config::load_resolved(None).expect("load from config dir");
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(config.simulation.title, "Band rules");
    });
}

#[test]
fn test_resolution_skips_missing_env_path() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().expect("tempdir");
        env::set_var(ENV_CONFIG_PATH, dir.path().join("nope.toml"));
        env::set_var(ENV_CONFIG_DIR, dir.path().join("nowhere"));

        let resolved = resolve_config(None);
        assert_ne!(resolved.source, ConfigSource::Environment);
    });
}

#[test]
fn test_presets_are_deterministic_and_valid() {
    for (name, _) in list_presets() {
        let a = get_preset(name);
        let b = get_preset(name);
        assert_eq!(a, b);
        dpd_config::validate::validate_scenario(&a).expect("preset must validate");
    }
    assert_eq!(
        get_preset(PresetName::Maintain).rules.kind(),
        "band"
    );
}
