//! CLI help and argument-parsing tests for dpd.
//!
//! These tests verify that every command displays its help text and that
//! malformed invocations are rejected by the parser.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the dpd binary.
fn dpd() -> Command {
    cargo_bin_cmd!("dpd")
}

// ============================================================================
// Top-level Help Tests
// ============================================================================

mod top_level {
    use super::*;

    #[test]
    fn help_flag_works() {
        dpd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("dp-decisions"));
    }

    #[test]
    fn version_flag_works() {
        dpd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("dpd"));
    }

    #[test]
    fn help_shows_all_commands() {
        dpd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("fit"))
            .stdout(predicate::str::contains("implied"))
            .stdout(predicate::str::contains("simulate"))
            .stdout(predicate::str::contains("privacy-bound"))
            .stdout(predicate::str::contains("convergence"))
            .stdout(predicate::str::contains("config"));
    }

    #[test]
    fn help_shows_global_options() {
        dpd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--format"))
            .stdout(predicate::str::contains("--seed"))
            .stdout(predicate::str::contains("--config"));
    }
}

// ============================================================================
// Subcommand Help Tests
// ============================================================================

mod subcommands {
    use super::*;

    #[test]
    fn fit_help_lists_dataset_options() {
        dpd()
            .args(["fit", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--data"))
            .stdout(predicate::str::contains("--means"))
            .stdout(predicate::str::contains("--counts"));
    }

    #[test]
    fn simulate_help_lists_sweep_options() {
        dpd()
            .args(["simulate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--preset"))
            .stdout(predicate::str::contains("--trials"))
            .stdout(predicate::str::contains("--exp-start"));
    }

    #[test]
    fn privacy_bound_help_lists_subcommands() {
        dpd()
            .args(["privacy-bound", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("curves"))
            .stdout(predicate::str::contains("prob"));
    }

    #[test]
    fn config_help_lists_subcommands() {
        dpd()
            .args(["config", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("show"))
            .stdout(predicate::str::contains("validate"))
            .stdout(predicate::str::contains("presets"));
    }
}

// ============================================================================
// Parser Rejections
// ============================================================================

mod invalid_arguments {
    use super::*;

    #[test]
    fn unknown_command_fails() {
        dpd()
            .arg("nonexistent-command")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_preset_fails() {
        dpd()
            .args(["simulate", "--preset", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown preset"));
    }

    #[test]
    fn fit_requires_data() {
        dpd()
            .arg("fit")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--data"));
    }

    #[test]
    fn invalid_format_fails() {
        dpd()
            .args(["--format", "xml", "version"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}
