//! Fuzz target for configuration parsing.
//!
//! Tests that JSON and TOML configuration parsing and validation handle
//! arbitrary input without panicking.

#![no_main]

use dpd_config::{validate_config, Config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parse errors are expected; panics are not.
    if let Ok(config) = serde_json::from_slice::<Config>(data) {
        let _ = validate_config(&config);
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = Config::from_toml_str(text) {
            let _ = validate_config(&config);
        }
    }
});
