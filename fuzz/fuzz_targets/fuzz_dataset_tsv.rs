//! Fuzz target for impression-level dataset parsing.
//!
//! Tests that the reader handles arbitrary bytes, delimiters and header
//! layouts without panicking, and that whatever it accepts aggregates cleanly.

#![no_main]

use dpd_core::aggregate_campaigns;
use dpd_core::dataset::{read_impressions, DatasetOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = DatasetOptions::default();
    if let Ok(records) = read_impressions(data, &options) {
        let aggregates = aggregate_campaigns(&records);
        for aggregate in &aggregates {
            assert!(aggregate.num_conversions <= aggregate.num_impressions);
        }
    }
});
