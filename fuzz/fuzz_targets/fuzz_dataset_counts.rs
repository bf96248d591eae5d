//! Fuzz target for pre-aggregated campaign counts.

#![no_main]

use dpd_core::dataset::read_campaign_counts;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(aggregates) = read_campaign_counts(data, "campaign") {
        for aggregate in &aggregates {
            assert!(aggregate.num_impressions > 0);
            assert!(aggregate.num_conversions <= aggregate.num_impressions);
        }
    }
});
