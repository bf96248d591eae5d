//! Campaign aggregation and Beta parameter estimation.

use std::collections::BTreeMap;

use dpd_common::{CampaignAggregate, Error, ImpressionRecord, Result};
use dpd_math::{fit_beta_mle, BetaFitError, BetaParams};
use serde::Serialize;

use crate::logging::event_names;

/// Group impression records by campaign.
///
/// Output is ordered by campaign id. Every group has at least one impression,
/// since groups only exist for ids that appear in the input.
pub fn aggregate_campaigns(records: &[ImpressionRecord]) -> Vec<CampaignAggregate> {
    let mut groups: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.campaign_id.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if record.converted {
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .filter_map(|(id, (impressions, conversions))| {
            CampaignAggregate::new(id, impressions, conversions)
        })
        .collect()
}

/// Build aggregates from (id, impressions, conversions) triples.
///
/// Zero-impression groups are dropped. Conversions exceeding impressions are
/// a dataset error naming the 1-based triple index.
pub fn aggregate_from_counts<S: AsRef<str>>(
    counts: &[(S, u64, u64)],
) -> Result<Vec<CampaignAggregate>> {
    let mut aggregates = Vec::with_capacity(counts.len());
    for (idx, (id, impressions, conversions)) in counts.iter().enumerate() {
        if *impressions == 0 {
            continue;
        }
        let aggregate = CampaignAggregate::new(id.as_ref(), *impressions, *conversions)
            .ok_or_else(|| Error::Dataset {
                line: idx + 1,
                message: format!(
                    "campaign '{}' has {} conversions but only {} impressions",
                    id.as_ref(),
                    conversions,
                    impressions
                ),
            })?;
        aggregates.push(aggregate);
    }
    Ok(aggregates)
}

/// Fitted Beta parameters with fit diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct BetaEstimate {
    pub params: BetaParams,
    /// Campaigns supplied.
    pub campaigns: usize,
    /// Campaigns whose rates entered the fit.
    pub fitted_campaigns: usize,
    /// Campaigns with a rate of exactly 0 or 1, excluded from the fit.
    pub boundary_excluded: usize,
    pub iterations: usize,
    pub log_likelihood: f64,
}

/// Fit Beta(α, β) to campaign conversion rates by maximum likelihood.
///
/// Rates of exactly 0 or 1 have zero density under any Beta with finite
/// shapes, so those campaigns are left out of the fit and counted.
pub fn estimate_beta_parameters(aggregates: &[CampaignAggregate]) -> Result<BetaEstimate> {
    if aggregates.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let rates: Vec<f64> = aggregates
        .iter()
        .filter(|a| !a.is_boundary())
        .map(|a| a.conversion_rate)
        .collect();
    let boundary_excluded = aggregates.len() - rates.len();
    if boundary_excluded > 0 {
        tracing::warn!(
            target: event_names::FIT_BOUNDARY_EXCLUDED,
            excluded = boundary_excluded,
            campaigns = aggregates.len(),
            "campaigns with conversion rate 0 or 1 excluded from fit"
        );
    }
    if rates.len() < 2 {
        return Err(Error::InsufficientData {
            campaigns: rates.len(),
        });
    }

    let fit = fit_beta_mle(&rates).map_err(|err| match err {
        BetaFitError::InsufficientData { samples } => Error::InsufficientData { campaigns: samples },
        other => Error::FitConvergence(other.to_string()),
    })?;

    tracing::info!(
        target: event_names::FIT_COMPLETED,
        alpha = fit.params.alpha,
        beta = fit.params.beta,
        iterations = fit.iterations,
        campaigns = rates.len(),
        "fitted Beta distribution"
    );

    Ok(BetaEstimate {
        params: fit.params,
        campaigns: aggregates.len(),
        fitted_campaigns: rates.len(),
        boundary_excluded,
        iterations: fit.iterations,
        log_likelihood: fit.log_likelihood,
    })
}
