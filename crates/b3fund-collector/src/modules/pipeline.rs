//! Full pipeline: listing, metrics, merge.

use b3fund_data::{CompanyRecord, MergedRecord, MetricsRecord};

use super::{collect_listings, collect_metrics, merge};
use crate::{CollectorConfig, Result};

/// Tables produced by one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub companies: Vec<CompanyRecord>,
    pub metrics: Vec<MetricsRecord>,
    pub merged: Vec<MergedRecord>,
}

/// Runs the three stages in order. The first failing stage aborts the run.
pub async fn run_all(config: &CollectorConfig, export: bool) -> Result<PipelineOutput> {
    tracing::info!("=== pipeline started ===");

    tracing::info!("Step 1/3: B3 listing");
    let companies = collect_listings(config, export).await?;

    tracing::info!("Step 2/3: Fundamentus metrics");
    let metrics = collect_metrics(config, &companies, export).await?;

    tracing::info!("Step 3/3: merge");
    let merged = merge(config, &companies, &metrics, export)?;

    tracing::info!(rows = merged.len(), "=== pipeline finished ===");

    Ok(PipelineOutput {
        companies,
        metrics,
        merged,
    })
}
