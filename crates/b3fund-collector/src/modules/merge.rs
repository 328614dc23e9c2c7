//! Merge stage.

use b3fund_data::{merge_records, CompanyRecord, Dataset, MergedRecord, MetricsRecord};
use std::time::Instant;

use super::export::export_dataset;
use crate::{CollectionStats, CollectorConfig, Result};

/// Outer-joins the listing and the metrics on ticker.
pub fn merge(
    config: &CollectorConfig,
    companies: &[CompanyRecord],
    metrics: &[MetricsRecord],
    export: bool,
) -> Result<Vec<MergedRecord>> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();
    stats.total = companies.len() + metrics.len();

    let merged = merge_records(companies, metrics);
    stats.success = merged.len();
    stats.rows = merged.len();

    tracing::info!(
        companies = companies.len(),
        metrics = metrics.len(),
        rows = merged.len(),
        "tables merged"
    );

    if export {
        export_dataset(config, Dataset::Merged, &merged)?;
    }

    stats.elapsed = start.elapsed();
    stats.log_summary("merge");

    Ok(merged)
}
