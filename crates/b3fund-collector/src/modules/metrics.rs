//! Fundamentus metrics stage.

use b3fund_data::{CompanyRecord, Dataset, FundamentusFetcher, MetricsRecord};
use std::time::Instant;

use super::export::export_dataset;
use crate::{CollectionStats, CollectorConfig, Result};

/// Fetches the metrics of every ticker in `companies`.
///
/// Tickers are taken as they appear, repeats included. Tickers unknown to
/// Fundamentus are skipped.
pub async fn collect_metrics(
    config: &CollectorConfig,
    companies: &[CompanyRecord],
    export: bool,
) -> Result<Vec<MetricsRecord>> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    let tickers: Vec<&str> = companies.iter().map(|c| c.ticker.as_str()).collect();
    stats.total = tickers.len();

    tracing::info!(
        base_url = %config.sources.fundamentus_base_url,
        tickers = tickers.len(),
        "Fundamentus metrics collection started"
    );

    if tickers.is_empty() {
        tracing::warn!("no tickers to collect");
    }

    let fetcher = FundamentusFetcher::new(
        config.page_source()?,
        &config.sources.fundamentus_base_url,
        config.fetch.concurrency,
    )?;
    let batch = fetcher.fetch_batch(&tickers).await?;

    for (kind, width) in batch.column_widths() {
        tracing::info!(column = kind.column(), %width, "narrowest column type");
    }
    if !batch.skipped.is_empty() {
        tracing::info!(skipped = ?batch.skipped, "tickers without metrics page");
    }

    stats.success = batch.records.len();
    stats.skipped = batch.skipped.len();
    stats.rows = batch.records.len();

    if export {
        export_dataset(config, Dataset::Metrics, &batch.records)?;
    }

    stats.elapsed = start.elapsed();
    stats.log_summary("Fundamentus metrics");

    Ok(batch.records)
}
