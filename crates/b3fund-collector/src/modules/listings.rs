//! B3 listing stage.

use b3fund_data::{B3ListingFetcher, CompanyRecord, Dataset};
use std::time::Instant;

use super::export::export_dataset;
use crate::{CollectionStats, CollectorConfig, Result};

/// Scrapes every listed company, one row per ticker.
pub async fn collect_listings(config: &CollectorConfig, export: bool) -> Result<Vec<CompanyRecord>> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    tracing::info!(base_url = %config.sources.b3_base_url, "B3 listing collection started");

    let fetcher = B3ListingFetcher::new(
        config.page_source()?,
        &config.sources.b3_base_url,
        config.fetch.concurrency,
    )?;

    let links = fetcher.fetch_detail_links().await?;
    stats.total = links.len();
    tracing::info!(companies = links.len(), "detail links collected");

    let records = fetcher.fetch_companies(&links).await?;
    stats.success = links.len();
    stats.rows = records.len();

    if export {
        export_dataset(config, Dataset::Companies, &records)?;
    }

    stats.elapsed = start.elapsed();
    stats.log_summary("B3 listing");

    Ok(records)
}
