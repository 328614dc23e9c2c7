//! Dated CSV export of a stage's table.

use b3fund_data::{export_records, Dataset};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;

use crate::{CollectorConfig, Result};

/// Writes `records` under the configured export directory, stamped with
/// today's local date.
pub fn export_dataset<T: Serialize>(
    config: &CollectorConfig,
    dataset: Dataset,
    records: &[T],
) -> Result<PathBuf> {
    export_dataset_on(config, dataset, records, Local::now().date_naive())
}

/// Same as [`export_dataset`] with an explicit scrape date.
pub fn export_dataset_on<T: Serialize>(
    config: &CollectorConfig,
    dataset: Dataset,
    records: &[T],
    date: NaiveDate,
) -> Result<PathBuf> {
    let dir = &config.export.dir;
    std::fs::create_dir_all(dir)?;
    let path = export_records(dataset, records, dir, date)?;

    println!(
        "{} exported: {} rows scraped on {} saved to {}",
        dataset.file_name(date),
        records.len(),
        date,
        dir.display()
    );
    tracing::info!(
        dataset = %dataset,
        path = %path.display(),
        rows = records.len(),
        "table exported"
    );

    Ok(path)
}
