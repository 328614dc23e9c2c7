//! Fundamentus detail page scraper.
//!
//! Reads market cap, share count and two-month average volume from
//! `detalhes.php?papel={ticker}`. Unknown tickers render an error page with
//! an `h1` heading; those are skipped, not reported as failures.

use futures::stream::{self, StreamExt, TryStreamExt};
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use tracing::{info, warn};
use url::Url;

use super::b3::{join, parse_base};
use crate::error::{DataError, Result};
use crate::html::{selector, text_of};
use crate::model::{MetricKind, MetricsRecord};
use crate::numeric::{parse_integer, IntWidth};
use crate::source::PageSource;

/// Default Fundamentus site root.
pub const FUNDAMENTUS_BASE_URL: &str = "http://fundamentus.com.br/";

/// Where a label/value pair sits in the page (0-based indices over all
/// `table`, then the `tr` and `td` descendants of that table).
#[derive(Debug, Clone, Copy)]
struct CellPair {
    table: usize,
    row: usize,
    label: usize,
    value: usize,
}

/// Market cap, shares outstanding, average volume (2m).
const CELL_PAIRS: [CellPair; 3] = [
    CellPair { table: 1, row: 0, label: 0, value: 1 },
    CellPair { table: 1, row: 1, label: 2, value: 3 },
    CellPair { table: 0, row: 4, label: 2, value: 3 },
];

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct MetricsBatch {
    /// One record per ticker with a metrics page, in input order
    pub records: Vec<MetricsRecord>,
    /// Tickers whose page reported "not found"
    pub skipped: Vec<String>,
}

impl MetricsBatch {
    /// Narrowest integer width of each numeric column.
    pub fn column_widths(&self) -> [(MetricKind, IntWidth); 3] {
        MetricKind::ALL.map(|kind| {
            (kind, IntWidth::narrowest(self.records.iter().map(|r| r.value(kind))))
        })
    }
}

/// Scraper for Fundamentus ticker pages.
pub struct FundamentusFetcher<S> {
    source: S,
    base_url: Url,
    concurrency: usize,
}

impl<S: PageSource> FundamentusFetcher<S> {
    pub fn new(source: S, base_url: &str, concurrency: usize) -> Result<Self> {
        Ok(Self {
            source,
            base_url: parse_base(base_url)?,
            concurrency: concurrency.max(1),
        })
    }

    /// Detail page of a ticker.
    pub fn detail_url(&self, ticker: &str) -> Result<Url> {
        let mut url = join(&self.base_url, "detalhes.php")?;
        url.query_pairs_mut().append_pair("papel", ticker);
        Ok(url)
    }

    /// Metrics of one ticker, `None` if Fundamentus does not know it.
    pub async fn fetch_metrics(&self, ticker: &str) -> Result<Option<MetricsRecord>> {
        let url = self.detail_url(ticker)?;
        let html = self.source.fetch(&url).await?;

        let record = parse_metrics_page(&html, ticker, &url)?;
        if record.is_none() {
            warn!(ticker, "no Fundamentus page, skipping");
        }

        Ok(record)
    }

    /// Fetches every ticker in order. Repeated tickers are fetched again.
    pub async fn fetch_batch<T: AsRef<str>>(&self, tickers: &[T]) -> Result<MetricsBatch> {
        let pages: Vec<(String, Option<MetricsRecord>)> = stream::iter(tickers.iter())
            .map(|ticker| async move {
                let ticker = ticker.as_ref();
                let record = self.fetch_metrics(ticker).await?;
                Ok::<_, DataError>((ticker.to_string(), record))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut batch = MetricsBatch::default();
        for (ticker, record) in pages {
            match record {
                Some(record) => batch.records.push(record),
                None => batch.skipped.push(ticker),
            }
        }

        info!(
            rows = batch.records.len(),
            skipped = batch.skipped.len(),
            "Fundamentus metrics collected"
        );

        Ok(batch)
    }
}

/// Parses a Fundamentus detail page.
///
/// Any `h1` means the error page. A restructured page that happens to gain
/// an `h1` is skipped the same way; there is no stronger signal to check.
pub fn parse_metrics_page(html: &str, ticker: &str, url: &Url) -> Result<Option<MetricsRecord>> {
    let document = Html::parse_document(html);

    if document.select(&selector("h1")?).next().is_some() {
        return Ok(None);
    }

    let tables: Vec<ElementRef<'_>> = document.select(&selector("table")?).collect();
    let tr = selector("tr")?;
    let td = selector("td")?;

    let mut values: HashMap<MetricKind, i64> = HashMap::with_capacity(CELL_PAIRS.len());

    for pair in CELL_PAIRS {
        let missing = |what: &str| {
            DataError::structure(
                url.as_str(),
                format!(
                    "{what} missing at table {}, row {}, cells {}/{}",
                    pair.table, pair.row, pair.label, pair.value
                ),
            )
        };

        let table = tables.get(pair.table).ok_or_else(|| missing("table"))?;
        let row = table.select(&tr).nth(pair.row).ok_or_else(|| missing("row"))?;
        let cells: Vec<ElementRef<'_>> = row.select(&td).collect();

        let label = cells
            .get(pair.label)
            .map(|c| text_of(*c))
            .ok_or_else(|| missing("label cell"))?;
        let raw = cells
            .get(pair.value)
            .map(|c| text_of(*c))
            .ok_or_else(|| missing("value cell"))?;

        let kind = MetricKind::from_label(&label).ok_or_else(|| {
            DataError::structure(url.as_str(), format!("unrecognized metric label {label:?}"))
        })?;

        let value = parse_integer(&raw).ok_or_else(|| DataError::NotNumeric {
            ticker: ticker.to_string(),
            field: kind.column(),
            value: raw.clone(),
        })?;

        values.insert(kind, value);
    }

    let get = |kind: MetricKind| {
        values.get(&kind).copied().ok_or_else(|| {
            DataError::structure(url.as_str(), format!("metric {kind} not found on page"))
        })
    };

    Ok(Some(MetricsRecord {
        ticker: ticker.to_string(),
        market_cap: get(MetricKind::MarketCap)?,
        shares_outstanding: get(MetricKind::SharesOutstanding)?,
        avg_volume_2m: get(MetricKind::AvgVolume2m)?,
    }))
}
