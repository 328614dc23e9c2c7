//! Record types produced by each pipeline stage.
//!
//! Field renames match the CSV headers written by [`crate::export`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the levels of a B3 sector classification.
pub const SECTOR_SEPARATOR: &str = " / ";

/// One row per (company, ticker) pair from the B3 listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Registered company name
    #[serde(rename = "Nome Empresa")]
    pub company_name: String,
    /// Name shown on the trading screen
    #[serde(rename = "Nome Pregao")]
    pub traded_name: String,
    /// Exchange symbol (e.g. PETR4)
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Setor")]
    pub sector: String,
    #[serde(rename = "Subsetor")]
    pub subsector: Option<String>,
    #[serde(rename = "Segmento")]
    pub segment: Option<String>,
}

impl CompanyRecord {
    /// Builds a row from the raw fields scraped for one ticker.
    pub fn new(
        company_name: impl Into<String>,
        traded_name: impl Into<String>,
        ticker: impl Into<String>,
        sector: &SectorPath,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            traded_name: traded_name.into(),
            ticker: ticker.into(),
            sector: sector.sector.clone(),
            subsector: sector.subsector.clone(),
            segment: sector.segment.clone(),
        }
    }
}

/// Sector / subsector / segment classification.
///
/// Built from a single delimited string such as
/// `"Financeiro / Intermediários Financeiros / Bancos"`. Paths with fewer
/// than three levels leave the trailing levels empty; anything past the
/// third level stays in `segment`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectorPath {
    pub sector: String,
    pub subsector: Option<String>,
    pub segment: Option<String>,
}

impl SectorPath {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.trim().splitn(3, SECTOR_SEPARATOR).map(str::to_string);

        Self {
            sector: parts.next().unwrap_or_default(),
            subsector: parts.next(),
            segment: parts.next(),
        }
    }
}

/// Financial metrics for one ticker from Fundamentus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsRecord {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    /// Market capitalization (BRL)
    #[serde(rename = "Cap")]
    pub market_cap: i64,
    /// Number of outstanding shares
    #[serde(rename = "Acoes")]
    pub shares_outstanding: i64,
    /// Average daily traded volume over the last two months (BRL)
    #[serde(rename = "VolMed2m")]
    pub avg_volume_2m: i64,
}

impl MetricsRecord {
    /// Value of one metric column.
    pub fn value(&self, kind: MetricKind) -> i64 {
        match kind {
            MetricKind::MarketCap => self.market_cap,
            MetricKind::SharesOutstanding => self.shares_outstanding,
            MetricKind::AvgVolume2m => self.avg_volume_2m,
        }
    }
}

/// Outer join of [`CompanyRecord`] and [`MetricsRecord`] on ticker.
///
/// Company fields are `None` for tickers only known to Fundamentus; the
/// numeric fields are always present and default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(rename = "Empresa")]
    pub company_name: Option<String>,
    #[serde(rename = "Pregao")]
    pub traded_name: Option<String>,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Setor")]
    pub sector: Option<String>,
    #[serde(rename = "Subsetor")]
    pub subsector: Option<String>,
    #[serde(rename = "Segmento")]
    pub segment: Option<String>,
    #[serde(rename = "Cap")]
    pub market_cap: i64,
    #[serde(rename = "Acoes")]
    pub shares_outstanding: i64,
    #[serde(rename = "VolMed2m")]
    pub avg_volume_2m: i64,
}

/// The metrics read from a Fundamentus detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    MarketCap,
    SharesOutstanding,
    AvgVolume2m,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::MarketCap,
        MetricKind::SharesOutstanding,
        MetricKind::AvgVolume2m,
    ];

    /// Maps a label cell to a metric.
    ///
    /// Fundamentus prefixes labels with a `?` tooltip marker, and the text
    /// drifts between accented and plain spellings, so matching is done on
    /// a lowercased, marker-free form.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label
            .trim()
            .trim_start_matches('?')
            .trim()
            .to_lowercase()
            .replace('ç', "c")
            .replace(['õ', 'ó'], "o")
            .replace('é', "e");

        if normalized.contains("valor de mercado")
            || normalized.contains("market cap")
            || normalized == "cap"
        {
            Some(Self::MarketCap)
        } else if normalized.contains("acoes") || normalized.contains("shares") {
            Some(Self::SharesOutstanding)
        } else if normalized.starts_with("vol")
            && (normalized.contains("2m") || normalized.contains("2 m"))
        {
            Some(Self::AvgVolume2m)
        } else {
            None
        }
    }

    /// Column name used in exported tables.
    pub fn column(&self) -> &'static str {
        match self {
            Self::MarketCap => "Cap",
            Self::SharesOutstanding => "Acoes",
            Self::AvgVolume2m => "VolMed2m",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
