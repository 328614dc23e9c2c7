//! Site-specific scrapers.
//!
//! ## B3
//! - `B3ListingFetcher`: alphabetical listing, detail page, summary frame
//! - company name, trading name, tickers, sector classification
//!
//! ## Fundamentus
//! - `FundamentusFetcher`: one detail page per ticker
//! - market cap, shares outstanding, average volume (2 months)

pub mod b3;
pub mod fundamentus;

pub use b3::{B3ListingFetcher, CompanySummary, DetailPage, B3_BASE_URL};
pub use fundamentus::{FundamentusFetcher, MetricsBatch, FUNDAMENTUS_BASE_URL};
