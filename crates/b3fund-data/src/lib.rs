//! Scraping and normalization of B3 listed companies.
//!
//! This crate provides:
//! - the record model of each pipeline stage
//! - a `PageSource` abstraction over HTTP fetching
//! - the B3 listing and Fundamentus metrics scrapers
//! - the ticker outer join
//! - Latin-1 CSV export and import

pub mod error;
pub mod export;
pub mod html;
pub mod merge;
pub mod model;
pub mod numeric;
pub mod provider;
pub mod source;

pub use error::{DataError, Result};
pub use export::{export_records, read_records, Dataset};
pub use merge::merge_records;
pub use model::{CompanyRecord, MergedRecord, MetricKind, MetricsRecord, SectorPath};
pub use numeric::{parse_integer, IntWidth};
pub use provider::{B3ListingFetcher, FundamentusFetcher, MetricsBatch};
pub use source::{FetcherConfig, HttpPageSource, PageSource};
