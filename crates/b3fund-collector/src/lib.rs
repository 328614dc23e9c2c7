//! B3 / Fundamentus collector.
//!
//! This crate wires the scrapers of `b3fund-data` into the three pipeline
//! stages and the CLI binary:
//! - company listing (B3)
//! - per-ticker metrics (Fundamentus)
//! - outer join on ticker
//!
//! Every stage can export its table as a dated CSV file.

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
