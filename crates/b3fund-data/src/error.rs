//! Error types for the scraping pipeline.

use thiserror::Error;

/// Errors raised while fetching, parsing or exporting data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure (timeout, connection refused, body decoding).
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The page did not have the expected shape.
    #[error("Unexpected page structure at {url}: {reason}")]
    Structure { url: String, reason: String },

    /// A numeric cell could not be coerced to an integer.
    #[error("Non-numeric {field} for {ticker}: {value:?}")]
    NotNumeric {
        ticker: String,
        field: &'static str,
        value: String,
    },

    /// A link could not be resolved to an absolute URL.
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A CSS selector failed to compile.
    #[error("Invalid CSS selector {0}")]
    Selector(String),

    /// CSV encoding/decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File system error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Shorthand for a structural mismatch.
    pub fn structure(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structure {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
