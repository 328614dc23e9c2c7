//! Error types.

use b3fund_data::DataError;
use std::fmt;

/// Collector error type
#[derive(Debug)]
pub enum CollectorError {
    /// Scraping, parsing or export failure
    Data(DataError),
    /// Invalid configuration
    Config(String),
    /// File system error outside the export itself
    Io(std::io::Error),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(e) => write!(f, "{}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Data(e) => Some(e),
            Self::Config(_) => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CollectorError>;
