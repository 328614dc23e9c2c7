//! Environment-based configuration.

use b3fund_data::provider::{B3_BASE_URL, FUNDAMENTUS_BASE_URL};
use b3fund_data::source::DEFAULT_USER_AGENT;
use b3fund_data::{FetcherConfig, HttpPageSource};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::CollectorError;
use crate::Result;

/// Collector settings
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Site roots
    pub sources: SourceConfig,
    /// HTTP fetch settings
    pub fetch: FetcherConfig,
    /// CSV export settings
    pub export: ExportConfig,
}

/// Site roots
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// B3 listing site
    pub b3_base_url: String,
    /// Fundamentus site
    pub fundamentus_base_url: String,
}

/// CSV export settings
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory the dated CSV files are written to
    pub dir: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig {
                b3_base_url: B3_BASE_URL.to_string(),
                fundamentus_base_url: FUNDAMENTUS_BASE_URL.to_string(),
            },
            fetch: FetcherConfig::default(),
            export: ExportConfig {
                dir: PathBuf::from("."),
            },
        }
    }
}

impl CollectorConfig {
    /// Loads settings from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let export_dir = match std::env::var("EXPORT_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()?,
        };

        let config = Self {
            sources: SourceConfig {
                b3_base_url: env_var_or("B3_BASE_URL", defaults.sources.b3_base_url),
                fundamentus_base_url: env_var_or(
                    "FUNDAMENTUS_BASE_URL",
                    defaults.sources.fundamentus_base_url,
                ),
            },
            fetch: FetcherConfig {
                user_agent: env_var_or("HTTP_USER_AGENT", DEFAULT_USER_AGENT.to_string()),
                timeout: Duration::from_secs(env_var_parse(
                    "HTTP_TIMEOUT_SECS",
                    defaults.fetch.timeout.as_secs(),
                )),
                concurrency: env_var_parse("FETCH_CONCURRENCY", defaults.fetch.concurrency),
            },
            export: ExportConfig { dir: export_dir },
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects unusable values.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("B3_BASE_URL", &self.sources.b3_base_url),
            ("FUNDAMENTUS_BASE_URL", &self.sources.fundamentus_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| CollectorError::Config(format!("{name}={value:?}: {e}")))?;
        }

        if self.fetch.concurrency == 0 {
            return Err(CollectorError::Config(
                "FETCH_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// HTTP page source built from the fetch settings.
    pub fn page_source(&self) -> Result<HttpPageSource> {
        Ok(HttpPageSource::new(&self.fetch)?)
    }
}

/// Reads an env var, falling back to a default when unset.
fn env_var_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Parses an env var (falls back to the default on failure).
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
