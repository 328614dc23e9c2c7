//! B3 / Fundamentus collector CLI.

use anyhow::Context;
use b3fund_data::{read_records, CompanyRecord, MetricsRecord};
use b3fund_collector::{modules, CollectorConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "b3fund-collector")]
#[command(about = "B3 listed companies and Fundamentus metrics collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the B3 company listing
    Listings {
        /// Write B3Empresas_{date}.csv
        #[arg(long)]
        export: bool,
    },

    /// Fetch Fundamentus metrics for the tickers of a listing CSV
    Metrics {
        /// Listing CSV produced by `listings --export`
        #[arg(long)]
        companies: PathBuf,

        /// Write FundamentusEmpresas_{date}.csv
        #[arg(long)]
        export: bool,
    },

    /// Merge a listing CSV with a metrics CSV
    Merge {
        /// Listing CSV produced by `listings --export`
        #[arg(long)]
        companies: PathBuf,

        /// Metrics CSV produced by `metrics --export`
        #[arg(long)]
        metrics: PathBuf,

        /// Write dadosEmpresasB3Fund_{date}.csv
        #[arg(long)]
        export: bool,
    },

    /// Run listing, metrics and merge in order
    RunAll {
        /// Export every stage's table
        #[arg(long)]
        export: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "b3fund_collector={level},b3fund_data={level}",
                    level = cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("b3fund collector started");

    let config = CollectorConfig::from_env().context("failed to load configuration")?;
    tracing::debug!(
        b3 = %config.sources.b3_base_url,
        fundamentus = %config.sources.fundamentus_base_url,
        concurrency = config.fetch.concurrency,
        export_dir = %config.export.dir.display(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Listings { export } => {
            modules::collect_listings(&config, export).await?;
        }
        Commands::Metrics { companies, export } => {
            let companies: Vec<CompanyRecord> = load(&companies)?;
            modules::collect_metrics(&config, &companies, export).await?;
        }
        Commands::Merge {
            companies,
            metrics,
            export,
        } => {
            let companies: Vec<CompanyRecord> = load(&companies)?;
            let metrics: Vec<MetricsRecord> = load(&metrics)?;
            modules::merge(&config, &companies, &metrics, export)?;
        }
        Commands::RunAll { export } => {
            modules::run_all(&config, export).await?;
        }
    }

    tracing::info!("b3fund collector finished");

    Ok(())
}

fn load<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    read_records(path).with_context(|| format!("failed to read {}", path.display()))
}
