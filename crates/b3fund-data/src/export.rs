//! CSV export and import.
//!
//! Files are comma separated, carry a header row and are encoded as
//! ISO-8859-1, the encoding spreadsheet tools pick by default for pt-BR
//! data. Characters outside Latin-1 are written as `?`.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DataError, Result};

/// The three tables the pipeline can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// B3 listing ([`crate::CompanyRecord`])
    Companies,
    /// Fundamentus metrics ([`crate::MetricsRecord`])
    Metrics,
    /// Merged table ([`crate::MergedRecord`])
    Merged,
}

impl Dataset {
    /// File name prefix, followed by `_{date}.csv`.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Companies => "B3Empresas",
            Self::Metrics => "FundamentusEmpresas",
            Self::Merged => "dadosEmpresasB3Fund",
        }
    }

    /// Header row, in field order.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Self::Companies => &[
                "Nome Empresa",
                "Nome Pregao",
                "Ticker",
                "Setor",
                "Subsetor",
                "Segmento",
            ],
            Self::Metrics => &["Ticker", "Cap", "Acoes", "VolMed2m"],
            Self::Merged => &[
                "Empresa", "Pregao", "Ticker", "Setor", "Subsetor", "Segmento", "Cap", "Acoes",
                "VolMed2m",
            ],
        }
    }

    /// `{prefix}_{YYYY-MM-DD}.csv`
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.csv", self.file_prefix(), date)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.csv", self.file_prefix())
    }
}

/// Writes `records` to `{dir}/{dataset file name}` and returns the path.
pub fn export_records<T: Serialize>(
    dataset: Dataset,
    records: &[T],
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let path = dir.join(dataset.file_name(date));
    fs::write(&path, to_csv_latin1(dataset, records)?)?;

    debug!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(path)
}

/// Serializes records as Latin-1 CSV bytes with the dataset's header row.
pub fn to_csv_latin1<T: Serialize>(dataset: Dataset, records: &[T]) -> Result<Vec<u8>> {
    // Header written by hand so empty tables still get one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(dataset.headers())?;
    for record in records {
        writer.serialize(record)?;
    }

    let utf8 = writer
        .into_inner()
        .map_err(|e| DataError::Io(e.into_error()))?;
    let text = String::from_utf8_lossy(&utf8);

    Ok(encode_latin1(&text))
}

/// Reads a CSV written by [`export_records`].
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = fs::read(path)?;
    let text = decode_latin1(&bytes);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let records = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;

    debug!(path = %path.display(), rows = records.len(), "CSV read");
    Ok(records)
}

/// UTF-8 text to ISO-8859-1 bytes.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// ISO-8859-1 bytes to text. Every byte maps to the code point of the same
/// value, so decoding cannot fail.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
