//! Numeric coercion for scraped cells.

use std::fmt;

/// Parses a pt-BR formatted integer ("1.234.567" -> 1234567).
///
/// Dots are thousands separators and are dropped together with any
/// whitespace (including non-breaking spaces). Anything else that is not a
/// digit or a leading minus sign makes the cell non-numeric.
pub fn parse_integer(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    cleaned.parse().ok()
}

/// Narrowest signed integer type able to hold a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

impl IntWidth {
    /// Width needed by a single value.
    pub fn of(value: i64) -> Self {
        if i8::try_from(value).is_ok() {
            Self::I8
        } else if i16::try_from(value).is_ok() {
            Self::I16
        } else if i32::try_from(value).is_ok() {
            Self::I32
        } else {
            Self::I64
        }
    }

    /// Width needed by a whole column. An empty column is `I8`.
    pub fn narrowest<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        values
            .into_iter()
            .map(Self::of)
            .max()
            .unwrap_or(Self::I8)
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8 => write!(f, "int8"),
            Self::I16 => write!(f, "int16"),
            Self::I32 => write!(f, "int32"),
            Self::I64 => write!(f, "int64"),
        }
    }
}
