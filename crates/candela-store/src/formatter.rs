//! Record format abstraction.

use candela_aggregate::Candle;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Record format of the persisted candle logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV rows: `ticker,timestamp,open,high,low,close`.
    #[default]
    Csv,
    /// Newline-delimited JSON, one candle object per line.
    Ndjson,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Ndjson]
    }

    /// Encodes candles into `writer`, prefixed by a header row when asked
    /// and the format has one.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn encode<W: Write>(
        &self,
        candles: &[Candle],
        with_header: bool,
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new()
                .with_header(with_header)
                .write_candles(candles, writer),
            Self::Ndjson => JsonFormatter::new().write_candles(candles, writer),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "ndjson" | "jsonl" | "json" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for candle record formatters.
pub trait Formatter: Send + Sync {
    /// Writes candles to the output, one record each.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_candles<W: Write>(&self, candles: &[Candle], writer: W) -> Result<(), FormatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_extension_matches_display() {
        for format in OutputFormat::all() {
            assert_eq!(format.to_string(), format.extension());
        }
    }
}
