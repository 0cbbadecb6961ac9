//! CSV record format.

use candela_aggregate::Candle;
use std::borrow::Cow;
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
///
/// The ticker is quoted following RFC 4180 when it contains a comma, a
/// double quote or a line break, so every record keeps six fields.
#[derive(Debug, Clone, Default)]
pub struct CsvFormatter {
    /// Whether to include header row.
    include_header: bool,
}

impl CsvFormatter {
    /// Creates a new CSV formatter without a header row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_header: false,
        }
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }
}

/// Returns `field` as a CSV field, quoted and with doubled quotes if needed.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

impl Formatter for CsvFormatter {
    fn write_candles<W: Write>(
        &self,
        candles: &[Candle],
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.include_header {
            writeln!(writer, "ticker,timestamp,open,high,low,close")?;
        }

        for candle in candles {
            writeln!(
                writer,
                "{},{},{},{},{},{}",
                escape(&candle.ticker),
                candle.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
                candle.open,
                candle.high,
                candle.low,
                candle.close
            )?;
        }

        Ok(())
    }
}
