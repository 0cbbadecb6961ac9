//! Newline-delimited JSON record format.

use candela_aggregate::Candle;
use std::io::Write;

use crate::{FormatError, Formatter};

/// NDJSON formatter: one candle object per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Formatter for JsonFormatter {
    fn write_candles<W: Write>(
        &self,
        candles: &[Candle],
        mut writer: W,
    ) -> Result<(), FormatError> {
        for candle in candles {
            serde_json::to_writer(&mut writer, candle)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}
