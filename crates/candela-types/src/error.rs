//! Error types for candela core types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced when constructing or parsing a [`Period`](crate::Period).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// A period must be at least one second long.
    #[error("Period must be at least one second")]
    Zero,

    /// The string could not be parsed as a period.
    #[error("Invalid period '{0}', expected e.g. 30s, 1m, 2m, 10m, 1h")]
    Parse(String),

    /// The period does not fit in the supported range.
    #[error("Period '{0}' is too long")]
    Overflow(String),
}

/// Errors for price ticks that must not enter the aggregation pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickError {
    /// The ticker symbol is empty or whitespace.
    #[error("Tick at {timestamp} has a blank ticker")]
    BlankTicker {
        /// Timestamp of the rejected tick.
        timestamp: DateTime<Utc>,
    },

    /// The price is NaN, infinite, zero or negative.
    #[error("Tick for {ticker} at {timestamp} has invalid value {value}")]
    InvalidValue {
        /// Ticker of the rejected tick.
        ticker: String,
        /// Timestamp of the rejected tick.
        timestamp: DateTime<Utc>,
        /// The offending value.
        value: f64,
    },
}
