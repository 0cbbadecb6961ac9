//! Price tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TickError;

/// A single price observation for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    /// Ticker symbol (e.g. `AAPL`).
    pub ticker: String,
    /// Observed price.
    pub value: f64,
    /// Timestamp of the observation (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PriceTick {
    /// Creates a new price tick.
    #[must_use]
    pub fn new(ticker: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            ticker: ticker.into(),
            value,
            timestamp,
        }
    }

    /// Checks that the tick can be aggregated.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker is blank or the value is not a finite
    /// positive number.
    pub fn validate(&self) -> Result<(), TickError> {
        if self.ticker.trim().is_empty() {
            return Err(TickError::BlankTicker {
                timestamp: self.timestamp,
            });
        }
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(TickError::InvalidValue {
                ticker: self.ticker.clone(),
                timestamp: self.timestamp,
                value: self.value,
            });
        }
        Ok(())
    }
}
