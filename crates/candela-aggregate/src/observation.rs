//! Input events of an aggregation stage.

use candela_types::PriceTick;
use chrono::{DateTime, Utc};

use crate::Candle;

/// An observation folded by a [`CandleAggregator`](crate::CandleAggregator).
///
/// The first stage consumes raw prices; every later stage consumes the
/// candles finished by the stage before it.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// A raw price tick.
    Price(PriceTick),
    /// A finished candle of a finer period.
    Candle(Candle),
}

impl Observation {
    /// Returns the ticker the observation belongs to.
    #[must_use]
    pub fn ticker(&self) -> &str {
        match self {
            Self::Price(tick) => &tick.ticker,
            Self::Candle(candle) => &candle.ticker,
        }
    }

    /// Returns the instant used to place the observation in a bucket.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Price(tick) => tick.timestamp,
            Self::Candle(candle) => candle.timestamp,
        }
    }
}

impl From<PriceTick> for Observation {
    fn from(tick: PriceTick) -> Self {
        Self::Price(tick)
    }
}

impl From<Candle> for Observation {
    fn from(candle: Candle) -> Self {
        Self::Candle(candle)
    }
}
