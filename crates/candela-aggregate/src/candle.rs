//! OHLC candle data structure.

use candela_types::{Period, PriceTick};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC candle for one ticker over one bucket of a [`Period`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Ticker symbol.
    pub ticker: String,
    /// Bucket length of this candle.
    pub period: Period,
    /// Bucket start time.
    pub timestamp: DateTime<Utc>,
    /// First observed price in the bucket.
    pub open: f64,
    /// Highest price during the bucket.
    pub high: f64,
    /// Lowest price during the bucket.
    pub low: f64,
    /// Last observed price in the bucket.
    pub close: f64,
    /// Number of raw ticks folded into this candle.
    pub tick_count: u32,
}

impl Candle {
    /// Seeds a candle from the first tick of a bucket.
    #[must_use]
    pub fn from_tick(tick: &PriceTick, period: Period) -> Self {
        Self {
            ticker: tick.ticker.clone(),
            period,
            timestamp: period.bucket_start(tick.timestamp),
            open: tick.value,
            high: tick.value,
            low: tick.value,
            close: tick.value,
            tick_count: 1,
        }
    }

    /// Seeds a coarser candle from the first finer candle of a bucket.
    #[must_use]
    pub fn from_candle(sub: &Self, period: Period) -> Self {
        Self {
            ticker: sub.ticker.clone(),
            period,
            timestamp: period.bucket_start(sub.timestamp),
            open: sub.open,
            high: sub.high,
            low: sub.low,
            close: sub.close,
            tick_count: sub.tick_count,
        }
    }

    /// Folds a later tick of the same bucket into the candle.
    pub fn update_with_tick(&mut self, tick: &PriceTick) {
        self.high = self.high.max(tick.value);
        self.low = self.low.min(tick.value);
        self.close = tick.value;
        self.tick_count += 1;
    }

    /// Folds a later finer candle of the same bucket into the candle.
    pub fn update_with_candle(&mut self, sub: &Self) {
        self.high = self.high.max(sub.high);
        self.low = self.low.min(sub.low);
        self.close = sub.close;
        self.tick_count += sub.tick_count;
    }

    /// Returns true if `high`/`low` enclose both `open` and `close`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn tick(minute: u32, second: u32, value: f64) -> PriceTick {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, second).unwrap();
        PriceTick::new("AAPL", value, ts)
    }

    #[test]
    fn test_seed_from_tick_uses_bucket_start() {
        let candle = Candle::from_tick(&tick(3, 42, 100.0), Period::MINUTE_2);
        assert_eq!(
            candle.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 2, 0).unwrap()
        );
        assert_eq!(candle.tick_count, 1);
        assert!(candle.is_well_formed());
    }

    #[test]
    fn test_update_with_tick() {
        let mut candle = Candle::from_tick(&tick(0, 0, 100.0), Period::MINUTE_1);
        candle.update_with_tick(&tick(0, 10, 104.5));
        candle.update_with_tick(&tick(0, 20, 97.0));
        candle.update_with_tick(&tick(0, 30, 99.0));

        assert_relative_eq!(candle.open, 100.0);
        assert_relative_eq!(candle.high, 104.5);
        assert_relative_eq!(candle.low, 97.0);
        assert_relative_eq!(candle.close, 99.0);
        assert_relative_eq!(candle.range(), 7.5);
        assert_eq!(candle.tick_count, 4);
        assert!(candle.is_well_formed());
    }

    #[test]
    fn test_update_with_candle() {
        let mut first = Candle::from_tick(&tick(0, 0, 100.0), Period::MINUTE_1);
        first.update_with_tick(&tick(0, 30, 103.0));
        let mut second = Candle::from_tick(&tick(1, 0, 99.0), Period::MINUTE_1);
        second.update_with_tick(&tick(1, 30, 101.0));

        let mut coarse = Candle::from_candle(&first, Period::MINUTE_2);
        coarse.update_with_candle(&second);

        assert_eq!(coarse.period, Period::MINUTE_2);
        assert_relative_eq!(coarse.open, 100.0);
        assert_relative_eq!(coarse.high, 103.0);
        assert_relative_eq!(coarse.low, 99.0);
        assert_relative_eq!(coarse.close, 101.0);
        assert_eq!(coarse.tick_count, 4);
    }
}
