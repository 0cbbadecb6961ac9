//! Benchmark workloads for candela.

use candela_lib::PriceTick;
use chrono::{DateTime, TimeDelta, Utc};

/// Shape of a synthetic tick session.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of distinct tickers, interleaved round-robin.
    pub tickers: usize,
    /// Ticks generated per ticker.
    pub ticks_per_ticker: usize,
    /// Simulated time between rounds (in milliseconds).
    pub step_ms: i64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            tickers: 4,
            // One trading day at one tick per second
            ticks_per_ticker: 23_400,
            step_ms: 1_000,
        }
    }
}

impl BenchmarkConfig {
    /// Total number of ticks in the session.
    #[must_use]
    pub const fn total_ticks(&self) -> usize {
        self.tickers * self.ticks_per_ticker
    }
}

/// Generates a deterministic session of ticks, ordered by time.
///
/// Prices follow an xorshift random walk so that highs and lows move
/// inside every candle.
#[must_use]
pub fn synthetic_ticks(config: &BenchmarkConfig) -> Vec<PriceTick> {
    let names: Vec<String> = (0..config.tickers).map(|i| format!("T{i:03}")).collect();
    let mut prices = vec![100.0_f64; config.tickers];
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let start = DateTime::<Utc>::UNIX_EPOCH;

    let mut ticks = Vec::with_capacity(config.total_ticks());
    for round in 0..config.ticks_per_ticker {
        let offset = i64::try_from(round).unwrap_or(i64::MAX);
        let timestamp = start + TimeDelta::milliseconds(offset.saturating_mul(config.step_ms));
        for (name, price) in names.iter().zip(prices.iter_mut()) {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let step = ((state % 2_001) as f64 / 1_000.0 - 1.0) * 0.05;
            *price = (*price + step).max(0.01);
            ticks.push(PriceTick::new(name.clone(), *price, timestamp));
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_session_shape() {
        let config = BenchmarkConfig {
            tickers: 3,
            ticks_per_ticker: 100,
            step_ms: 500,
        };
        let ticks = synthetic_ticks(&config);
        assert_eq!(ticks.len(), 300);
        assert!(ticks.iter().all(|t| t.validate().is_ok()));
        assert!(ticks.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(synthetic_ticks(&config), ticks);
    }
}
