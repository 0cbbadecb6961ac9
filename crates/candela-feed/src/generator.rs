//! Synthetic random-walk price generator.

use async_trait::async_trait;
use candela_types::PriceTick;
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::PriceFeed;

/// Generator settings that cannot produce a price walk.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeneratorError {
    /// The starting price is NaN, infinite, zero or negative.
    #[error("Generator start price must be a finite positive number, got {0}")]
    InvalidStartPrice(f64),

    /// The volatility is NaN, infinite or negative.
    #[error("Generator volatility must be a finite non-negative number, got {0}")]
    InvalidVolatility(f64),
}

/// Configuration for the price generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Tickers to generate prices for, one tick each per round.
    pub tickers: Vec<String>,
    /// Pause between rounds (in milliseconds).
    pub delay_ms: u64,
    /// Initial price of every ticker.
    pub start_price: f64,
    /// Largest relative price move of a single tick.
    pub volatility: f64,
    /// RNG seed; a fixed seed makes the generated prices reproducible.
    pub seed: Option<u64>,
    /// Use a simulated clock starting here instead of wall-clock time.
    pub simulated_start: Option<DateTime<Utc>>,
    /// Simulated time between rounds (in milliseconds).
    pub step_ms: u64,
    /// Stop after this many rounds.
    pub rounds: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tickers: ["AAPL", "SBER", "NVDA", "TSLA"]
                .into_iter()
                .map(String::from)
                .collect(),
            delay_ms: 500,
            start_price: 100.0,
            volatility: 0.01,
            seed: None,
            simulated_start: None,
            step_ms: 1_000,
            rounds: None,
        }
    }
}

impl GeneratorConfig {
    /// Checks that the prices can be generated.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneratorError`] if the start price or the volatility is
    /// not a finite number in range.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !self.start_price.is_finite() || self.start_price <= 0.0 {
            return Err(GeneratorError::InvalidStartPrice(self.start_price));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(GeneratorError::InvalidVolatility(self.volatility));
        }
        Ok(())
    }
}

/// Random-walk price generator.
///
/// Every round yields one tick per configured ticker, then waits `delay_ms`
/// before the next round.
#[derive(Debug)]
pub struct PriceGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    prices: Vec<f64>,
    round: u64,
    cursor: usize,
}

impl PriceGenerator {
    /// Creates a generator from its configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let prices = vec![config.start_price.max(f64::MIN_POSITIVE); config.tickers.len()];
        Self {
            config,
            rng,
            prices,
            round: 0,
            cursor: 0,
        }
    }

    /// Returns the generator configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn timestamp(&self) -> DateTime<Utc> {
        match self.config.simulated_start {
            Some(start) => {
                let offset = i64::try_from(self.round.saturating_mul(self.config.step_ms))
                    .unwrap_or(i64::MAX);
                start + TimeDelta::milliseconds(offset)
            }
            None => Utc::now(),
        }
    }

    fn exhausted(&self) -> bool {
        self.config.tickers.is_empty() || self.config.rounds.is_some_and(|max| self.round >= max)
    }
}

#[async_trait]
impl PriceFeed for PriceGenerator {
    async fn next_tick(&mut self) -> Option<PriceTick> {
        if self.cursor == self.config.tickers.len() {
            // Sleep before advancing so a cancelled call leaves the state untouched.
            if self.config.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
            self.cursor = 0;
            self.round += 1;
        }
        if self.exhausted() {
            return None;
        }

        let idx = self.cursor;
        let bound = self.config.volatility.abs();
        let step = if bound.is_finite() {
            self.rng.random_range(-bound..=bound)
        } else {
            0.0
        };
        let price = (self.prices[idx] * (1.0 + step)).max(0.01);
        self.prices[idx] = price;
        self.cursor += 1;

        Some(PriceTick::new(
            self.config.tickers[idx].clone(),
            price,
            self.timestamp(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulated(seed: u64, rounds: u64) -> GeneratorConfig {
        GeneratorConfig {
            tickers: vec!["AAPL".to_string(), "SBER".to_string()],
            delay_ms: 0,
            seed: Some(seed),
            simulated_start: DateTime::from_timestamp(0, 0),
            step_ms: 15_000,
            rounds: Some(rounds),
            ..GeneratorConfig::default()
        }
    }

    async fn collect(mut feed: PriceGenerator) -> Vec<PriceTick> {
        let mut ticks = Vec::new();
        while let Some(tick) = feed.next_tick().await {
            ticks.push(tick);
        }
        ticks
    }

    #[tokio::test]
    async fn test_rounds_and_simulated_clock() {
        let ticks = collect(PriceGenerator::new(simulated(7, 3))).await;
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].ticker, "AAPL");
        assert_eq!(ticks[1].ticker, "SBER");
        assert_eq!(ticks[0].timestamp, ticks[1].timestamp);
        assert_eq!(
            ticks[2].timestamp - ticks[0].timestamp,
            TimeDelta::milliseconds(15_000)
        );
        assert!(ticks.iter().all(|t| t.validate().is_ok()));
    }

    #[tokio::test]
    async fn test_seed_is_reproducible() {
        let a = collect(PriceGenerator::new(simulated(42, 50))).await;
        let b = collect(PriceGenerator::new(simulated(42, 50))).await;
        let c = collect(PriceGenerator::new(simulated(43, 50))).await;
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_moves_are_bounded_by_volatility() {
        let ticks = collect(PriceGenerator::new(simulated(1, 100))).await;
        let aapl: Vec<f64> = ticks
            .iter()
            .filter(|t| t.ticker == "AAPL")
            .map(|t| t.value)
            .collect();
        for pair in aapl.windows(2) {
            assert!((pair[1] / pair[0] - 1.0).abs() <= 0.01 + 1e-12);
        }
    }

    #[tokio::test]
    async fn test_no_tickers_is_empty() {
        let config = GeneratorConfig {
            tickers: Vec::new(),
            ..simulated(0, 10)
        };
        assert!(collect(PriceGenerator::new(config)).await.is_empty());
    }

    #[test]
    fn test_validate_rejects_non_finite_settings() {
        assert!(GeneratorConfig::default().validate().is_ok());
        for volatility in [f64::NAN, f64::INFINITY, -0.5] {
            let config = GeneratorConfig {
                volatility,
                ..GeneratorConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(GeneratorError::InvalidVolatility(_))
            ));
        }
        for start_price in [f64::NAN, f64::NEG_INFINITY, 0.0] {
            let config = GeneratorConfig {
                start_price,
                ..GeneratorConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(GeneratorError::InvalidStartPrice(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_non_finite_volatility_does_not_panic() {
        let config = GeneratorConfig {
            volatility: f64::NAN,
            ..simulated(5, 3)
        };
        let ticks = collect(PriceGenerator::new(config)).await;
        assert_eq!(ticks.len(), 6);
        assert!(ticks.iter().all(|t| t.validate().is_ok()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_between_rounds() {
        let config = GeneratorConfig {
            delay_ms: 500,
            ..simulated(3, 2)
        };
        let mut feed = PriceGenerator::new(config);
        let start = tokio::time::Instant::now();
        feed.next_tick().await;
        feed.next_tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        feed.next_tick().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
