//! Pipeline configuration.

use candela_types::Period;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ConfigError;

/// Default capacity of every inter-stage channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Configuration of a candle pipeline.
///
/// The default tracks the four reference tickers over the 1m → 2m → 10m
/// chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tickers admitted into the pipeline. Empty admits every ticker.
    pub tickers: Vec<String>,
    /// Stage periods, finest first. Each one must nest into the next.
    pub periods: Vec<Period>,
    /// Capacity of the tick channel and of every candle channel.
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tickers: ["AAPL", "SBER", "NVDA", "TSLA"]
                .into_iter()
                .map(String::from)
                .collect(),
            periods: Period::reference_chain().to_vec(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration tracking `tickers` over the reference chain.
    #[must_use]
    pub fn with_tickers<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Checks that the stage chain can be built.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the chain is empty, a period does not
    /// strictly grow or nest into its successor, the channel capacity is zero
    /// or a tracked ticker is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.periods.is_empty() {
            return Err(ConfigError::EmptyChain);
        }
        for pair in self.periods.windows(2) {
            let (finer, coarser) = (pair[0], pair[1]);
            if coarser <= finer {
                return Err(ConfigError::NotIncreasing { finer, coarser });
            }
            if !finer.nests_into(coarser) {
                return Err(ConfigError::NotNested { finer, coarser });
            }
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::BlankTicker);
        }
        Ok(())
    }

    /// Returns the set of tracked tickers.
    #[must_use]
    pub fn tracked(&self) -> HashSet<String> {
        self.tickers.iter().cloned().collect()
    }
}
