//! Streaming per-ticker candle aggregation.

use candela_types::Period;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::{Candle, Observation};

/// An observation older than the candle currently open for its ticker.
///
/// Late observations are rejected: they neither touch the open candle nor
/// force it to be emitted, which keeps every candle inside its own bucket and
/// per-ticker output strictly increasing in time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Late observation for {ticker} at {timestamp}, open {period} candle starts at {open_since}")]
pub struct LateObservation {
    /// Ticker of the rejected observation.
    pub ticker: String,
    /// Timestamp of the rejected observation.
    pub timestamp: DateTime<Utc>,
    /// Period of the rejecting aggregator.
    pub period: Period,
    /// Start of the bucket currently open for the ticker.
    pub open_since: DateTime<Utc>,
}

/// Streaming candle aggregator for one period.
///
/// Keeps at most one open candle per ticker. The state is owned by the
/// aggregator and is never shared, so a pipeline stage can mutate it without
/// locking.
#[derive(Debug)]
pub struct CandleAggregator {
    period: Period,
    open: BTreeMap<String, Candle>,
}

impl CandleAggregator {
    /// Creates a new aggregator for the given period.
    #[must_use]
    pub const fn new(period: Period) -> Self {
        Self {
            period,
            open: BTreeMap::new(),
        }
    }

    /// Returns the period being aggregated to.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Returns the candle currently open for `ticker`.
    #[must_use]
    pub fn open_candle(&self, ticker: &str) -> Option<&Candle> {
        self.open.get(ticker)
    }

    /// Returns the number of tickers with an open candle.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Processes an observation, potentially emitting a finished candle.
    ///
    /// Returns `Ok(Some(candle))` when the observation crosses into a later
    /// bucket and thereby finishes the ticker's open candle, `Ok(None)` when
    /// it opens or updates a candle.
    ///
    /// # Errors
    ///
    /// Returns [`LateObservation`] if the observation belongs to a bucket
    /// before the ticker's open candle.
    pub fn process(
        &mut self,
        observation: impl Into<Observation>,
    ) -> Result<Option<Candle>, LateObservation> {
        let observation = observation.into();
        let period = self.period;
        let bucket = period.bucket_index(observation.timestamp());

        match self.open.get_mut(observation.ticker()) {
            Some(current) => match bucket.cmp(&period.bucket_index(current.timestamp)) {
                Ordering::Equal => {
                    fold(current, &observation);
                    Ok(None)
                }
                Ordering::Greater => {
                    let finished = std::mem::replace(current, seed(&observation, period));
                    Ok(Some(finished))
                }
                Ordering::Less => Err(LateObservation {
                    ticker: current.ticker.clone(),
                    timestamp: observation.timestamp(),
                    period,
                    open_since: current.timestamp,
                }),
            },
            None => {
                let candle = seed(&observation, period);
                self.open.insert(candle.ticker.clone(), candle);
                Ok(None)
            }
        }
    }

    /// Removes and returns every open candle, ordered by ticker.
    ///
    /// Called once the input is exhausted; the aggregator is empty afterwards.
    pub fn finish(&mut self) -> Vec<Candle> {
        std::mem::take(&mut self.open).into_values().collect()
    }
}

/// Opens a candle from the first observation of a bucket.
fn seed(observation: &Observation, period: Period) -> Candle {
    match observation {
        Observation::Price(tick) => Candle::from_tick(tick, period),
        Observation::Candle(sub) => Candle::from_candle(sub, period),
    }
}

/// Folds an observation into the open candle of the same bucket.
fn fold(candle: &mut Candle, observation: &Observation) {
    match observation {
        Observation::Price(tick) => candle.update_with_tick(tick),
        Observation::Candle(sub) => candle.update_with_candle(sub),
    }
}
