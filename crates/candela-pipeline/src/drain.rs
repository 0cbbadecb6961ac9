//! Consumer for the output of the last stage.

use candela_aggregate::Candle;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Outcome of draining the last stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Candles received from the last stage.
    pub candles: u64,
}

/// Consumes candles until the last stage closes its output.
///
/// The candles are already persisted by the stage that produced them; the
/// drain only keeps the last stage from blocking on a full channel.
pub async fn drain(mut input: mpsc::Receiver<Candle>) -> DrainReport {
    let mut report = DrainReport::default();
    while let Some(candle) = input.recv().await {
        trace!(
            ticker = %candle.ticker,
            period = %candle.period,
            timestamp = %candle.timestamp,
            "drained final candle"
        );
        report.candles += 1;
    }
    debug!(candles = report.candles, "final stage drained");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_types::{Period, PriceTick};
    use chrono::DateTime;

    #[tokio::test]
    async fn test_counts_until_closed() {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(drain(rx));
        for secs in 0..5 {
            let tick = PriceTick::new("AAPL", 1.0, DateTime::from_timestamp(secs * 600, 0).unwrap());
            tx.send(Candle::from_tick(&tick, Period::MINUTE_10)).await.unwrap();
        }
        drop(tx);
        assert_eq!(task.await.unwrap(), DrainReport { candles: 5 });
    }
}
