//! A single aggregation stage of the pipeline.

use candela_aggregate::{Candle, CandleAggregator, Observation};
use candela_store::CandleSink;
use candela_types::Period;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::PipelineError;

/// Lifecycle of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageState {
    /// Consuming its input.
    Running,
    /// Input closed, flushing open candles downstream.
    Draining,
    /// Output closed; the stage will not emit again.
    Closed,
}

impl StageState {
    /// Returns true once the stage has closed its output.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Counters of a stage that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    /// Position of the stage in the chain.
    pub stage: usize,
    /// Period of the stage.
    pub period: Period,
    /// Observations received from upstream.
    pub received: u64,
    /// Candles finished by a later observation.
    pub emitted: u64,
    /// Candles flushed after the input closed.
    pub flushed: u64,
    /// Late observations rejected.
    pub rejected: u64,
}

impl StageReport {
    const fn new(stage: usize, period: Period) -> Self {
        Self {
            stage,
            period,
            received: 0,
            emitted: 0,
            flushed: 0,
            rejected: 0,
        }
    }

    /// Returns every candle the stage produced.
    #[must_use]
    pub const fn produced(&self) -> u64 {
        self.emitted + self.flushed
    }
}

/// Aggregation stage turning observations into candles of one period.
///
/// Every finished candle is persisted before it is forwarded, so a candle
/// seen downstream is always already stored. When the input closes the stage
/// flushes its open candles, then closes its output.
#[derive(Debug)]
pub struct CandleStage {
    index: usize,
    aggregator: CandleAggregator,
    sink: Arc<dyn CandleSink>,
    cancel: CancellationToken,
    state: watch::Sender<StageState>,
}

impl CandleStage {
    /// Creates a stage at position `index` of the chain.
    ///
    /// `cancel` is triggered when the stage fails, to stop the feed.
    #[must_use]
    pub fn new(
        index: usize,
        period: Period,
        sink: Arc<dyn CandleSink>,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(StageState::Running);
        Self {
            index,
            aggregator: CandleAggregator::new(period),
            sink,
            cancel,
            state,
        }
    }

    /// Returns the period of the stage.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.aggregator.period()
    }

    /// Subscribes to state changes of the stage.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StageState> {
        self.state.subscribe()
    }

    /// Runs the stage until its input closes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Persistence`] if the sink rejects a candle and
    /// [`PipelineError::DownstreamClosed`] if `output` has no receiver left.
    /// Either way the cancellation token is triggered and the output closed.
    pub async fn run<E>(
        mut self,
        mut input: mpsc::Receiver<E>,
        output: mpsc::Sender<Candle>,
    ) -> Result<StageReport, PipelineError>
    where
        E: Into<Observation> + Send,
    {
        let mut report = StageReport::new(self.index, self.period());
        info!(stage = self.index, period = %self.period(), "stage running");

        while let Some(event) = input.recv().await {
            report.received += 1;
            match self.aggregator.process(event) {
                Ok(Some(candle)) => {
                    if let Err(e) = self.emit(candle, &output).await {
                        return Err(self.abort(e, &mut input, Vec::new()).await);
                    }
                    report.emitted += 1;
                }
                Ok(None) => {}
                Err(late) => {
                    report.rejected += 1;
                    warn!(stage = self.index, error = %late, "rejecting late observation");
                }
            }
        }

        self.state.send_replace(StageState::Draining);
        let open = self.aggregator.finish();
        debug!(stage = self.index, open = open.len(), "input closed, flushing open candles");
        let mut open = open.into_iter();
        while let Some(candle) = open.next() {
            if let Err(e) = self.emit(candle, &output).await {
                return Err(self.abort(e, &mut input, open.collect()).await);
            }
            report.flushed += 1;
        }

        drop(output);
        self.state.send_replace(StageState::Closed);
        info!(
            stage = self.index,
            period = %self.period(),
            received = report.received,
            emitted = report.emitted,
            flushed = report.flushed,
            rejected = report.rejected,
            "stage closed"
        );
        Ok(report)
    }

    /// Persists a finished candle, then forwards it.
    async fn emit(&self, candle: Candle, output: &mpsc::Sender<Candle>) -> Result<(), PipelineError> {
        debug_assert!(candle.is_well_formed());
        self.sink
            .append(&candle)
            .await
            .map_err(|source| PipelineError::Persistence {
                stage: self.index,
                period: self.period(),
                source,
            })?;
        output
            .send(candle)
            .await
            .map_err(|_| PipelineError::DownstreamClosed {
                stage: self.index,
                period: self.period(),
            })
    }

    /// Stops the pipeline after a failure of this stage.
    ///
    /// `pending` holds finished candles taken out of the aggregator but not
    /// yet persisted. With a working sink but no consumer, those, whatever
    /// upstream already buffered and every open candle are still persisted.
    async fn abort<E>(
        &mut self,
        err: PipelineError,
        input: &mut mpsc::Receiver<E>,
        pending: Vec<Candle>,
    ) -> PipelineError
    where
        E: Into<Observation> + Send,
    {
        self.cancel.cancel();
        error!(stage = self.index, error = %err, "stage failed, cancelling pipeline");

        if err.is_secondary() {
            input.close();
            let mut unsent = pending;
            while let Some(event) = input.recv().await {
                match self.aggregator.process(event) {
                    Ok(finished) => unsent.extend(finished),
                    Err(late) => debug!(stage = self.index, error = %late, "dropping late observation"),
                }
            }
            unsent.extend(self.aggregator.finish());
            for candle in &unsent {
                if let Err(e) = self.sink.append(candle).await {
                    warn!(stage = self.index, error = %e, "could not persist open candle");
                    break;
                }
            }
        }

        self.state.send_replace(StageState::Closed);
        err
    }
}
