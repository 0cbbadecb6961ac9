//! Pipeline wiring, execution and shutdown.

use candela_aggregate::Candle;
use candela_feed::{FeedReport, PriceFeed, pump};
use candela_store::CandleSink;
use candela_types::{Period, PriceTick};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    CandleStage, ConfigError, DrainReport, PipelineConfig, PipelineError, StageReport, StageState,
    drain,
};

/// Result of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// What the feed pump forwarded and rejected.
    pub feed: FeedReport,
    /// One report per stage, finest period first.
    pub stages: Vec<StageReport>,
    /// Candles consumed by the terminal drain. Zero when the caller consumed
    /// the last stage's output through [`Pipeline::start_with_output`].
    pub drained: u64,
}

/// A validated, not yet started candle pipeline.
#[derive(Debug)]
pub struct Pipeline {
    first: Period,
    rest: Vec<Period>,
    tracked: HashSet<String>,
    capacity: usize,
    sink: Arc<dyn CandleSink>,
    cancel: CancellationToken,
}

impl Pipeline {
    /// Builds a pipeline persisting every candle into `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: PipelineConfig, sink: Arc<dyn CandleSink>) -> Result<Self, ConfigError> {
        config.validate()?;
        let tracked = config.tracked();
        let mut periods = config.periods.into_iter();
        let first = periods.next().ok_or(ConfigError::EmptyChain)?;
        Ok(Self {
            first,
            rest: periods.collect(),
            tracked,
            capacity: config.channel_capacity,
            sink,
            cancel: CancellationToken::new(),
        })
    }

    /// Uses an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the token that stops the pipeline.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the stage periods, finest first.
    #[must_use]
    pub fn periods(&self) -> Vec<Period> {
        std::iter::once(self.first).chain(self.rest.iter().copied()).collect()
    }

    /// Starts the pipeline on a tokio runtime.
    ///
    /// The output of the last stage is drained internally, so
    /// [`PipelineHandle::join`] always completes once the feed ends or the
    /// pipeline is cancelled.
    pub fn start<F>(self, feed: F) -> PipelineHandle
    where
        F: PriceFeed + 'static,
    {
        let (mut handle, output) = self.start_with_output(feed);
        handle.tasks.spawn(async move { TaskOutcome::Drain(drain(output).await) });
        handle
    }

    /// Starts the pipeline and hands the last stage's output to the caller.
    ///
    /// The caller becomes the terminal consumer: unless the receiver is read
    /// until it closes (or dropped), the last stage blocks once its channel is
    /// full, backpressure stalls every stage and [`PipelineHandle::join`]
    /// never returns.
    pub fn start_with_output<F>(self, feed: F) -> (PipelineHandle, mpsc::Receiver<Candle>)
    where
        F: PriceFeed + 'static,
    {
        let Self {
            first,
            rest,
            tracked,
            capacity,
            sink,
            cancel,
        } = self;
        let mut tasks = JoinSet::new();
        let mut states = Vec::with_capacity(rest.len() + 1);

        let (tick_tx, tick_rx) = mpsc::channel::<PriceTick>(capacity);
        let feed_cancel = cancel.clone();
        tasks.spawn(async move {
            TaskOutcome::Feed(pump(feed, &tracked, tick_tx, feed_cancel).await)
        });

        let (out_tx, mut output) = mpsc::channel::<Candle>(capacity);
        let stage = CandleStage::new(0, first, sink.clone(), cancel.clone());
        states.push(stage.subscribe());
        tasks.spawn(async move { TaskOutcome::Stage(stage.run(tick_rx, out_tx).await) });

        for (offset, period) in rest.into_iter().enumerate() {
            let (tx, rx) = mpsc::channel::<Candle>(capacity);
            let stage = CandleStage::new(offset + 1, period, sink.clone(), cancel.clone());
            states.push(stage.subscribe());
            let input = std::mem::replace(&mut output, rx);
            tasks.spawn(async move { TaskOutcome::Stage(stage.run(input, tx).await) });
        }

        info!(stages = states.len(), capacity, "pipeline started");
        let handle = PipelineHandle {
            cancel,
            sink,
            tasks,
            states,
        };
        (handle, output)
    }
}

/// What a pipeline task returned.
#[derive(Debug)]
enum TaskOutcome {
    Feed(FeedReport),
    Stage(Result<StageReport, PipelineError>),
    Drain(DrainReport),
}

/// Handle to a running pipeline.
///
/// Dropping the handle aborts every pipeline task; call [`join`] or
/// [`shutdown`] to let the stages flush.
///
/// [`join`]: PipelineHandle::join
/// [`shutdown`]: PipelineHandle::shutdown
#[derive(Debug)]
pub struct PipelineHandle {
    cancel: CancellationToken,
    sink: Arc<dyn CandleSink>,
    tasks: JoinSet<TaskOutcome>,
    states: Vec<watch::Receiver<StageState>>,
}

impl PipelineHandle {
    /// Stops the feed. Stages keep running until they have flushed.
    pub fn cancel(&self) {
        info!("pipeline cancellation requested");
        self.cancel.cancel();
    }

    /// Returns the token that stops the pipeline.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the current state of every stage, finest period first.
    #[must_use]
    pub fn stage_states(&self) -> Vec<StageState> {
        self.states.iter().map(|rx| *rx.borrow()).collect()
    }

    /// Waits until every task has finished and the store is flushed.
    ///
    /// # Errors
    ///
    /// Returns the root cause if any stage failed; the remaining stages still
    /// run to completion first.
    pub async fn join(mut self) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport::default();
        let mut failure: Option<PipelineError> = None;

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(TaskOutcome::Feed(feed)) => report.feed = feed,
                Ok(TaskOutcome::Stage(Ok(stage))) => report.stages.push(stage),
                Ok(TaskOutcome::Drain(drained)) => report.drained = drained.candles,
                Ok(TaskOutcome::Stage(Err(e))) => {
                    self.cancel.cancel();
                    record_failure(&mut failure, e);
                }
                Err(e) => {
                    self.cancel.cancel();
                    record_failure(&mut failure, PipelineError::Task(e.to_string()));
                }
            }
        }
        report.stages.sort_by_key(|stage| stage.stage);

        if let Err(e) = self.sink.flush().await {
            record_failure(&mut failure, PipelineError::Flush(e));
        }

        match failure {
            Some(e) => {
                error!(error = %e, "pipeline failed");
                Err(e)
            }
            None => {
                info!(
                    forwarded = report.feed.forwarded,
                    stages = report.stages.len(),
                    drained = report.drained,
                    "pipeline finished"
                );
                Ok(report)
            }
        }
    }

    /// Cancels the pipeline and waits for it to flush.
    ///
    /// # Errors
    ///
    /// See [`PipelineHandle::join`].
    pub async fn shutdown(self) -> Result<PipelineReport, PipelineError> {
        self.cancel();
        self.join().await
    }
}

/// Keeps the first root cause, letting it replace a secondary failure.
fn record_failure(slot: &mut Option<PipelineError>, err: PipelineError) {
    let replace = slot
        .as_ref()
        .is_none_or(|existing| existing.is_secondary() && !err.is_secondary());
    if replace {
        *slot = Some(err);
    } else {
        debug!(error = %err, "additional pipeline failure");
    }
}
