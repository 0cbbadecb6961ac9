//! Error types for pipeline construction and execution.

use candela_store::StoreError;
use candela_types::Period;
use thiserror::Error;

/// Invalid pipeline configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No stage periods were configured.
    #[error("Pipeline needs at least one stage period")]
    EmptyChain,

    /// A stage period is not coarser than the one before it.
    #[error("Stage period {coarser} must be longer than the preceding {finer}")]
    NotIncreasing {
        /// The finer, preceding period.
        finer: Period,
        /// The offending period.
        coarser: Period,
    },

    /// A stage period is not a whole multiple of the one before it.
    #[error("Stage period {coarser} is not a whole multiple of {finer}")]
    NotNested {
        /// The finer, preceding period.
        finer: Period,
        /// The offending period.
        coarser: Period,
    },

    /// Channels must hold at least one item.
    #[error("Channel capacity must be at least 1")]
    ZeroCapacity,

    /// A tracked ticker is empty or whitespace.
    #[error("Tracked tickers must not be blank")]
    BlankTicker,
}

/// Failure of a running pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage could not persist a finished candle.
    #[error("Stage {stage} ({period}) failed to persist a candle: {source}")]
    Persistence {
        /// Position of the stage in the chain.
        stage: usize,
        /// Period of the stage.
        period: Period,
        /// The store failure.
        source: StoreError,
    },

    /// A stage could not forward a candle because its consumer went away.
    #[error("Stage {stage} ({period}) lost its downstream consumer")]
    DownstreamClosed {
        /// Position of the stage in the chain.
        stage: usize,
        /// Period of the stage.
        period: Period,
    },

    /// Final flush of the store failed.
    #[error("Failed to flush the candle store: {0}")]
    Flush(#[source] StoreError),

    /// A pipeline task panicked or was aborted.
    #[error("Pipeline task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Returns true if this failure is a consequence of another stage failing
    /// rather than a cause of its own.
    #[must_use]
    pub const fn is_secondary(&self) -> bool {
        matches!(self, Self::DownstreamClosed { .. })
    }
}
