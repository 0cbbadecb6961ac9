//! Streaming multi-timeframe OHLC candle aggregation.
//!
//! This is a facade crate that re-exports functionality from the candela
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use candela_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let pipeline = Pipeline::new(PipelineConfig::with_tickers(["AAPL"]), store.clone())?;
//!
//!     let feed = PriceGenerator::new(GeneratorConfig {
//!         tickers: vec!["AAPL".to_string()],
//!         delay_ms: 0,
//!         simulated_start: chrono::DateTime::from_timestamp(0, 0),
//!         rounds: Some(3_600),
//!         ..GeneratorConfig::default()
//!     });
//!
//!     let report = pipeline.start(feed).join().await?;
//!     println!("Aggregated {} ticks", report.feed.forwarded);
//!     for candle in store.by_period(Period::MINUTE_10).await {
//!         println!("{} {} {:.2}", candle.ticker, candle.timestamp, candle.close);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candela_types::*;

// Re-export aggregation
pub use candela_aggregate::{Candle, CandleAggregator, LateObservation, Observation};

// Re-export feeds
#[cfg(feature = "feed")]
pub use candela_feed::{
    FeedReport, GeneratorConfig, GeneratorError, PriceFeed, PriceGenerator, ReplayFeed, StreamFeed,
    pump,
};

// Re-export stores
#[cfg(feature = "store")]
pub use candela_store::{
    CandleSink, CsvFormatter, FileStore, FormatError, Formatter, JsonFormatter, MemoryStore,
    OutputFormat, StoreConfig, StoreError,
};

// Re-export the pipeline
#[cfg(feature = "pipeline")]
pub use candela_pipeline::{
    CandleStage, ConfigError, DEFAULT_CHANNEL_CAPACITY, DrainReport, Pipeline, PipelineConfig,
    PipelineError, PipelineHandle, PipelineReport, StageReport, StageState, drain,
};

/// Prelude module for convenient imports.
///
/// ```
/// use candela_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candela_types::{Period, PeriodError, PriceTick, TickError};

    pub use candela_aggregate::{Candle, CandleAggregator, Observation};

    #[cfg(feature = "feed")]
    pub use candela_feed::{GeneratorConfig, PriceFeed, PriceGenerator, ReplayFeed, StreamFeed};

    #[cfg(feature = "store")]
    pub use candela_store::{CandleSink, FileStore, MemoryStore, OutputFormat, StoreConfig};

    #[cfg(feature = "pipeline")]
    pub use candela_pipeline::{Pipeline, PipelineConfig, PipelineHandle, PipelineReport};
}
