//! Multi-stage candle pipeline for candela.
//!
//! This crate wires a price feed through a chain of aggregation stages:
//!
//! - [`PipelineConfig`] - Tracked tickers, stage periods and channel capacity
//! - [`CandleStage`] - One aggregation stage running on its own task
//! - [`Pipeline`] - Validated pipeline ready to start
//! - [`PipelineHandle`] - Cancellation, stage states and join of a running pipeline
//! - [`drain`] - Terminal consumer of the last stage

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod drain;
mod error;
mod pipeline;
mod stage;

pub use config::{DEFAULT_CHANNEL_CAPACITY, PipelineConfig};
pub use drain::{DrainReport, drain};
pub use error::{ConfigError, PipelineError};
pub use pipeline::{Pipeline, PipelineHandle, PipelineReport};
pub use stage::{CandleStage, StageReport, StageState};
