//! Price feed adapters for the candela pipeline.
//!
//! This crate provides the tick sources feeding the first aggregation stage:
//!
//! - [`PriceFeed`] - Lazy, possibly infinite source of ticks
//! - [`PriceGenerator`] - Seeded random-walk generator
//! - [`StreamFeed`] - Adapter for any `futures` stream of ticks
//! - [`ReplayFeed`] - Replay of recorded NDJSON ticks
//! - [`pump`] - Cancellation-aware forwarding into the pipeline

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod feed;
mod generator;
mod pump;
mod replay;

pub use feed::{PriceFeed, StreamFeed};
pub use generator::{GeneratorConfig, GeneratorError, PriceGenerator};
pub use pump::{FeedReport, pump};
pub use replay::ReplayFeed;
