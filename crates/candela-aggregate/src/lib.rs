//! OHLC candle aggregation for candela.
//!
//! This crate provides streaming candle aggregation:
//!
//! - [`Candle`] - OHLC candle data structure
//! - [`Observation`] - A raw tick or a finer candle fed to an aggregator
//! - [`CandleAggregator`] - Per-ticker streaming aggregator for one period

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod candle;
mod observation;

pub use aggregator::{CandleAggregator, LateObservation};
pub use candle::Candle;
pub use observation::Observation;
