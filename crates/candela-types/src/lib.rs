//! Core types for the candela candle aggregation pipeline.
//!
//! This crate provides the fundamental data structures used throughout candela:
//!
//! - [`PriceTick`] - A single price observation for one ticker
//! - [`Period`] - Fixed-length, epoch-anchored bucket used to group observations
//! - [`same_bucket`] - Pure period classifier shared by every aggregation stage

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod period;
mod tick;

pub use error::{PeriodError, TickError};
pub use period::{Period, same_bucket};
pub use tick::PriceTick;
