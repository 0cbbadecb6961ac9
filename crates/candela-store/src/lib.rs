//! Candle persistence for candela.
//!
//! This crate provides the persistence boundary of the pipeline:
//!
//! - [`CandleSink`] - Append-only destination shared by all stages
//! - [`FileStore`] - One append-only file per period
//! - [`MemoryStore`] - In-memory store
//! - [`CsvFormatter`] / [`JsonFormatter`] - Record formats

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod file;
mod formatter;
mod json;
mod sink;

pub use crate::csv::CsvFormatter;
pub use file::{FileStore, StoreConfig};
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::JsonFormatter;
pub use sink::{CandleSink, MemoryStore, StoreError};
