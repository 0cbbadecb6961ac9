//! Persistence contract and in-memory store.

use async_trait::async_trait;
use candela_aggregate::Candle;
use candela_types::Period;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::FormatError;

/// Errors raised by a [`CandleSink`]. Every one of them is fatal to the
/// pipeline stage that hit it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the output directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to open a partition file.
    #[error("Failed to open file '{path}': {source}")]
    OpenFile {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to append to a partition file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to encode a record.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A backend-specific failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Append-only destination for finished candles.
///
/// Implementations are shared by every pipeline stage and must accept
/// concurrent appends. Records for one period must be kept in append order.
#[async_trait]
pub trait CandleSink: Send + Sync + std::fmt::Debug {
    /// Appends one finished candle.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be stored.
    async fn append(&self, candle: &Candle) -> Result<(), StoreError>;

    /// Forces buffered records down to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered records could not be stored.
    async fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory candle store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Candle>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored candle in append order.
    pub async fn candles(&self) -> Vec<Candle> {
        self.records.read().await.clone()
    }

    /// Returns the stored candles of one period in append order.
    pub async fn by_period(&self, period: Period) -> Vec<Candle> {
        self.records
            .read()
            .await
            .iter()
            .filter(|c| c.period == period)
            .cloned()
            .collect()
    }

    /// Returns the number of stored candles.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CandleSink for MemoryStore {
    async fn append(&self, candle: &Candle) -> Result<(), StoreError> {
        self.records.write().await.push(candle.clone());
        Ok(())
    }
}
