//! Append-only file store partitioned by period.

use async_trait::async_trait;
use candela_aggregate::Candle;
use candela_types::Period;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{CandleSink, OutputFormat, StoreError};

/// File store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the per-period files.
    pub dir: PathBuf,
    /// Record format.
    pub format: OutputFormat,
    /// Write a header row when a CSV file is created.
    pub header: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: OutputFormat::Csv,
            header: false,
        }
    }
}

/// Append-only candle log with one file per period.
///
/// Files are named `candles_<period>.<ext>` (for example `candles_1m.csv`)
/// and are only ever opened in append mode. Appends from concurrent stages
/// are serialized by an internal lock, and every record is flushed to the
/// OS before `append` returns.
#[derive(Debug)]
pub struct FileStore {
    config: StoreConfig,
    files: Mutex<HashMap<Period, File>>,
}

impl FileStore {
    /// Opens a store, creating the output directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn open(config: StoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.dir)
            .await
            .map_err(|e| StoreError::CreateDir {
                path: config.dir.clone(),
                source: e,
            })?;

        Ok(Self {
            config,
            files: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Returns the file holding candles of `period`.
    #[must_use]
    pub fn path_for(&self, period: Period) -> PathBuf {
        self.config.dir.join(format!(
            "candles_{}.{}",
            period.label(),
            self.config.format.extension()
        ))
    }

    /// Opens the partition file of `period`, writing a header if it is new.
    async fn open_partition(&self, period: Period) -> Result<File, StoreError> {
        let path = self.path_for(period);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::OpenFile {
                path: path.clone(),
                source: e,
            })?;

        let fresh = file
            .metadata()
            .await
            .map_err(|e| StoreError::OpenFile {
                path: path.clone(),
                source: e,
            })?
            .len()
            == 0;

        if fresh && self.config.header {
            let mut buf = Vec::new();
            self.config.format.encode(&[], true, &mut buf)?;
            if !buf.is_empty() {
                write_record(&mut file, &path, &buf).await?;
            }
        }

        debug!(path = %path.display(), fresh, "opened candle log");
        Ok(file)
    }
}

#[async_trait]
impl CandleSink for FileStore {
    async fn append(&self, candle: &Candle) -> Result<(), StoreError> {
        let mut record = Vec::with_capacity(96);
        self.config
            .format
            .encode(std::slice::from_ref(candle), false, &mut record)?;

        let mut files = self.files.lock().await;
        let file = match files.entry(candle.period) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.open_partition(candle.period).await?),
        };

        write_record(file, &self.path_for(candle.period), &record).await
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let mut files = self.files.lock().await;
        for (period, file) in files.iter_mut() {
            file.sync_data()
                .await
                .map_err(|e| StoreError::WriteFile {
                    path: self.path_for(*period),
                    source: e,
                })?;
        }
        Ok(())
    }
}

async fn write_record(file: &mut File, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let map = |e: std::io::Error| StoreError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    };
    file.write_all(bytes).await.map_err(map)?;
    file.flush().await.map_err(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_types::PriceTick;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn candle(ticker: &str, period: Period, secs: i64, value: f64) -> Candle {
        let tick = PriceTick::new(ticker, value, DateTime::from_timestamp(secs, 0).unwrap());
        Candle::from_tick(&tick, period)
    }

    async fn store_in(dir: &TempDir, format: OutputFormat, header: bool) -> FileStore {
        FileStore::open(StoreConfig {
            dir: dir.path().join("out"),
            format,
            header,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_partitions_by_period() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir, OutputFormat::Csv, false).await;

        store.append(&candle("AAPL", Period::MINUTE_1, 0, 100.0)).await.unwrap();
        store.append(&candle("AAPL", Period::MINUTE_1, 60, 101.0)).await.unwrap();
        store.append(&candle("AAPL", Period::MINUTE_2, 0, 100.0)).await.unwrap();

        let minute = std::fs::read_to_string(store.path_for(Period::MINUTE_1)).unwrap();
        assert_eq!(
            minute,
            "AAPL,1970-01-01T00:00:00Z,100,100,100,100\nAAPL,1970-01-01T00:01:00Z,101,101,101,101\n"
        );

        let two = std::fs::read_to_string(store.path_for(Period::MINUTE_2)).unwrap();
        assert_eq!(two.lines().count(), 1);
        assert!(store.path_for(Period::MINUTE_10).ends_with("candles_10m.csv"));
    }

    #[tokio::test]
    async fn test_reopen_appends_without_second_header() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = store_in(&temp_dir, OutputFormat::Csv, true).await;
            store.append(&candle("SBER", Period::MINUTE_1, 0, 250.0)).await.unwrap();
            store.flush().await.unwrap();
        }

        let store = store_in(&temp_dir, OutputFormat::Csv, true).await;
        store.append(&candle("SBER", Period::MINUTE_1, 60, 251.0)).await.unwrap();

        let content = std::fs::read_to_string(store.path_for(Period::MINUTE_1)).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ticker,timestamp,open,high,low,close");
        assert!(lines[1].starts_with("SBER,1970-01-01T00:00:00Z"));
        assert!(lines[2].starts_with("SBER,1970-01-01T00:01:00Z"));
    }

    #[tokio::test]
    async fn test_ndjson_records() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir, OutputFormat::Ndjson, true).await;
        let original = candle("NVDA", Period::MINUTE_10, 600, 500.0);

        store.append(&original).await.unwrap();

        let path = store.path_for(Period::MINUTE_10);
        assert!(path.ends_with("candles_10m.ndjson"));
        let content = std::fs::read_to_string(path).unwrap();
        let back: Candle = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(back, original);
    }

    #[tokio::test]
    async fn test_open_fails_on_file_in_place_of_dir() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = FileStore::open(StoreConfig {
            dir: blocker,
            ..StoreConfig::default()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::CreateDir { .. }));
    }
}
