//! Replay of recorded ticks from newline-delimited JSON.

use async_trait::async_trait;
use candela_types::PriceTick;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{error, warn};

use crate::PriceFeed;

/// Feed replaying ticks recorded one JSON object per line, e.g.
/// `{"ticker":"AAPL","value":101.5,"timestamp":"2024-01-15T12:30:45Z"}`.
///
/// Malformed lines are logged and skipped; an I/O error ends the feed.
#[derive(Debug)]
pub struct ReplayFeed<R> {
    lines: Lines<R>,
    line_no: u64,
    skipped: u64,
}

impl ReplayFeed<BufReader<File>> {
    /// Opens a recorded tick file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ReplayFeed<R> {
    /// Replays ticks from a buffered reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Returns the number of malformed lines skipped so far.
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> PriceFeed for ReplayFeed<R> {
    async fn next_tick(&mut self) -> Option<PriceTick> {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    error!(line = self.line_no + 1, error = %e, "tick replay aborted");
                    return None;
                }
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<PriceTick>(trimmed) {
                Ok(tick) => return Some(tick),
                Err(e) => {
                    self.skipped += 1;
                    warn!(line = self.line_no, error = %e, "skipping malformed tick record");
                }
            }
        }
    }
}
