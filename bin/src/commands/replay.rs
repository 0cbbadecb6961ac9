//! Replay command for recorded tick files.

use anyhow::{Context, Result};
use candela_lib::ReplayFeed;
use std::path::Path;

use crate::settings::Settings;

/// Aggregates the ticks recorded in `file`.
pub(crate) async fn replay(
    settings: Settings,
    file: &Path,
    duration: Option<u64>,
    quiet: bool,
) -> Result<()> {
    let feed = ReplayFeed::open(file)
        .await
        .with_context(|| format!("Failed to open tick file {}", file.display()))?;
    super::execute(settings, feed, duration, quiet).await
}
