//! Output formatting for the candela CLI.

use candela_lib::{FileStore, OutputFormat, PipelineReport};
use clap::ValueEnum;

/// Candle file format selectable on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Prints the summary of a finished run.
pub(crate) fn print_report(report: &PipelineReport, store: &FileStore) {
    let feed = &report.feed;
    println!(
        "Aggregated {} ticks ({} rejected{})",
        feed.forwarded,
        feed.rejected,
        if feed.cancelled { ", stopped early" } else { "" }
    );
    println!();
    println!(
        "{:<6} {:>8} {:>8} {:>8} {:>8}  File",
        "Period", "Received", "Candles", "Flushed", "Late"
    );
    for stage in &report.stages {
        println!(
            "{:<6} {:>8} {:>8} {:>8} {:>8}  {}",
            stage.period.to_string(),
            stage.received,
            stage.produced(),
            stage.flushed,
            stage.rejected,
            store.path_for(stage.period).display()
        );
    }
}
