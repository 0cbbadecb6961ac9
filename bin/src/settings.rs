//! Settings file of the CLI.

use anyhow::{Context, Result};
use candela_lib::{GeneratorConfig, PipelineConfig, StoreConfig};
use serde::Deserialize;
use std::path::Path;

use crate::PipelineArgs;

/// Everything a pipeline command needs, read from an optional TOML file.
///
/// ```toml
/// [pipeline]
/// tickers = ["AAPL", "SBER"]
/// periods = ["1m", "2m", "10m"]
/// channel_capacity = 64
///
/// [store]
/// dir = "candles"
/// format = "csv"
/// header = true
///
/// [generator]
/// delay_ms = 250
/// seed = 42
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) pipeline: PipelineConfig,
    pub(crate) store: StoreConfig,
    pub(crate) generator: GeneratorConfig,
}

impl Settings {
    /// Reads the settings file, or returns the defaults without one.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.generator.validate()?;
        Ok(settings)
    }

    /// Applies command line overrides.
    pub(crate) fn apply(&mut self, args: &PipelineArgs) {
        if !args.tickers.is_empty() {
            self.pipeline.tickers.clone_from(&args.tickers);
        }
        if !args.periods.is_empty() {
            self.pipeline.periods.clone_from(&args.periods);
        }
        if let Some(capacity) = args.capacity {
            self.pipeline.channel_capacity = capacity;
        }
        if let Some(dir) = &args.output_dir {
            self.store.dir.clone_from(dir);
        }
        if let Some(format) = args.format {
            self.store.format = format.into();
        }
        if args.header {
            self.store.header = true;
        }
        // The generator produces prices for exactly the tracked tickers.
        if !self.pipeline.tickers.is_empty() {
            self.generator.tickers.clone_from(&self.pipeline.tickers);
        }
    }
}
