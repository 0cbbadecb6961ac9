//! Generator-driven run command.

use anyhow::Result;
use candela_lib::PriceGenerator;

use crate::settings::Settings;

/// Aggregates random-walk prices until interrupted.
pub(crate) async fn run(settings: Settings, duration: Option<u64>, quiet: bool) -> Result<()> {
    let feed = PriceGenerator::new(settings.generator.clone());
    super::execute(settings, feed, duration, quiet).await
}
