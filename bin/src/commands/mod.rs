//! CLI command implementations.

pub(crate) mod replay;
pub(crate) mod run;

use anyhow::{Context, Result};
use candela_lib::{FileStore, Pipeline, PriceFeed};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::display::print_report;
use crate::settings::Settings;

/// Runs `feed` through the configured pipeline into the file store.
///
/// Stops when the feed ends, on Ctrl-C, or once `duration` seconds have
/// passed, and returns only after every stage has flushed.
pub(crate) async fn execute<F>(
    settings: Settings,
    feed: F,
    duration: Option<u64>,
    quiet: bool,
) -> Result<()>
where
    F: PriceFeed + 'static,
{
    let store = Arc::new(
        FileStore::open(settings.store)
            .await
            .context("Failed to open candle store")?,
    );
    let pipeline =
        Pipeline::new(settings.pipeline, store.clone()).context("Invalid pipeline settings")?;
    info!(periods = ?pipeline.periods(), dir = %store.dir().display(), "starting pipeline");

    let handle = pipeline.start(feed);
    let stopper = tokio::spawn(stop_on_signal(
        handle.cancellation_token(),
        duration.map(Duration::from_secs),
    ));

    let result = handle.join().await;
    stopper.abort();
    let report = result.context("Pipeline failed")?;

    if !quiet {
        print_report(&report, &store);
    }
    Ok(())
}

/// Cancels the pipeline on Ctrl-C or when the run duration elapses.
async fn stop_on_signal(cancel: CancellationToken, duration: Option<Duration>) {
    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    tokio::select! {
        () = cancel.cancelled() => return,
        () = &mut deadline => info!("run duration elapsed, shutting down"),
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("interrupt received, shutting down"),
            Err(e) => {
                warn!(error = %e, "cannot listen for Ctrl-C");
                tokio::select! {
                    () = cancel.cancelled() => return,
                    () = &mut deadline => info!("run duration elapsed, shutting down"),
                }
            }
        },
    }
    cancel.cancel();
}
