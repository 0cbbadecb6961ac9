//! Drives a price feed into the first aggregation stage.

use candela_types::PriceTick;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::PriceFeed;

/// Outcome of a feed pump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Ticks handed to the first stage.
    pub forwarded: u64,
    /// Malformed or untracked ticks dropped before the pipeline.
    pub rejected: u64,
    /// True if the pump stopped because of cancellation.
    pub cancelled: bool,
}

/// Forwards ticks from `feed` to `output` until the feed ends, the token is
/// cancelled, or the receiver goes away.
///
/// Ticks failing [`PriceTick::validate`] are rejected here, as are ticks for
/// tickers outside `tracked` (an empty set tracks everything). Sends await
/// when the first stage is busy. The output channel closes when the pump
/// returns, which starts the stage-by-stage flush.
pub async fn pump<F: PriceFeed>(
    mut feed: F,
    tracked: &HashSet<String>,
    output: mpsc::Sender<PriceTick>,
    cancel: CancellationToken,
) -> FeedReport {
    let mut report = FeedReport::default();

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                report.cancelled = true;
                break;
            }
            next = feed.next_tick() => next,
        };
        let Some(tick) = next else {
            debug!("price feed exhausted");
            break;
        };

        if let Err(e) = tick.validate() {
            warn!(error = %e, "rejecting malformed tick");
            report.rejected += 1;
            continue;
        }
        if !tracked.is_empty() && !tracked.contains(&tick.ticker) {
            debug!(ticker = %tick.ticker, "ignoring untracked ticker");
            report.rejected += 1;
            continue;
        }

        if output.send(tick).await.is_err() {
            warn!("first stage stopped receiving, closing price feed");
            break;
        }
        report.forwarded += 1;
    }

    info!(
        forwarded = report.forwarded,
        rejected = report.rejected,
        cancelled = report.cancelled,
        "price feed closed"
    );
    report
}
