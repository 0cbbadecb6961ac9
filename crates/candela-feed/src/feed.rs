//! Price feed abstraction and stream adapter.

use async_trait::async_trait;
use candela_types::PriceTick;
use futures::stream::{self, Stream, StreamExt};

/// A lazy, possibly infinite source of price ticks.
///
/// `next_tick` must be cancel safe: the feed pump drops a pending call when
/// the pipeline is cancelled, and no tick may be lost by doing so.
#[async_trait]
pub trait PriceFeed: Send {
    /// Returns the next tick, or `None` once the feed is exhausted.
    async fn next_tick(&mut self) -> Option<PriceTick>;
}

#[async_trait]
impl<F: PriceFeed + ?Sized> PriceFeed for Box<F> {
    async fn next_tick(&mut self) -> Option<PriceTick> {
        (**self).next_tick().await
    }
}

/// Feed backed by any [`Stream`] of ticks.
#[derive(Debug)]
pub struct StreamFeed<S> {
    stream: S,
}

impl<S> StreamFeed<S>
where
    S: Stream<Item = PriceTick> + Send + Unpin,
{
    /// Wraps a tick stream.
    #[must_use]
    pub const fn new(stream: S) -> Self {
        Self { stream }
    }
}

impl<I> StreamFeed<stream::Iter<I>>
where
    I: Iterator<Item = PriceTick> + Send,
{
    /// Creates a finite feed from a sequence of ticks.
    #[must_use]
    pub fn from_ticks(ticks: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            stream: stream::iter(ticks),
        }
    }
}

#[async_trait]
impl<S> PriceFeed for StreamFeed<S>
where
    S: Stream<Item = PriceTick> + Send + Unpin,
{
    async fn next_tick(&mut self) -> Option<PriceTick> {
        self.stream.next().await
    }
}
