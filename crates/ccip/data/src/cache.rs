//! A cache invalidated by on-chain events.

use alloy_primitives::{Address, B256};
use ccip_types::{Confirmations, LogPoller, ReaderError};
use std::{fmt, future::Future, sync::Arc};
use tokio::sync::Mutex;

#[derive(Debug)]
struct Cached<T> {
    value: T,
    /// Finalized block the value is known to be current at.
    last_change_block: u64,
}

/// A value that is re-fetched whenever one of a set of events lands in a
/// finalized block newer than the one the value was fetched at.
///
/// Fetching happens outside the lock and the cached value only changes after a
/// fetch succeeds, so a failed or cancelled refresh leaves the previous value
/// in place.
pub struct AutoSync<T> {
    name: &'static str,
    poller: Arc<dyn LogPoller>,
    event_sigs: Vec<B256>,
    address: Address,
    state: Mutex<Option<Cached<T>>>,
}

impl<T> fmt::Debug for AutoSync<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoSync")
            .field("name", &self.name)
            .field("event_sigs", &self.event_sigs)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send> AutoSync<T> {
    /// Creates an empty cache that watches `event_sigs` emitted by `address`.
    pub fn new(
        name: &'static str,
        poller: Arc<dyn LogPoller>,
        event_sigs: Vec<B256>,
        address: Address,
    ) -> Self {
        Self { name, poller, event_sigs, address, state: Mutex::new(None) }
    }

    /// Returns the cached value, calling `fetch` first if it is missing or stale.
    pub async fn get<F, Fut>(&self, fetch: F) -> Result<T, ReaderError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, ReaderError>> + Send,
    {
        let cached = {
            let state = self.state.lock().await;
            state.as_ref().map(|cached| (cached.value.clone(), cached.last_change_block))
        };

        let fetch_block = match cached {
            Some((value, last_change_block)) => match self.stale_at(last_change_block).await? {
                None => {
                    #[cfg(feature = "metrics")]
                    metrics::counter!(crate::Metrics::CACHE_HITS, "cache" => self.name)
                        .increment(1);
                    return Ok(value);
                }
                Some(block) => block,
            },
            None => self.poller.latest_block().await?.finalized_number,
        };

        #[cfg(feature = "metrics")]
        metrics::counter!(crate::Metrics::CACHE_MISSES, "cache" => self.name).increment(1);

        let value = fetch().await?;

        let mut state = self.state.lock().await;
        let newer = state.as_ref().is_none_or(|cached| fetch_block >= cached.last_change_block);
        if newer {
            debug!(target: "cache", name = self.name, block = fetch_block, "Refreshed cache");
            *state = Some(Cached { value: value.clone(), last_change_block: fetch_block });
        }
        Ok(value)
    }

    /// Returns the block to re-fetch at if a watched event landed after `last_change_block`.
    async fn stale_at(&self, last_change_block: u64) -> Result<Option<u64>, ReaderError> {
        let latest_finalized = self.poller.latest_block().await?.finalized_number;
        if latest_finalized <= last_change_block {
            return Ok(None);
        }

        let latest_event = self
            .poller
            .latest_block_by_event_sigs_addrs(
                last_change_block,
                self.event_sigs.clone(),
                vec![self.address],
                Confirmations::Finalized,
            )
            .await?;
        Ok(latest_event.filter(|block| *block > last_change_block).map(|_| latest_finalized))
    }
}
