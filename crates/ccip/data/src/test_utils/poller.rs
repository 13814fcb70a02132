use super::lock;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use ccip_types::{Confirmations, EventFilter, LatestBlock, Log, LogPoller, LogPollerError};
use std::{collections::BTreeMap, sync::Mutex};

#[derive(Debug, Default)]
struct State {
    filters: BTreeMap<String, EventFilter>,
    logs: Vec<Log>,
    latest: LatestBlock,
}

impl State {
    fn confirmed(&self, log: &Log, confs: Confirmations) -> bool {
        match confs {
            Confirmations::Finalized => log.block_number <= self.latest.finalized_number,
            Confirmations::Depth(0) => true,
            Confirmations::Depth(depth) => {
                log.block_number.saturating_add(depth) <= self.latest.number
            }
        }
    }

    /// Returns the confirmed logs of `event_sig` from `address` matching `pred`,
    /// ordered by block and log index.
    fn select(
        &self,
        event_sig: B256,
        address: Address,
        confs: Confirmations,
        pred: impl Fn(&Log) -> bool,
    ) -> Vec<Log> {
        let mut logs: Vec<Log> = self
            .logs
            .iter()
            .filter(|log| log.address == address && log.event_sig() == Some(event_sig))
            .filter(|log| self.confirmed(log, confs) && pred(log))
            .cloned()
            .collect();
        logs.sort_by_key(|log| (log.block_number, log.log_index));
        logs
    }
}

/// A [`LogPoller`] backed by a vector of logs.
#[derive(Debug, Default)]
pub struct InMemoryLogPoller {
    state: Mutex<State>,
}

impl InMemoryLogPoller {
    /// Sets the latest indexed and finalized blocks.
    pub fn set_latest_block(&self, number: u64, finalized_number: u64) {
        lock(&self.state).latest = LatestBlock { number, finalized_number };
    }

    /// Appends a log to the store.
    pub fn add_log(&self, log: Log) {
        lock(&self.state).logs.push(log);
    }

    /// Returns the names of the registered filters, sorted.
    pub fn registered_filters(&self) -> Vec<String> {
        lock(&self.state).filters.keys().cloned().collect()
    }
}

#[async_trait]
impl LogPoller for InMemoryLogPoller {
    async fn register_filter(&self, filter: EventFilter) -> Result<(), LogPollerError> {
        lock(&self.state).filters.entry(filter.name.clone()).or_insert(filter);
        Ok(())
    }

    async fn unregister_filter(&self, name: &str) -> Result<(), LogPollerError> {
        lock(&self.state)
            .filters
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| LogPollerError::FilterNotFound(name.to_string()))
    }

    async fn latest_block(&self) -> Result<LatestBlock, LogPollerError> {
        Ok(lock(&self.state).latest)
    }

    async fn logs_by_topic_and_address(
        &self,
        event_sig: B256,
        address: Address,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError> {
        Ok(lock(&self.state).select(event_sig, address, confs, |_| true))
    }

    async fn logs_by_indexed_word_range(
        &self,
        event_sig: B256,
        address: Address,
        word_index: usize,
        low: B256,
        high: B256,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError> {
        Ok(lock(&self.state).select(event_sig, address, confs, |log| {
            log.data_word(word_index).is_some_and(|word| low <= word && word <= high)
        }))
    }

    async fn logs_data_word_between(
        &self,
        event_sig: B256,
        address: Address,
        lower_index: usize,
        upper_index: usize,
        value: B256,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError> {
        Ok(lock(&self.state).select(event_sig, address, confs, |log| {
            match (log.data_word(lower_index), log.data_word(upper_index)) {
                (Some(lower), Some(upper)) => lower <= value && value <= upper,
                _ => false,
            }
        }))
    }

    async fn indexed_logs_topic_range(
        &self,
        event_sig: B256,
        address: Address,
        topic_index: usize,
        low: B256,
        high: B256,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError> {
        Ok(lock(&self.state).select(event_sig, address, confs, |log| {
            log.topics.get(topic_index).is_some_and(|topic| low <= *topic && *topic <= high)
        }))
    }

    async fn indexed_logs_created_after(
        &self,
        event_sig: B256,
        address: Address,
        topic_index: usize,
        values: Vec<B256>,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError> {
        Ok(lock(&self.state).select(event_sig, address, confs, |log| {
            log.block_timestamp > timestamp &&
                log.topics.get(topic_index).is_some_and(|topic| values.contains(topic))
        }))
    }

    async fn logs_since(
        &self,
        event_sig: B256,
        address: Address,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError> {
        Ok(lock(&self.state).select(event_sig, address, confs, |log| {
            log.block_timestamp > timestamp
        }))
    }

    async fn logs_by_tx_hash(
        &self,
        event_sig: B256,
        address: Address,
        tx_hash: B256,
    ) -> Result<Vec<Log>, LogPollerError> {
        Ok(lock(&self.state).select(event_sig, address, Confirmations::UNCONFIRMED, |log| {
            log.tx_hash == tx_hash
        }))
    }

    async fn latest_block_by_event_sigs_addrs(
        &self,
        from_block: u64,
        event_sigs: Vec<B256>,
        addresses: Vec<Address>,
        confs: Confirmations,
    ) -> Result<Option<u64>, LogPollerError> {
        let state = lock(&self.state);
        Ok(state
            .logs
            .iter()
            .filter(|log| log.block_number >= from_block && state.confirmed(log, confs))
            .filter(|log| addresses.contains(&log.address))
            .filter(|log| log.event_sig().is_some_and(|sig| event_sigs.contains(&sig)))
            .map(|log| log.block_number)
            .max())
    }
}
