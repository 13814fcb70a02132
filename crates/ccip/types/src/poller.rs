//! The indexed event store collaborator.

use crate::TxMeta;
use alloy_primitives::{Address, B256, Bytes, LogData};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;

/// A raw log served by the [`LogPoller`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Log {
    /// The emitting contract.
    pub address: Address,
    /// The log topics. The first topic is the event signature.
    pub topics: Vec<B256>,
    /// The non-indexed data.
    pub data: Bytes,
    /// Number of the block containing the log.
    pub block_number: u64,
    /// Unix timestamp, in seconds, of the block containing the log.
    pub block_timestamp: u64,
    /// Hash of the emitting transaction.
    pub tx_hash: B256,
    /// Index of the log within its block.
    pub log_index: u64,
}

impl Log {
    /// Returns the event signature topic, if any.
    pub fn event_sig(&self) -> Option<B256> {
        self.topics.first().copied()
    }

    /// Returns the 32 byte data word at `index`, if present.
    pub fn data_word(&self, index: usize) -> Option<B256> {
        let start = index.checked_mul(32)?;
        let word = self.data.get(start..start.checked_add(32)?)?;
        Some(B256::from_slice(word))
    }

    /// Returns topics and data in the shape ABI event decoders expect.
    pub fn log_data(&self) -> LogData {
        LogData::new_unchecked(self.topics.clone(), self.data.clone())
    }

    /// Builds the [`TxMeta`] of this log.
    pub const fn meta(&self, finalized: bool) -> TxMeta {
        TxMeta {
            block_timestamp: self.block_timestamp,
            block_number: self.block_number,
            tx_hash: self.tx_hash,
            log_index: self.log_index,
            finalized,
        }
    }
}

/// The confirmation policy of a log query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confirmations {
    /// Only logs from finalized blocks.
    Finalized,
    /// Logs at least this many blocks deep. Zero means unconfirmed.
    Depth(u64),
}

impl Confirmations {
    /// Unconfirmed, best-effort logs.
    pub const UNCONFIRMED: Self = Self::Depth(0);

    /// Selects [`Confirmations::Finalized`] when `finalized` is set, otherwise unconfirmed.
    pub const fn from_finalized(finalized: bool) -> Self {
        if finalized { Self::Finalized } else { Self::UNCONFIRMED }
    }
}

impl From<u64> for Confirmations {
    fn from(depth: u64) -> Self {
        Self::Depth(depth)
    }
}

/// The head of the indexed chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestBlock {
    /// The latest indexed block.
    pub number: u64,
    /// The latest finalized block.
    pub finalized_number: u64,
}

/// A named log subscription.
///
/// The name is derived from a purpose label and a contract address, so
/// registering the same filter twice is a no-op for the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// The unique filter name.
    pub name: String,
    /// Event signatures to index.
    pub event_sigs: Vec<B256>,
    /// Contracts to index.
    pub addresses: Vec<Address>,
    /// How long matching logs are kept. Zero keeps them forever.
    pub retention: Duration,
}

impl EventFilter {
    /// Creates a new [`EventFilter`].
    pub fn new(
        name: impl Into<String>,
        event_sigs: Vec<B256>,
        addresses: Vec<Address>,
        retention: Duration,
    ) -> Self {
        Self { name: name.into(), event_sigs, addresses, retention }
    }

    /// Returns `true` if any of the filter's addresses is the zero address.
    pub fn has_zero_address(&self) -> bool {
        self.addresses.iter().any(|address| address.is_zero())
    }
}

/// An error returned by a [`LogPoller`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogPollerError {
    /// No filter with the given name is registered.
    #[error("filter {0} not found")]
    FilterNotFound(String),
    /// The store could not serve the request.
    #[error("log poller backend error: {0}")]
    Backend(String),
}

/// An append-only, indexed store of chain logs with confirmation semantics.
///
/// Topic indices count the event signature as topic zero. Data word indices
/// count 32 byte words from the start of the non-indexed data.
#[async_trait]
pub trait LogPoller: Debug + Send + Sync {
    /// Registers a filter. Registering an existing name is a no-op.
    async fn register_filter(&self, filter: EventFilter) -> Result<(), LogPollerError>;

    /// Unregisters the filter with the given name.
    async fn unregister_filter(&self, name: &str) -> Result<(), LogPollerError>;

    /// Returns the latest indexed and finalized block numbers.
    async fn latest_block(&self) -> Result<LatestBlock, LogPollerError>;

    /// Returns every log of `event_sig` emitted by `address`.
    async fn logs_by_topic_and_address(
        &self,
        event_sig: B256,
        address: Address,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError>;

    /// Returns logs whose data word at `word_index` lies in `[low, high]`.
    async fn logs_by_indexed_word_range(
        &self,
        event_sig: B256,
        address: Address,
        word_index: usize,
        low: B256,
        high: B256,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError>;

    /// Returns logs where `word[lower_index] <= value <= word[upper_index]`.
    async fn logs_data_word_between(
        &self,
        event_sig: B256,
        address: Address,
        lower_index: usize,
        upper_index: usize,
        value: B256,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError>;

    /// Returns logs whose topic at `topic_index` lies in `[low, high]`.
    async fn indexed_logs_topic_range(
        &self,
        event_sig: B256,
        address: Address,
        topic_index: usize,
        low: B256,
        high: B256,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError>;

    /// Returns logs from blocks after `timestamp` whose topic at `topic_index` is one of `values`.
    async fn indexed_logs_created_after(
        &self,
        event_sig: B256,
        address: Address,
        topic_index: usize,
        values: Vec<B256>,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError>;

    /// Returns logs from blocks after `timestamp`.
    async fn logs_since(
        &self,
        event_sig: B256,
        address: Address,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<Log>, LogPollerError>;

    /// Returns the logs of `event_sig` from `address` emitted by one transaction.
    async fn logs_by_tx_hash(
        &self,
        event_sig: B256,
        address: Address,
        tx_hash: B256,
    ) -> Result<Vec<Log>, LogPollerError>;

    /// Returns the highest block at or after `from_block` containing any of the
    /// given events from any of the given addresses, if one exists.
    async fn latest_block_by_event_sigs_addrs(
        &self,
        from_block: u64,
        event_sigs: Vec<B256>,
        addresses: Vec<Address>,
        confs: Confirmations,
    ) -> Result<Option<u64>, LogPollerError>;
}
