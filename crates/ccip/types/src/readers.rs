//! Capability traits implemented by every contract version.

use crate::{
    CommitOffchainConfig, CommitOnchainConfig, CommitReport, CommitStoreStaticConfig,
    ConfigSnapshot, Confirmations, Event, ExecOffchainConfig, ExecOnchainConfig, ExecutionReport,
    ExecutionStateChangedWithMeta, GasPriceEstimator, GasPriceUpdateWithMeta, Log,
    MessageExecutionState, MessageWithMeta, OffRampStaticConfig, OffRampTokens,
    OnRampDynamicConfig, OnRampStaticConfig, ReaderError, TokenBucketRateLimit, TokenPriceUpdate,
    TokenPriceUpdateWithMeta, UnknownAddress,
};
use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// Derives the merkle leaf of a send event.
pub trait LeafHasher: Debug + Send + Sync {
    /// Hashes the send event carried by `log`.
    ///
    /// Fails only if the log is not a well-formed send event.
    fn hash_leaf(&self, log: &Log) -> Result<B256, ReaderError>;
}

/// Reads from and encodes for a commit store.
#[async_trait]
pub trait CommitStoreReader: Debug + Send + Sync {
    /// Returns the commit store address.
    fn address(&self) -> Address;

    /// Returns the deployment-time configuration.
    async fn get_static_config(&self) -> Result<CommitStoreStaticConfig, ReaderError>;

    /// Returns the current dynamic configuration generation.
    async fn get_dynamic_config(
        &self,
    ) -> Result<Arc<ConfigSnapshot<CommitOnchainConfig, CommitOffchainConfig>>, ReaderError>;

    /// Returns the current off-chain configuration.
    async fn offchain_config(&self) -> Result<CommitOffchainConfig, ReaderError> {
        Ok(self.get_dynamic_config().await?.offchain)
    }

    /// Returns the current on-chain configuration.
    async fn onchain_config(&self) -> Result<CommitOnchainConfig, ReaderError> {
        Ok(self.get_dynamic_config().await?.onchain)
    }

    /// Returns the gas price estimator of the current configuration.
    async fn gas_price_estimator(&self) -> Result<Arc<dyn GasPriceEstimator>, ReaderError> {
        Ok(Arc::clone(&self.get_dynamic_config().await?.gas_price_estimator))
    }

    /// Decodes a new config pair and swaps it in atomically.
    ///
    /// Returns the price registry named by the on-chain config. On error the
    /// previous configuration stays in effect.
    async fn change_config(&self, onchain: &[u8], offchain: &[u8]) -> Result<Address, ReaderError>;

    /// Returns the next sequence number the commit store expects.
    async fn get_expected_next_sequence_number(&self) -> Result<u64, ReaderError>;

    /// Returns the epoch and round of the latest price update.
    async fn get_latest_price_epoch_and_round(&self) -> Result<u64, ReaderError>;

    /// Returns the committed reports whose interval contains `seq_num`.
    ///
    /// At most one report is returned.
    async fn get_commit_report_matching_seq_num(
        &self,
        seq_num: u64,
        confs: Confirmations,
    ) -> Result<Vec<Event<CommitReport>>, ReaderError>;

    /// Returns the reports accepted in blocks after `timestamp`.
    async fn get_accepted_commit_reports_since(
        &self,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<Event<CommitReport>>, ReaderError>;

    /// Returns `true` if risk management has blessed `root`.
    async fn is_blessed(&self, root: B256) -> Result<bool, ReaderError>;

    /// Returns `true` if the commit store is paused, cursed or unreachable.
    async fn is_down(&self) -> bool;

    /// Verifies an execution report against the committed roots.
    async fn verify_execution_report(&self, report: &ExecutionReport) -> Result<bool, ReaderError>;

    /// Encodes a commit report in this version's layout.
    fn encode_commit_report(&self, report: &CommitReport) -> Result<Bytes, ReaderError>;

    /// Decodes a commit report from this version's layout.
    fn decode_commit_report(&self, data: &[u8]) -> Result<CommitReport, ReaderError>;

    /// Registers the reader's event filters.
    async fn register_filters(&self) -> Result<(), ReaderError>;

    /// Unregisters the reader's event filters.
    async fn close(&self) -> Result<(), ReaderError>;
}

/// Reads from and encodes for an off-ramp.
#[async_trait]
pub trait OffRampReader: Debug + Send + Sync {
    /// Returns the off-ramp address.
    fn address(&self) -> Address;

    /// Returns the deployment-time configuration.
    async fn get_static_config(&self) -> Result<OffRampStaticConfig, ReaderError>;

    /// Returns the current dynamic configuration generation.
    async fn get_dynamic_config(
        &self,
    ) -> Result<Arc<ConfigSnapshot<ExecOnchainConfig, ExecOffchainConfig>>, ReaderError>;

    /// Returns the current off-chain configuration.
    async fn offchain_config(&self) -> Result<ExecOffchainConfig, ReaderError> {
        Ok(self.get_dynamic_config().await?.offchain)
    }

    /// Returns the current on-chain configuration.
    async fn onchain_config(&self) -> Result<ExecOnchainConfig, ReaderError> {
        Ok(self.get_dynamic_config().await?.onchain)
    }

    /// Returns the gas price estimator of the current configuration.
    async fn gas_price_estimator(&self) -> Result<Arc<dyn GasPriceEstimator>, ReaderError> {
        Ok(Arc::clone(&self.get_dynamic_config().await?.gas_price_estimator))
    }

    /// Returns the destination router of the current configuration.
    async fn get_router(&self) -> Result<Address, ReaderError> {
        Ok(self.get_dynamic_config().await?.onchain.router)
    }

    /// Decodes a new config pair and swaps it in atomically.
    ///
    /// Returns the destination price registry and the router's wrapped native token.
    async fn change_config(
        &self,
        onchain: &[u8],
        offchain: &[u8],
    ) -> Result<(Address, Address), ReaderError>;

    /// Returns the execution state of `seq_num`.
    async fn get_execution_state(&self, seq_num: u64)
    -> Result<MessageExecutionState, ReaderError>;

    /// Returns the off-ramp's nonce for `sender`.
    async fn get_sender_nonce(&self, sender: &UnknownAddress) -> Result<u64, ReaderError>;

    /// Returns a snapshot of the rate limiter.
    async fn current_rate_limiter_state(&self) -> Result<TokenBucketRateLimit, ReaderError>;

    /// Returns the off-ramp's token configuration.
    async fn get_tokens(&self) -> Result<OffRampTokens, ReaderError>;

    /// Maps each source token to its destination token, preserving order.
    async fn get_destination_tokens_from_source_tokens(
        &self,
        tokens: &[Address],
    ) -> Result<Vec<Address>, ReaderError>;

    /// Returns the full source to destination token mapping.
    async fn get_source_to_dest_tokens_mapping(
        &self,
    ) -> Result<HashMap<Address, Address>, ReaderError>;

    /// Returns execution state changes for sequence numbers in `[seq_min, seq_max]`.
    async fn get_execution_state_changes_between(
        &self,
        seq_min: u64,
        seq_max: u64,
        confs: Confirmations,
    ) -> Result<Vec<ExecutionStateChangedWithMeta>, ReaderError>;

    /// Encodes an execution report in this version's layout.
    fn encode_execution_report(&self, report: &ExecutionReport) -> Result<Bytes, ReaderError>;

    /// Decodes an execution report from this version's layout.
    fn decode_execution_report(&self, data: &[u8]) -> Result<ExecutionReport, ReaderError>;

    /// Registers the reader's event filters.
    async fn register_filters(&self) -> Result<(), ReaderError>;

    /// Unregisters the reader's event filters.
    async fn close(&self) -> Result<(), ReaderError>;
}

/// Reads from an on-ramp.
#[async_trait]
pub trait OnRampReader: Debug + Send + Sync {
    /// Returns the on-ramp address.
    fn address(&self) -> Address;

    /// Returns the deployment-time configuration.
    async fn get_static_config(&self) -> Result<OnRampStaticConfig, ReaderError>;

    /// Returns the current dynamic configuration.
    async fn get_dynamic_config(&self) -> Result<OnRampDynamicConfig, ReaderError>;

    /// Returns the router of the current dynamic configuration.
    async fn router_address(&self) -> Result<Address, ReaderError> {
        Ok(self.get_dynamic_config().await?.router)
    }

    /// Returns the source price registry of the current dynamic configuration.
    async fn source_price_registry_address(&self) -> Result<Address, ReaderError> {
        Ok(self.get_dynamic_config().await?.price_registry)
    }

    /// Returns hashed send requests with sequence numbers in `[seq_min, seq_max]`.
    async fn get_send_requests_between(
        &self,
        seq_min: u64,
        seq_max: u64,
        finalized: bool,
    ) -> Result<Vec<MessageWithMeta>, ReaderError>;

    /// Returns the USDC `MessageSent` payload emitted `offset` positions before
    /// `log_index` in the transaction `tx_hash`.
    async fn get_usdc_message_prior_to_log_index_in_tx(
        &self,
        log_index: u64,
        offset: usize,
        tx_hash: B256,
    ) -> Result<Bytes, ReaderError>;

    /// Registers the reader's event filters.
    async fn register_filters(&self) -> Result<(), ReaderError>;

    /// Unregisters the reader's event filters.
    async fn close(&self) -> Result<(), ReaderError>;
}

/// Reads from a price registry.
#[async_trait]
pub trait PriceRegistryReader: Debug + Send + Sync {
    /// Returns the price registry address.
    fn address(&self) -> Address;

    /// Returns the accepted fee tokens.
    async fn get_fee_tokens(&self) -> Result<Vec<Address>, ReaderError>;

    /// Returns the latest price of each token, preserving order.
    async fn get_token_prices(
        &self,
        tokens: &[Address],
    ) -> Result<Vec<TokenPriceUpdate>, ReaderError>;

    /// Returns token price updates published in blocks after `timestamp`.
    async fn get_token_price_updates_since(
        &self,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<TokenPriceUpdateWithMeta>, ReaderError>;

    /// Returns gas price updates published in blocks after `timestamp`, optionally
    /// restricted to one destination chain.
    async fn get_gas_price_updates_since(
        &self,
        chain_selector: Option<u64>,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<GasPriceUpdateWithMeta>, ReaderError>;

    /// Returns the decimals of each token, preserving order.
    async fn get_tokens_decimals(&self, tokens: &[Address]) -> Result<Vec<u8>, ReaderError>;

    /// Registers the reader's event filters.
    async fn register_filters(&self) -> Result<(), ReaderError>;

    /// Unregisters the reader's event filters.
    async fn close(&self) -> Result<(), ReaderError>;
}
