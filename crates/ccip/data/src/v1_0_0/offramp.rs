//! Off-ramp reader for 1.0.0 contracts.

use super::{bindings::IEVM2EVMOffRamp, codec, config::JsonExecOffchainConfig};
use crate::{
    bindings::{ExecutionStateChanged, IRouter, PoolAdded, PoolRemoved},
    calls::call_contract,
    decode_offchain_config, decode_onchain_config,
    filters::{
        self, CACHE_EVICTION_LOGS_RETENTION, COMMIT_EXEC_LOGS_RETENTION,
        EXEC_EXECUTION_STATE_CHANGES, EXEC_TOKEN_POOL_ADDED, EXEC_TOKEN_POOL_REMOVED, filter_name,
    },
    logs::{latest_finalized, parse_execution_state_changed, parse_logs, word},
    prices::ExecGasPriceEstimator,
    tokens::OffRampTokenPools,
};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use ccip_types::{
    CodecError, ConfigSnapshot, Confirmations, ContractCaller, EventFilter, ExecOffchainConfig,
    ExecOnchainConfig, ExecutionReport, ExecutionStateChangedWithMeta, GasFeeEstimator, LogPoller,
    MessageExecutionState, OffRampReader, OffRampStaticConfig, OffRampTokens, ReaderError,
    TokenBucketRateLimit, UnknownAddress,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

type Snapshot = ConfigSnapshot<ExecOnchainConfig, ExecOffchainConfig>;

/// Reads from a 1.0.0 off-ramp.
#[derive(Debug)]
pub struct OffRamp {
    address: Address,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
    fee_estimator: Arc<dyn GasFeeEstimator>,
    tokens: OffRampTokenPools,
    filters: Vec<EventFilter>,
    config: RwLock<Option<Arc<Snapshot>>>,
}

impl OffRamp {
    /// Creates a reader for the off-ramp at `address`.
    pub fn new(
        address: Address,
        caller: Arc<dyn ContractCaller>,
        poller: Arc<dyn LogPoller>,
        fee_estimator: Arc<dyn GasFeeEstimator>,
    ) -> Self {
        let filters = vec![
            EventFilter::new(
                filter_name(EXEC_EXECUTION_STATE_CHANGES, address),
                vec![ExecutionStateChanged::SIGNATURE_HASH],
                vec![address],
                COMMIT_EXEC_LOGS_RETENTION,
            ),
            EventFilter::new(
                filter_name(EXEC_TOKEN_POOL_ADDED, address),
                vec![PoolAdded::SIGNATURE_HASH],
                vec![address],
                CACHE_EVICTION_LOGS_RETENTION,
            ),
            EventFilter::new(
                filter_name(EXEC_TOKEN_POOL_REMOVED, address),
                vec![PoolRemoved::SIGNATURE_HASH],
                vec![address],
                CACHE_EVICTION_LOGS_RETENTION,
            ),
        ];
        let tokens = OffRampTokenPools::new(address, Arc::clone(&caller), Arc::clone(&poller));
        Self {
            address,
            caller,
            poller,
            fee_estimator,
            tokens,
            filters,
            config: RwLock::new(None),
        }
    }

    /// Returns the event filters the reader registers.
    pub fn filters(&self) -> &[EventFilter] {
        &self.filters
    }
}

#[async_trait]
impl OffRampReader for OffRamp {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_static_config(&self) -> Result<OffRampStaticConfig, ReaderError> {
        let call = IEVM2EVMOffRamp::getStaticConfigCall {};
        let config = call_contract(self.caller.as_ref(), self.address, call).await?;
        Ok(OffRampStaticConfig {
            commit_store: config.commitStore,
            chain_selector: config.chainSelector,
            source_chain_selector: config.sourceChainSelector,
            on_ramp: config.onRamp,
            prev_off_ramp: config.prevOffRamp,
            arm_proxy: config.armProxy,
        })
    }

    async fn get_dynamic_config(&self) -> Result<Arc<Snapshot>, ReaderError> {
        self.config.read().await.clone().ok_or(ReaderError::NotConfigured)
    }

    async fn change_config(
        &self,
        onchain: &[u8],
        offchain: &[u8],
    ) -> Result<(Address, Address), ReaderError> {
        let onchain = decode_onchain_config::<IEVM2EVMOffRamp::DynamicConfig>(onchain)?;
        let offchain = decode_offchain_config::<JsonExecOffchainConfig>(offchain)?;
        let wrapped_native =
            call_contract(self.caller.as_ref(), onchain.router, IRouter::getWrappedNativeCall {})
                .await?;

        let estimator =
            ExecGasPriceEstimator::new(Arc::clone(&self.fee_estimator), offchain.max_gas_price, 0);
        let snapshot = Arc::new(ConfigSnapshot::new(onchain, offchain, Arc::new(estimator)));

        *self.config.write().await = Some(snapshot);
        info!(
            target: "offramp",
            address = %self.address,
            router = %onchain.router,
            price_registry = %onchain.price_registry,
            %wrapped_native,
            "Changed offramp config"
        );
        Ok((onchain.price_registry, wrapped_native))
    }

    async fn get_execution_state(
        &self,
        seq_num: u64,
    ) -> Result<MessageExecutionState, ReaderError> {
        let call = IEVM2EVMOffRamp::getExecutionStateCall { sequenceNumber: seq_num };
        let code = call_contract(self.caller.as_ref(), self.address, call).await?;
        MessageExecutionState::try_from(code).map_err(|code| {
            CodecError::AssumptionViolation(format!("unknown execution state {code}")).into()
        })
    }

    async fn get_sender_nonce(&self, sender: &UnknownAddress) -> Result<u64, ReaderError> {
        let call = IEVM2EVMOffRamp::getSenderNonceCall { sender: sender.to_evm()? };
        Ok(call_contract(self.caller.as_ref(), self.address, call).await?)
    }

    async fn current_rate_limiter_state(&self) -> Result<TokenBucketRateLimit, ReaderError> {
        let call = IEVM2EVMOffRamp::currentRateLimiterStateCall {};
        let bucket = call_contract(self.caller.as_ref(), self.address, call).await?;
        Ok(TokenBucketRateLimit {
            tokens: bucket.tokens,
            last_updated: bucket.lastUpdated,
            is_enabled: bucket.isEnabled,
            capacity: bucket.capacity,
            rate: bucket.rate,
        })
    }

    async fn get_tokens(&self) -> Result<OffRampTokens, ReaderError> {
        self.tokens.tokens().await
    }

    async fn get_destination_tokens_from_source_tokens(
        &self,
        tokens: &[Address],
    ) -> Result<Vec<Address>, ReaderError> {
        self.tokens.destination_tokens(tokens).await
    }

    async fn get_source_to_dest_tokens_mapping(
        &self,
    ) -> Result<HashMap<Address, Address>, ReaderError> {
        self.tokens.source_to_dest_mapping().await
    }

    async fn get_execution_state_changes_between(
        &self,
        seq_min: u64,
        seq_max: u64,
        confs: Confirmations,
    ) -> Result<Vec<ExecutionStateChangedWithMeta>, ReaderError> {
        let logs = self
            .poller
            .indexed_logs_topic_range(
                ExecutionStateChanged::SIGNATURE_HASH,
                self.address,
                1,
                word(seq_min),
                word(seq_max),
                confs,
            )
            .await?;
        let latest_finalized = latest_finalized(self.poller.as_ref()).await?;
        parse_logs(&logs, latest_finalized, parse_execution_state_changed)
    }

    fn encode_execution_report(&self, report: &ExecutionReport) -> Result<Bytes, ReaderError> {
        codec::encode_execution_report(report)
    }

    fn decode_execution_report(&self, data: &[u8]) -> Result<ExecutionReport, ReaderError> {
        codec::decode_execution_report(data)
    }

    async fn register_filters(&self) -> Result<(), ReaderError> {
        Ok(filters::register_filters(self.poller.as_ref(), &self.filters).await?)
    }

    async fn close(&self) -> Result<(), ReaderError> {
        Ok(filters::unregister_filters(self.poller.as_ref(), &self.filters).await?)
    }
}
