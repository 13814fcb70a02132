//! On-ramp reader for 1.0.0 contracts.

use super::{
    bindings::{CCIPSendRequested, IEVM2EVMOnRamp},
    codec::message_from_abi,
    hasher::MessageHasher,
};
use crate::{
    AutoSync,
    calls::call_contract,
    filters::{
        self, CACHE_EVICTION_LOGS_RETENTION, COMMIT_CCIP_SENDS, COMMIT_EXEC_LOGS_RETENTION,
        ONRAMP_CONFIG_SET, filter_name,
    },
    logs::{latest_finalized, parse_logs, word},
};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use ccip_types::{
    Confirmations, ContractCaller, EventFilter, LogPoller, MessageWithMeta, OnRampDynamicConfig,
    OnRampReader, OnRampStaticConfig, ReaderError,
};
use std::sync::Arc;

/// Reads from a 1.0.0 on-ramp.
#[derive(Debug)]
pub struct OnRamp {
    address: Address,
    dest_chain_selector: u64,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
    hasher: MessageHasher,
    dynamic_config: AutoSync<OnRampDynamicConfig>,
    filters: Vec<EventFilter>,
}

impl OnRamp {
    /// Creates a reader for the on-ramp at `address` serving the lane from
    /// `source_chain_selector` to `dest_chain_selector`.
    pub fn new(
        address: Address,
        source_chain_selector: u64,
        dest_chain_selector: u64,
        caller: Arc<dyn ContractCaller>,
        poller: Arc<dyn LogPoller>,
    ) -> Self {
        let filters = vec![
            EventFilter::new(
                filter_name(COMMIT_CCIP_SENDS, address),
                vec![CCIPSendRequested::SIGNATURE_HASH],
                vec![address],
                COMMIT_EXEC_LOGS_RETENTION,
            ),
            EventFilter::new(
                filter_name(ONRAMP_CONFIG_SET, address),
                vec![IEVM2EVMOnRamp::ConfigSet::SIGNATURE_HASH],
                vec![address],
                CACHE_EVICTION_LOGS_RETENTION,
            ),
        ];
        let dynamic_config = AutoSync::new(
            "onramp_dynamic_config",
            Arc::clone(&poller),
            vec![IEVM2EVMOnRamp::ConfigSet::SIGNATURE_HASH],
            address,
        );
        Self {
            address,
            dest_chain_selector,
            caller,
            poller,
            hasher: MessageHasher::new(source_chain_selector, dest_chain_selector, address),
            dynamic_config,
            filters,
        }
    }

    /// Returns the lane's leaf hasher.
    pub const fn hasher(&self) -> &MessageHasher {
        &self.hasher
    }

    /// Returns the event filters the reader registers.
    pub fn filters(&self) -> &[EventFilter] {
        &self.filters
    }

    async fn fetch_dynamic_config(&self) -> Result<OnRampDynamicConfig, ReaderError> {
        let call = IEVM2EVMOnRamp::getDynamicConfigCall {};
        let config = call_contract(self.caller.as_ref(), self.address, call).await?;
        Ok(OnRampDynamicConfig {
            router: config.router,
            max_number_of_tokens_per_msg: config.maxTokensLength,
            price_registry: config.priceRegistry,
            max_data_bytes: config.maxDataSize,
            max_per_msg_gas_limit: config.maxGasLimit,
            ..Default::default()
        })
    }
}

#[async_trait]
impl OnRampReader for OnRamp {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_static_config(&self) -> Result<OnRampStaticConfig, ReaderError> {
        let call = IEVM2EVMOnRamp::getStaticConfigCall {};
        let config = call_contract(self.caller.as_ref(), self.address, call).await?;
        Ok(OnRampStaticConfig {
            link_token: config.linkToken,
            chain_selector: config.chainSelector,
            dest_chain_selector: config.destChainSelector,
            default_tx_gas_limit: config.defaultTxGasLimit,
            max_nop_fees_juels: U256::from_limbs_slice(config.maxNopFeesJuels.as_limbs()),
            prev_on_ramp: config.prevOnRamp,
            arm_proxy: config.armProxy,
        })
    }

    async fn get_dynamic_config(&self) -> Result<OnRampDynamicConfig, ReaderError> {
        self.dynamic_config.get(|| self.fetch_dynamic_config()).await
    }

    async fn get_send_requests_between(
        &self,
        seq_min: u64,
        seq_max: u64,
        finalized: bool,
    ) -> Result<Vec<MessageWithMeta>, ReaderError> {
        let logs = self
            .poller
            .logs_by_indexed_word_range(
                CCIPSendRequested::SIGNATURE_HASH,
                self.address,
                4,
                word(seq_min),
                word(seq_max),
                Confirmations::from_finalized(finalized),
            )
            .await?;
        let latest_finalized = latest_finalized(self.poller.as_ref()).await?;
        parse_logs(&logs, latest_finalized, |log| {
            let event = CCIPSendRequested::decode_log_data(&log.log_data())?;
            let hash = self.hasher.hash_evm_message(&event.message);
            Ok(message_from_abi(event.message, self.dest_chain_selector, hash))
        })
    }

    async fn get_usdc_message_prior_to_log_index_in_tx(
        &self,
        _log_index: u64,
        _offset: usize,
        _tx_hash: B256,
    ) -> Result<Bytes, ReaderError> {
        Err(ReaderError::Unsupported("USDC message lookup"))
    }

    async fn register_filters(&self) -> Result<(), ReaderError> {
        Ok(filters::register_filters(self.poller.as_ref(), &self.filters).await?)
    }

    async fn close(&self) -> Result<(), ReaderError> {
        Ok(filters::unregister_filters(self.poller.as_ref(), &self.filters).await?)
    }
}
