//! Off-ramp reader for 1.2.0 contracts.

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
    prices::DaGasPriceEstimator,
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

/// Reads from a 1.2.0 off-ramp.
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

        let estimator = DaGasPriceEstimator::new(
            Arc::clone(&self.fee_estimator),
            offchain.max_gas_price,
            0,
            0,
        );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bindings::IOffRampTokens,
        test_utils::{InMemoryLogPoller, StaticContractCaller, StaticFeeEstimator},
        v1_2_0::bindings::{EVM2EVMMessage, ExecutionReport as AbiExecutionReport},
    };
    use alloy_primitives::{B256, U256, address};
    use alloy_sol_types::SolValue;
    use ccip_types::{Log, Message};
    use serde_json::json;
    use std::time::Duration;

    const OFF_RAMP: Address = address!("0x3330000000000000000000000000000000000002");
    const ROUTER: Address = address!("0x0000000000000000000000000000000000000a11");
    const REGISTRY: Address = address!("0x0000000000000000000000000000000000000b22");
    const WRAPPED: Address = address!("0x0000000000000000000000000000000000000c33");

    struct Harness {
        caller: Arc<StaticContractCaller>,
        poller: Arc<InMemoryLogPoller>,
        off_ramp: OffRamp,
    }

    fn harness() -> Harness {
        let caller = Arc::new(StaticContractCaller::default());
        let poller = Arc::new(InMemoryLogPoller::default());
        poller.set_latest_block(100, 50);
        let fees = Arc::new(StaticFeeEstimator::new(U256::from(10), Some(U256::from(2))));
        let off_ramp = OffRamp::new(OFF_RAMP, caller.clone(), poller.clone(), fees);
        Harness { caller, poller, off_ramp }
    }

    fn onchain_config() -> Vec<u8> {
        IEVM2EVMOffRamp::DynamicConfig {
            permissionLessExecutionThresholdSeconds: 600,
            router: ROUTER,
            priceRegistry: REGISTRY,
            maxNumberOfTokensPerMsg: 5,
            maxDataBytes: 30_000,
            maxPoolReleaseOrMintGas: 200_000,
        }
        .abi_encode()
    }

    fn offchain_config() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "SourceFinalityDepth": 3,
            "DestOptimisticConfirmations": 6,
            "DestFinalityDepth": 3,
            "BatchGasLimit": 5_000_000,
            "RelativeBoostPerWaitHour": 0.07,
            "MaxGasPrice": 500,
            "InflightCacheExpiry": "64s",
            "RootSnoozeTime": "128m",
            "MessageVisibilityInterval": "8h",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_change_config() {
        let h = harness();
        h.caller.on_call(ROUTER, IRouter::getWrappedNativeCall {}, WRAPPED);

        let (registry, wrapped) =
            h.off_ramp.change_config(&onchain_config(), &offchain_config()).await.unwrap();
        assert_eq!((registry, wrapped), (REGISTRY, WRAPPED));

        let onchain = h.off_ramp.onchain_config().await.unwrap();
        assert_eq!(onchain.max_pool_release_or_mint_gas, 200_000);
        let offchain = h.off_ramp.offchain_config().await.unwrap();
        assert_eq!(offchain.message_visibility_interval, Duration::from_secs(8 * 3600));

        let estimator = h.off_ramp.gas_price_estimator().await.unwrap();
        let price = estimator.get_gas_price().await.unwrap();
        assert_eq!(DaGasPriceEstimator::decode(price).unwrap(), (U256::from(2), U256::from(10)));
    }

    #[tokio::test]
    async fn test_state_changes_use_one_finality_snapshot() {
        let h = harness();
        for (seq, block) in [(1, 49), (2, 50), (3, 51)] {
            h.poller.add_log(Log {
                address: OFF_RAMP,
                topics: vec![
                    ExecutionStateChanged::SIGNATURE_HASH,
                    word(seq),
                    B256::repeat_byte(seq as u8),
                ],
                data: (U256::from(3), Bytes::new()).abi_encode_params().into(),
                block_number: block,
                ..Default::default()
            });
        }

        let changes = h
            .off_ramp
            .get_execution_state_changes_between(1, 3, Confirmations::UNCONFIRMED)
            .await
            .unwrap();
        let finalized: Vec<_> = changes.iter().map(|c| c.meta.finalized).collect();
        assert_eq!(finalized, vec![true, true, false]);
        assert!(changes.iter().all(|c| c.data.state == MessageExecutionState::Failure));
    }

    #[tokio::test]
    async fn test_execution_report_carries_source_token_data() {
        let h = harness();
        let message = Message {
            source_chain_selector: 1,
            sequence_number: 9,
            sender: Address::repeat_byte(0x11).into(),
            receiver: Address::repeat_byte(0x22).into(),
            fee_token: Address::repeat_byte(0x33).into(),
            source_token_data: vec![Bytes::from_static(b"usdc")],
            ..Default::default()
        };
        let report = ExecutionReport {
            messages: vec![message],
            offchain_token_data: vec![vec![Bytes::from_static(b"attestation")]],
            proofs: vec![B256::repeat_byte(0x01)],
            proof_flag_bits: U256::from(1),
        };

        let encoded = h.off_ramp.encode_execution_report(&report).unwrap();
        let raw = <AbiExecutionReport as SolValue>::abi_decode(&encoded).unwrap();
        let first: &EVM2EVMMessage = &raw.messages[0];
        assert_eq!(first.sourceTokenData, vec![Bytes::from_static(b"usdc")]);
        assert_eq!(h.off_ramp.decode_execution_report(&encoded).unwrap(), report);
    }

    #[tokio::test]
    async fn test_duplicate_destination_token_is_misconfiguration() {
        let h = harness();
        let dest = Address::repeat_byte(0xbb);
        let sources = [Address::repeat_byte(0xa1), Address::repeat_byte(0xa2)];
        for source in sources {
            h.caller.on_call(
                OFF_RAMP,
                IOffRampTokens::getDestinationTokenCall { sourceToken: source },
                dest,
            );
        }

        let err =
            h.off_ramp.get_destination_tokens_from_source_tokens(&sources).await.unwrap_err();
        assert!(matches!(err, ReaderError::OffRampMisconfigured(_)));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_static_config() {
        let h = harness();
        let commit_store = Address::repeat_byte(0x66);
        h.caller.on_call(
            OFF_RAMP,
            IEVM2EVMOffRamp::getStaticConfigCall {},
            IEVM2EVMOffRamp::StaticConfig {
                commitStore: commit_store,
                chainSelector: 4,
                sourceChainSelector: 1,
                onRamp: Address::repeat_byte(0x55),
                prevOffRamp: Address::ZERO,
                armProxy: Address::repeat_byte(0x77),
            },
        );
        let config = h.off_ramp.get_static_config().await.unwrap();
        assert_eq!(config.commit_store, commit_store);
        assert_eq!(config.source_chain_selector, 1);
    }
}
