//! Commit store reader for 1.2.0 contracts.

use super::{
    bindings::{ICommitStore, ReportAccepted},
    codec,
    config::JsonCommitOffchainConfig,
};
use crate::{
    calls::call_contract,
    decode_offchain_config, decode_onchain_config,
    filters::{self, COMMIT_EXEC_LOGS_RETENTION, EXEC_REPORT_ACCEPTS, filter_name},
    logs::{latest_finalized, parse_logs, word},
    prices::DaGasPriceEstimator,
};
use alloy_primitives::{Address, B256, Bytes};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use ccip_types::{
    CommitOffchainConfig, CommitOnchainConfig, CommitReport, CommitStoreReader,
    CommitStoreStaticConfig, ConfigSnapshot, Confirmations, ContractCaller, Event, EventFilter,
    ExecutionReport, GasFeeEstimator, Log, LogPoller, ReaderError,
};
use std::sync::Arc;
use tokio::sync::RwLock;

type Snapshot = ConfigSnapshot<CommitOnchainConfig, CommitOffchainConfig>;

/// Reads from a 1.2.0 commit store.
#[derive(Debug)]
pub struct CommitStore {
    address: Address,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
    fee_estimator: Arc<dyn GasFeeEstimator>,
    filters: Vec<EventFilter>,
    config: RwLock<Option<Arc<Snapshot>>>,
}

impl CommitStore {
    /// Creates a reader for the commit store at `address`.
    ///
    /// The reader is unconfigured until the first [`CommitStoreReader::change_config`].
    pub fn new(
        address: Address,
        caller: Arc<dyn ContractCaller>,
        poller: Arc<dyn LogPoller>,
        fee_estimator: Arc<dyn GasFeeEstimator>,
    ) -> Self {
        let filters = vec![EventFilter::new(
            filter_name(EXEC_REPORT_ACCEPTS, address),
            vec![ReportAccepted::SIGNATURE_HASH],
            vec![address],
            COMMIT_EXEC_LOGS_RETENTION,
        )];
        Self { address, caller, poller, fee_estimator, filters, config: RwLock::new(None) }
    }

    /// Returns the event filters the reader registers.
    pub fn filters(&self) -> &[EventFilter] {
        &self.filters
    }

    fn parse_report(log: &Log) -> Result<CommitReport, ReaderError> {
        let event = ReportAccepted::decode_log_data(&log.log_data())?;
        Ok(codec::commit_report_from_abi(event.report))
    }
}

#[async_trait]
impl CommitStoreReader for CommitStore {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_static_config(&self) -> Result<CommitStoreStaticConfig, ReaderError> {
        let config =
            call_contract(self.caller.as_ref(), self.address, ICommitStore::getStaticConfigCall {})
                .await?;
        Ok(CommitStoreStaticConfig {
            chain_selector: config.chainSelector,
            source_chain_selector: config.sourceChainSelector,
            on_ramp: config.onRamp,
            arm_proxy: config.armProxy,
        })
    }

    async fn get_dynamic_config(&self) -> Result<Arc<Snapshot>, ReaderError> {
        self.config.read().await.clone().ok_or(ReaderError::NotConfigured)
    }

    async fn change_config(&self, onchain: &[u8], offchain: &[u8]) -> Result<Address, ReaderError> {
        let onchain = decode_onchain_config::<ICommitStore::DynamicConfig>(onchain)?;
        let offchain = decode_offchain_config::<JsonCommitOffchainConfig>(offchain)?;
        let estimator = DaGasPriceEstimator::new(
            Arc::clone(&self.fee_estimator),
            offchain.max_gas_price,
            offchain.gas_price_deviation_ppb.into(),
            offchain.da_gas_price_deviation_ppb.into(),
        );
        let snapshot = Arc::new(ConfigSnapshot::new(onchain, offchain, Arc::new(estimator)));

        *self.config.write().await = Some(snapshot);
        info!(
            target: "commit_store",
            address = %self.address,
            price_registry = %onchain.price_registry,
            price_reporting_disabled = offchain.price_reporting_disabled,
            "Changed commit store config"
        );
        Ok(onchain.price_registry)
    }

    async fn get_expected_next_sequence_number(&self) -> Result<u64, ReaderError> {
        let call = ICommitStore::getExpectedNextSequenceNumberCall {};
        Ok(call_contract(self.caller.as_ref(), self.address, call).await?)
    }

    async fn get_latest_price_epoch_and_round(&self) -> Result<u64, ReaderError> {
        let call = ICommitStore::getLatestPriceEpochAndRoundCall {};
        Ok(call_contract(self.caller.as_ref(), self.address, call).await?)
    }

    async fn get_commit_report_matching_seq_num(
        &self,
        seq_num: u64,
        confs: Confirmations,
    ) -> Result<Vec<Event<CommitReport>>, ReaderError> {
        let logs = self
            .poller
            .logs_data_word_between(
                ReportAccepted::SIGNATURE_HASH,
                self.address,
                2,
                3,
                word(seq_num),
                confs,
            )
            .await?;
        let latest_finalized = latest_finalized(self.poller.as_ref()).await?;
        let mut reports = parse_logs(&logs, latest_finalized, Self::parse_report)?;

        if reports.len() > 1 {
            warn!(
                target: "commit_store",
                seq_num,
                matches = reports.len(),
                "More than one commit report matches sequence number, using the first"
            );
            reports.truncate(1);
        }
        Ok(reports)
    }

    async fn get_accepted_commit_reports_since(
        &self,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<Event<CommitReport>>, ReaderError> {
        let logs = self
            .poller
            .logs_since(ReportAccepted::SIGNATURE_HASH, self.address, timestamp, confs)
            .await?;
        let latest_finalized = latest_finalized(self.poller.as_ref()).await?;
        parse_logs(&logs, latest_finalized, Self::parse_report)
    }

    async fn is_blessed(&self, root: B256) -> Result<bool, ReaderError> {
        let call = ICommitStore::isBlessedCall { root };
        Ok(call_contract(self.caller.as_ref(), self.address, call).await?)
    }

    async fn is_down(&self) -> bool {
        let call = ICommitStore::isUnpausedAndNotCursedCall {};
        match call_contract(self.caller.as_ref(), self.address, call).await {
            Ok(healthy) => !healthy,
            Err(err) => {
                warn!(
                    target: "commit_store",
                    address = %self.address,
                    %err,
                    "Assuming commit store is down"
                );
                true
            }
        }
    }

    async fn verify_execution_report(&self, report: &ExecutionReport) -> Result<bool, ReaderError> {
        let call = ICommitStore::verifyCall {
            hashedLeaves: report.messages.iter().map(|message| message.hash).collect(),
            proofs: report.proofs.clone(),
            proofFlagBits: report.proof_flag_bits,
        };
        let timestamp = call_contract(self.caller.as_ref(), self.address, call).await?;
        Ok(!timestamp.is_zero())
    }

    fn encode_commit_report(&self, report: &CommitReport) -> Result<Bytes, ReaderError> {
        codec::encode_commit_report(report)
    }

    fn decode_commit_report(&self, data: &[u8]) -> Result<CommitReport, ReaderError> {
        codec::decode_commit_report(data)
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
    use crate::test_utils::{InMemoryLogPoller, StaticContractCaller, StaticFeeEstimator};
    use alloy_primitives::{U256, address};
    use alloy_sol_types::SolValue;
    use ccip_types::{GasPriceUpdate, Interval, TokenPrice};
    use serde_json::json;

    const COMMIT_STORE: Address = address!("0x6660000000000000000000000000000000000002");

    struct Harness {
        caller: Arc<StaticContractCaller>,
        poller: Arc<InMemoryLogPoller>,
        store: CommitStore,
    }

    fn harness() -> Harness {
        let caller = Arc::new(StaticContractCaller::default());
        let poller = Arc::new(InMemoryLogPoller::default());
        poller.set_latest_block(100, 90);
        let fees = Arc::new(StaticFeeEstimator::new(U256::from(10), Some(U256::from(3))));
        let store = CommitStore::new(COMMIT_STORE, caller.clone(), poller.clone(), fees);
        Harness { caller, poller, store }
    }

    fn offchain_config() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "SourceFinalityDepth": 3,
            "DestFinalityDepth": 4,
            "GasPriceHeartBeat": "1h",
            "DAGasPriceDeviationPPB": 10,
            "ExecGasPriceDeviationPPB": 20,
            "TokenPriceHeartBeat": "30m",
            "TokenPriceDeviationPPB": 30,
            "MaxGasPrice": 1_000,
            "InflightCacheExpiry": "3m",
            "PriceReportingDisabled": true,
        }))
        .unwrap()
    }

    fn report(min: u64, max: u64) -> CommitReport {
        CommitReport {
            token_prices: vec![TokenPrice {
                token: Address::repeat_byte(0xd1),
                value: U256::from(5),
            }],
            gas_prices: vec![
                GasPriceUpdate { dest_chain_selector: 4, value: U256::from(9) },
                GasPriceUpdate { dest_chain_selector: 5, value: U256::from(11) },
            ],
            interval: Interval::new(min, max),
            merkle_root: B256::repeat_byte(max as u8),
        }
    }

    fn accepted_log(report: &CommitReport, block_number: u64) -> Log {
        Log {
            address: COMMIT_STORE,
            topics: vec![ReportAccepted::SIGNATURE_HASH],
            data: codec::encode_commit_report(report).unwrap(),
            block_number,
            block_timestamp: block_number * 12,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_change_config_builds_packed_estimator() {
        let h = harness();
        let registry = Address::repeat_byte(0x77);
        let onchain = ICommitStore::DynamicConfig { priceRegistry: registry }.abi_encode();

        assert_eq!(h.store.change_config(&onchain, &offchain_config()).await.unwrap(), registry);
        let offchain = h.store.offchain_config().await.unwrap();
        assert!(offchain.price_reporting_disabled);
        assert_eq!(offchain.da_gas_price_deviation_ppb, 10);

        let estimator = h.store.gas_price_estimator().await.unwrap();
        let price = estimator.get_gas_price().await.unwrap();
        assert_eq!(price, DaGasPriceEstimator::encode(U256::from(3), U256::from(10)).unwrap());
    }

    #[tokio::test]
    async fn test_reports_with_many_gas_prices() {
        let h = harness();
        h.poller.add_log(accepted_log(&report(1, 10), 20));
        h.poller.add_log(accepted_log(&report(11, 20), 95));

        let matches = h
            .store
            .get_commit_report_matching_seq_num(15, Confirmations::UNCONFIRMED)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].data, report(11, 20));
        assert!(!matches[0].meta.finalized);

        let finalized = h
            .store
            .get_commit_report_matching_seq_num(15, Confirmations::Finalized)
            .await
            .unwrap();
        assert!(finalized.is_empty());

        let since =
            h.store.get_accepted_commit_reports_since(0, Confirmations::UNCONFIRMED).await.unwrap();
        assert_eq!(since.len(), 2);
        assert_eq!(since[0].data.gas_prices.len(), 2);
    }

    #[tokio::test]
    async fn test_is_down_when_cursed() {
        let h = harness();
        h.caller.on_call(COMMIT_STORE, ICommitStore::isUnpausedAndNotCursedCall {}, false);
        assert!(h.store.is_down().await);

        h.caller.on_call(COMMIT_STORE, ICommitStore::isUnpausedAndNotCursedCall {}, true);
        assert!(!h.store.is_down().await);
    }

    #[tokio::test]
    async fn test_blessed_and_epoch() {
        let h = harness();
        let root = B256::repeat_byte(0x0f);
        h.caller.on_call(COMMIT_STORE, ICommitStore::isBlessedCall { root }, true);
        h.caller.on_call(COMMIT_STORE, ICommitStore::getLatestPriceEpochAndRoundCall {}, 77u64);

        assert!(h.store.is_blessed(root).await.unwrap());
        assert!(h.store.is_blessed(B256::ZERO).await.is_err());
        assert_eq!(h.store.get_latest_price_epoch_and_round().await.unwrap(), 77);
    }

    #[test]
    fn test_report_codec_keeps_every_gas_price() {
        let h = harness();
        let report = report(3, 4);
        let encoded = h.store.encode_commit_report(&report).unwrap();
        assert_eq!(h.store.decode_commit_report(&encoded).unwrap(), report);
    }
}
