//! Price registry queries that are identical across versions.

use crate::{
    AutoSync,
    bindings::{
        FeeTokenAdded, FeeTokenRemoved, IERC20Metadata, IFeeTokens, UsdPerTokenUpdated,
        UsdPerUnitGasUpdated,
    },
    calls::{batch_call_contracts, call_contract},
    filters::{
        self, CACHE_EVICTION_LOGS_RETENTION, COMMIT_EXEC_LOGS_RETENTION, COMMIT_PRICE_UPDATES,
        FEE_TOKEN_ADDED, FEE_TOKEN_REMOVED, filter_name,
    },
    logs::{latest_finalized, parse_logs, word},
};
use alloy_primitives::Address;
use alloy_sol_types::SolEvent;
use ccip_types::{
    Confirmations, ContractCaller, EventFilter, GasPriceUpdateWithMeta,
    GasPriceUpdateWithTimestamp, LogPoller, ReaderError, TokenPriceUpdate,
    TokenPriceUpdateWithMeta,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::sync::Mutex;

/// The version-independent half of a price registry reader.
#[derive(Debug)]
pub(crate) struct PriceRegistryCore {
    address: Address,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
    filters: Vec<EventFilter>,
    fee_tokens: AutoSync<Vec<Address>>,
    decimals: Mutex<HashMap<Address, u8>>,
}

impl PriceRegistryCore {
    pub(crate) fn new(
        address: Address,
        caller: Arc<dyn ContractCaller>,
        poller: Arc<dyn LogPoller>,
    ) -> Self {
        let filters = vec![
            EventFilter::new(
                filter_name(COMMIT_PRICE_UPDATES, address),
                vec![UsdPerTokenUpdated::SIGNATURE_HASH, UsdPerUnitGasUpdated::SIGNATURE_HASH],
                vec![address],
                COMMIT_EXEC_LOGS_RETENTION,
            ),
            EventFilter::new(
                filter_name(FEE_TOKEN_ADDED, address),
                vec![FeeTokenAdded::SIGNATURE_HASH],
                vec![address],
                CACHE_EVICTION_LOGS_RETENTION,
            ),
            EventFilter::new(
                filter_name(FEE_TOKEN_REMOVED, address),
                vec![FeeTokenRemoved::SIGNATURE_HASH],
                vec![address],
                CACHE_EVICTION_LOGS_RETENTION,
            ),
        ];
        let fee_tokens = AutoSync::new(
            "fee_tokens",
            Arc::clone(&poller),
            vec![FeeTokenAdded::SIGNATURE_HASH, FeeTokenRemoved::SIGNATURE_HASH],
            address,
        );
        Self { address, caller, poller, filters, fee_tokens, decimals: Mutex::new(HashMap::new()) }
    }

    pub(crate) const fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn caller(&self) -> &dyn ContractCaller {
        self.caller.as_ref()
    }

    pub(crate) fn filters(&self) -> &[EventFilter] {
        &self.filters
    }

    pub(crate) async fn fee_tokens(&self) -> Result<Vec<Address>, ReaderError> {
        self.fee_tokens
            .get(|| async {
                Ok(call_contract(self.caller(), self.address, IFeeTokens::getFeeTokensCall {})
                    .await?)
            })
            .await
    }

    pub(crate) async fn token_price_updates_since(
        &self,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<TokenPriceUpdateWithMeta>, ReaderError> {
        let logs = self
            .poller
            .logs_since(UsdPerTokenUpdated::SIGNATURE_HASH, self.address, timestamp, confs)
            .await?;
        let latest_finalized = latest_finalized(self.poller.as_ref()).await?;
        parse_logs(&logs, latest_finalized, |log| {
            let update = UsdPerTokenUpdated::decode_log_data(&log.log_data())?;
            Ok(TokenPriceUpdate {
                token: update.token,
                value: update.value,
                timestamp: update.timestamp.saturating_to(),
            })
        })
    }

    pub(crate) async fn gas_price_updates_since(
        &self,
        chain_selector: Option<u64>,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<GasPriceUpdateWithMeta>, ReaderError> {
        let event_sig = UsdPerUnitGasUpdated::SIGNATURE_HASH;
        let logs = match chain_selector {
            Some(selector) => {
                self.poller
                    .indexed_logs_created_after(
                        event_sig,
                        self.address,
                        1,
                        vec![word(selector)],
                        timestamp,
                        confs,
                    )
                    .await?
            }
            None => self.poller.logs_since(event_sig, self.address, timestamp, confs).await?,
        };
        let latest_finalized = latest_finalized(self.poller.as_ref()).await?;
        parse_logs(&logs, latest_finalized, |log| {
            let update = UsdPerUnitGasUpdated::decode_log_data(&log.log_data())?;
            Ok(GasPriceUpdateWithTimestamp {
                dest_chain_selector: update.destChain,
                value: update.value,
                timestamp: update.timestamp.saturating_to(),
            })
        })
    }

    /// Returns the decimals of each token, preserving order.
    ///
    /// Decimals never change, so cached entries are never evicted. Uncached
    /// tokens are read in one batch and only cached if the whole batch succeeds.
    pub(crate) async fn tokens_decimals(&self, tokens: &[Address]) -> Result<Vec<u8>, ReaderError> {
        let mut known = self.decimals.lock().await.clone();

        let mut seen = HashSet::new();
        let missing: Vec<Address> = tokens
            .iter()
            .copied()
            .filter(|token| !known.contains_key(token) && seen.insert(*token))
            .collect();

        if !missing.is_empty() {
            let calls =
                missing.iter().map(|token| (*token, IERC20Metadata::decimalsCall {})).collect();
            let decimals = batch_call_contracts(self.caller(), calls).await?;
            let fetched: Vec<_> = missing.into_iter().zip(decimals).collect();
            known.extend(fetched.iter().copied());
            self.decimals.lock().await.extend(fetched);
            trace!(target: "price_registry", address = %self.address, "Cached token decimals");
        }

        tokens
            .iter()
            .map(|token| {
                known.get(token).copied().ok_or_else(|| {
                    ReaderError::NotFound(format!("decimals of token {token}"))
                })
            })
            .collect()
    }

    pub(crate) async fn register_filters(&self) -> Result<(), ReaderError> {
        Ok(filters::register_filters(self.poller.as_ref(), &self.filters).await?)
    }

    pub(crate) async fn close(&self) -> Result<(), ReaderError> {
        Ok(filters::unregister_filters(self.poller.as_ref(), &self.filters).await?)
    }
}
