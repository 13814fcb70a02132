//! Off-ramp token and pool lookups shared by every off-ramp version.

use crate::{
    AutoSync,
    bindings::{IOffRampTokens, PoolAdded, PoolRemoved},
    calls::{batch_call_contracts, evm_call},
};
use alloy_primitives::Address;
use alloy_sol_types::{SolCall, SolEvent};
use ccip_types::{CallError, ContractCaller, LogPoller, OffRampTokens, ReaderError};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::sync::Mutex;

/// Token configuration of one off-ramp.
///
/// The token and pool lists are refreshed whenever a pool is added or removed.
/// Source to destination token entries never change once read.
#[derive(Debug)]
pub(crate) struct OffRampTokenPools {
    off_ramp: Address,
    caller: Arc<dyn ContractCaller>,
    tokens: AutoSync<OffRampTokens>,
    dest_by_source: Mutex<HashMap<Address, Address>>,
}

impl OffRampTokenPools {
    pub(crate) fn new(
        off_ramp: Address,
        caller: Arc<dyn ContractCaller>,
        poller: Arc<dyn LogPoller>,
    ) -> Self {
        let tokens = AutoSync::new(
            "offramp_tokens",
            poller,
            vec![PoolAdded::SIGNATURE_HASH, PoolRemoved::SIGNATURE_HASH],
            off_ramp,
        );
        Self { off_ramp, caller, tokens, dest_by_source: Mutex::new(HashMap::new()) }
    }

    pub(crate) async fn tokens(&self) -> Result<OffRampTokens, ReaderError> {
        self.tokens.get(|| self.fetch_tokens()).await
    }

    async fn fetch_tokens(&self) -> Result<OffRampTokens, ReaderError> {
        let calls = vec![
            evm_call(self.off_ramp, &IOffRampTokens::getDestinationTokensCall {}),
            evm_call(self.off_ramp, &IOffRampTokens::getSupportedTokensCall {}),
        ];
        let results = self.caller.batch_call(calls).await?;
        let [destination, source] = <[_; 2]>::try_from(results).map_err(|results: Vec<_>| {
            CallError::Transport(format!("batch returned {} results for 2 calls", results.len()))
        })?;
        let destination_tokens =
            IOffRampTokens::getDestinationTokensCall::abi_decode_returns(&destination?)?;
        let source_tokens = IOffRampTokens::getSupportedTokensCall::abi_decode_returns(&source?)?;

        let mut destination_pool = HashMap::with_capacity(destination_tokens.len());
        if !destination_tokens.is_empty() {
            let calls = destination_tokens
                .iter()
                .map(|token| {
                    (self.off_ramp, IOffRampTokens::getPoolByDestTokenCall { destToken: *token })
                })
                .collect();
            let pools = batch_call_contracts(self.caller.as_ref(), calls).await?;
            destination_pool.extend(destination_tokens.iter().copied().zip(pools));
        }

        debug!(
            target: "offramp",
            off_ramp = %self.off_ramp,
            destination_tokens = destination_tokens.len(),
            source_tokens = source_tokens.len(),
            "Fetched offramp tokens"
        );
        Ok(OffRampTokens { destination_tokens, source_tokens, destination_pool })
    }

    /// Maps each of `source_tokens` to its destination token, preserving order.
    ///
    /// Uncached tokens are read in one batch. Nothing is cached unless the batch
    /// succeeds and the combined mapping has no destination token shared by two
    /// source tokens.
    pub(crate) async fn destination_tokens(
        &self,
        source_tokens: &[Address],
    ) -> Result<Vec<Address>, ReaderError> {
        let mut resolved = self.dest_by_source.lock().await.clone();

        let mut seen = HashSet::new();
        let missing: Vec<Address> = source_tokens
            .iter()
            .copied()
            .filter(|token| !resolved.contains_key(token) && seen.insert(*token))
            .collect();

        let mut fetched = Vec::with_capacity(missing.len());
        if !missing.is_empty() {
            let calls = missing
                .iter()
                .map(|token| {
                    (self.off_ramp, IOffRampTokens::getDestinationTokenCall { sourceToken: *token })
                })
                .collect();
            let destinations = batch_call_contracts(self.caller.as_ref(), calls).await?;
            fetched.extend(missing.into_iter().zip(destinations));
            resolved.extend(fetched.iter().copied());
        }

        let mut source_by_dest: HashMap<Address, Address> = HashMap::new();
        let mut destinations = Vec::with_capacity(source_tokens.len());
        for source in source_tokens {
            let Some(dest) = resolved.get(source).copied() else {
                return Err(ReaderError::OffRampMisconfigured(format!(
                    "no destination token for source token {source}"
                )));
            };
            match source_by_dest.insert(dest, *source) {
                Some(other) if other != *source => {
                    return Err(ReaderError::OffRampMisconfigured(format!(
                        "destination token {dest} already exists for source token {other}"
                    )));
                }
                _ => destinations.push(dest),
            }
        }

        if !fetched.is_empty() {
            self.dest_by_source.lock().await.extend(fetched);
        }
        Ok(destinations)
    }

    pub(crate) async fn source_to_dest_mapping(
        &self,
    ) -> Result<HashMap<Address, Address>, ReaderError> {
        let source_tokens = self.tokens().await?.source_tokens;
        let destinations = self.destination_tokens(&source_tokens).await?;
        Ok(source_tokens.into_iter().zip(destinations).collect())
    }
}
