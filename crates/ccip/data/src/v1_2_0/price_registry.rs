//! Price registry reader for 1.2.0 contracts.

use super::bindings::IPriceRegistry;
use crate::{calls::call_contract, price_registry::PriceRegistryCore};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use ccip_types::{
    CodecError, Confirmations, ContractCaller, EventFilter, GasPriceUpdateWithMeta, LogPoller,
    PriceRegistryReader, ReaderError, TokenPriceUpdate, TokenPriceUpdateWithMeta,
};
use std::sync::Arc;

/// Reads from a 1.2.0 price registry.
#[derive(Debug)]
pub struct PriceRegistry {
    core: PriceRegistryCore,
}

impl PriceRegistry {
    /// Creates a reader for the price registry at `address`.
    pub fn new(
        address: Address,
        caller: Arc<dyn ContractCaller>,
        poller: Arc<dyn LogPoller>,
    ) -> Self {
        Self { core: PriceRegistryCore::new(address, caller, poller) }
    }

    /// Returns the event filters the reader registers.
    pub fn filters(&self) -> &[EventFilter] {
        self.core.filters()
    }
}

#[async_trait]
impl PriceRegistryReader for PriceRegistry {
    fn address(&self) -> Address {
        self.core.address()
    }

    async fn get_fee_tokens(&self) -> Result<Vec<Address>, ReaderError> {
        self.core.fee_tokens().await
    }

    async fn get_token_prices(
        &self,
        tokens: &[Address],
    ) -> Result<Vec<TokenPriceUpdate>, ReaderError> {
        let call = IPriceRegistry::getTokenPricesCall { tokens: tokens.to_vec() };
        let prices = call_contract(self.core.caller(), self.core.address(), call).await?;
        if prices.len() != tokens.len() {
            return Err(CodecError::AssumptionViolation(format!(
                "got {} prices for {} tokens",
                prices.len(),
                tokens.len()
            ))
            .into());
        }
        Ok(tokens
            .iter()
            .zip(prices)
            .map(|(token, price)| TokenPriceUpdate {
                token: *token,
                value: U256::from_limbs(price.value.into_limbs()),
                timestamp: price.timestamp.into(),
            })
            .collect())
    }

    async fn get_token_price_updates_since(
        &self,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<TokenPriceUpdateWithMeta>, ReaderError> {
        self.core.token_price_updates_since(timestamp, confs).await
    }

    async fn get_gas_price_updates_since(
        &self,
        chain_selector: Option<u64>,
        timestamp: u64,
        confs: Confirmations,
    ) -> Result<Vec<GasPriceUpdateWithMeta>, ReaderError> {
        self.core.gas_price_updates_since(chain_selector, timestamp, confs).await
    }

    async fn get_tokens_decimals(&self, tokens: &[Address]) -> Result<Vec<u8>, ReaderError> {
        self.core.tokens_decimals(tokens).await
    }

    async fn register_filters(&self) -> Result<(), ReaderError> {
        self.core.register_filters().await
    }

    async fn close(&self) -> Result<(), ReaderError> {
        self.core.close().await
    }
}
