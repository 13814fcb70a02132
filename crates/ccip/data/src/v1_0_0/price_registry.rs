//! Price registry reader for 1.0.0 contracts.

use super::bindings::IPriceRegistry;
use crate::{calls::call_contract, price_registry::PriceRegistryCore};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use ccip_types::{
    CodecError, Confirmations, ContractCaller, EventFilter, GasPriceUpdateWithMeta, LogPoller,
    PriceRegistryReader, ReaderError, TokenPriceUpdate, TokenPriceUpdateWithMeta,
};
use std::sync::Arc;

/// Reads from a 1.0.0 price registry.
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
                value: U256::from_limbs_slice(price.value.as_limbs()),
                timestamp: price.timestamp,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{InMemoryLogPoller, StaticContractCaller},
        v1_0_0::bindings::TimestampedUint192Value,
    };
    use alloy_primitives::{address, aliases::U192};

    const REGISTRY: Address = address!("0x7770000000000000000000000000000000000001");

    #[tokio::test]
    async fn test_token_prices_keep_request_order() {
        let caller = Arc::new(StaticContractCaller::default());
        let registry =
            PriceRegistry::new(REGISTRY, caller.clone(), Arc::new(InMemoryLogPoller::default()));
        let tokens = vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)];
        caller.on_call(
            REGISTRY,
            IPriceRegistry::getTokenPricesCall { tokens: tokens.clone() },
            vec![
                TimestampedUint192Value { value: U192::from(5), timestamp: 100 },
                TimestampedUint192Value { value: U192::MAX, timestamp: 200 },
            ],
        );

        let prices = registry.get_token_prices(&tokens).await.unwrap();
        assert_eq!(
            prices[0],
            TokenPriceUpdate { token: tokens[0], value: U256::from(5), timestamp: 100 }
        );
        assert_eq!(prices[1].value, (U256::from(1) << 192) - U256::from(1));
        assert_eq!(prices[1].token, tokens[1]);
    }

    #[tokio::test]
    async fn test_token_prices_call_failure() {
        let caller = Arc::new(StaticContractCaller::default());
        let registry = PriceRegistry::new(REGISTRY, caller, Arc::new(InMemoryLogPoller::default()));
        let err = registry.get_token_prices(&[Address::repeat_byte(0x01)]).await.unwrap_err();
        assert!(!err.is_fatal());
    }
}
