use super::{deviates, sorted_middle, to_usd};
use alloy_primitives::U256;
use async_trait::async_trait;
use ccip_types::{GasFeeEstimator, GasPrice, GasPriceError, GasPriceEstimator, ReaderError};
use std::sync::Arc;

/// Estimates a single execution gas price.
#[derive(Debug, Clone)]
pub struct ExecGasPriceEstimator {
    estimator: Arc<dyn GasFeeEstimator>,
    max_gas_price: U256,
    deviation_ppb: u64,
}

impl ExecGasPriceEstimator {
    /// Creates a new [`ExecGasPriceEstimator`].
    pub fn new(
        estimator: Arc<dyn GasFeeEstimator>,
        max_gas_price: U256,
        deviation_ppb: u64,
    ) -> Self {
        Self { estimator, max_gas_price, deviation_ppb }
    }
}

#[async_trait]
impl GasPriceEstimator for ExecGasPriceEstimator {
    async fn get_gas_price(&self) -> Result<GasPrice, ReaderError> {
        let price = self.estimator.get_fee(self.max_gas_price).await?;
        if price > self.max_gas_price {
            return Err(GasPriceError::AboveMax { price, max: self.max_gas_price }.into());
        }
        Ok(price)
    }

    fn denote_in_usd(
        &self,
        price: GasPrice,
        wrapped_native_price: U256,
    ) -> Result<GasPrice, ReaderError> {
        Ok(to_usd(price, wrapped_native_price))
    }

    fn median(&self, prices: &[GasPrice]) -> Result<GasPrice, ReaderError> {
        Ok(sorted_middle(prices)?)
    }

    fn deviates(&self, a: GasPrice, b: GasPrice) -> Result<bool, ReaderError> {
        Ok(deviates(a, b, self.deviation_ppb))
    }

    fn max_gas_price(&self) -> U256 {
        self.max_gas_price
    }
}
