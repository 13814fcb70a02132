use alloy_primitives::U256;
use async_trait::async_trait;
use ccip_types::{CallError, GasFeeEstimator};

/// A [`GasFeeEstimator`] that always reports the same prices.
#[derive(Debug, Clone, Copy)]
pub struct StaticFeeEstimator {
    fee: U256,
    da_gas_price: Option<U256>,
}

impl StaticFeeEstimator {
    /// Creates a new [`StaticFeeEstimator`].
    pub const fn new(fee: U256, da_gas_price: Option<U256>) -> Self {
        Self { fee, da_gas_price }
    }
}

#[async_trait]
impl GasFeeEstimator for StaticFeeEstimator {
    async fn get_fee(&self, _max_gas_price: U256) -> Result<U256, CallError> {
        Ok(self.fee)
    }

    async fn da_gas_price(&self) -> Result<Option<U256>, CallError> {
        Ok(self.da_gas_price)
    }
}
