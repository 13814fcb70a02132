use super::{deviates, sorted_middle, to_usd};
use crate::prices::ExecGasPriceEstimator;
use alloy_primitives::U256;
use async_trait::async_trait;
use ccip_types::{GasFeeEstimator, GasPrice, GasPriceError, GasPriceEstimator, ReaderError};
use std::sync::Arc;

/// Width of each packed price component.
pub const PRICE_ENCODING_BITS: usize = 112;

/// Estimates a packed execution and data availability gas price.
///
/// The data availability price occupies the bits above [`PRICE_ENCODING_BITS`],
/// the execution price the bits below. Chains without a data availability fee
/// leave the upper component at zero.
#[derive(Debug, Clone)]
pub struct DaGasPriceEstimator {
    exec: ExecGasPriceEstimator,
    estimator: Arc<dyn GasFeeEstimator>,
    da_deviation_ppb: u64,
}

impl DaGasPriceEstimator {
    /// Creates a new [`DaGasPriceEstimator`].
    pub fn new(
        estimator: Arc<dyn GasFeeEstimator>,
        max_gas_price: U256,
        exec_deviation_ppb: u64,
        da_deviation_ppb: u64,
    ) -> Self {
        let exec = ExecGasPriceEstimator::new(estimator.clone(), max_gas_price, exec_deviation_ppb);
        Self { exec, estimator, da_deviation_ppb }
    }

    /// Packs a data availability and an execution price.
    pub fn encode(da_price: U256, exec_price: U256) -> Result<GasPrice, GasPriceError> {
        for price in [da_price, exec_price] {
            if price.bit_len() > PRICE_ENCODING_BITS {
                return Err(GasPriceError::OutOfRange { price, bits: PRICE_ENCODING_BITS });
            }
        }
        Ok((da_price << PRICE_ENCODING_BITS) | exec_price)
    }

    /// Splits a packed price into its data availability and execution components.
    pub fn decode(price: GasPrice) -> Result<(U256, U256), GasPriceError> {
        if price.bit_len() > 2 * PRICE_ENCODING_BITS {
            return Err(GasPriceError::OutOfRange { price, bits: 2 * PRICE_ENCODING_BITS });
        }
        let mask = (U256::from(1) << PRICE_ENCODING_BITS) - U256::from(1);
        Ok((price >> PRICE_ENCODING_BITS, price & mask))
    }
}

#[async_trait]
impl GasPriceEstimator for DaGasPriceEstimator {
    async fn get_gas_price(&self) -> Result<GasPrice, ReaderError> {
        let exec_price = self.exec.get_gas_price().await?;
        let da_price = self.estimator.da_gas_price().await?.unwrap_or_default();
        Ok(Self::encode(da_price, exec_price)?)
    }

    fn denote_in_usd(
        &self,
        price: GasPrice,
        wrapped_native_price: U256,
    ) -> Result<GasPrice, ReaderError> {
        let (da_price, exec_price) = Self::decode(price)?;
        Ok(Self::encode(
            to_usd(da_price, wrapped_native_price),
            to_usd(exec_price, wrapped_native_price),
        )?)
    }

    fn median(&self, prices: &[GasPrice]) -> Result<GasPrice, ReaderError> {
        let mut da_prices = Vec::with_capacity(prices.len());
        let mut exec_prices = Vec::with_capacity(prices.len());
        for price in prices {
            let (da_price, exec_price) = Self::decode(*price)?;
            da_prices.push(da_price);
            exec_prices.push(exec_price);
        }
        Ok(Self::encode(sorted_middle(&da_prices)?, sorted_middle(&exec_prices)?)?)
    }

    fn deviates(&self, a: GasPrice, b: GasPrice) -> Result<bool, ReaderError> {
        let (a_da, a_exec) = Self::decode(a)?;
        let (b_da, b_exec) = Self::decode(b)?;
        if self.exec.deviates(a_exec, b_exec)? {
            return Ok(true);
        }
        Ok(deviates(a_da, b_da, self.da_deviation_ppb))
    }

    fn max_gas_price(&self) -> U256 {
        self.exec.max_gas_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticFeeEstimator;

    fn estimator(fee: u64, da: Option<u64>) -> DaGasPriceEstimator {
        let fees = Arc::new(StaticFeeEstimator::new(U256::from(fee), da.map(U256::from)));
        DaGasPriceEstimator::new(fees, U256::from(1_000_000u64), 100_000_000, 200_000_000)
    }

    #[tokio::test]
    async fn test_packs_da_price() {
        let price = estimator(7, Some(3)).get_gas_price().await.unwrap();
        assert_eq!(DaGasPriceEstimator::decode(price).unwrap(), (U256::from(3), U256::from(7)));

        let price = estimator(7, None).get_gas_price().await.unwrap();
        assert_eq!(price, U256::from(7));
    }

    #[test]
    fn test_rejects_oversized_component() {
        let too_big = U256::from(1) << PRICE_ENCODING_BITS;
        assert!(DaGasPriceEstimator::encode(too_big, U256::ZERO).is_err());
        assert!(DaGasPriceEstimator::decode(U256::MAX).is_err());
    }

    #[test]
    fn test_median_per_component() {
        let estimator = estimator(1, None);
        let prices = [
            DaGasPriceEstimator::encode(U256::from(1), U256::from(30)).unwrap(),
            DaGasPriceEstimator::encode(U256::from(2), U256::from(10)).unwrap(),
            DaGasPriceEstimator::encode(U256::from(3), U256::from(20)).unwrap(),
        ];
        let median = estimator.median(&prices).unwrap();
        assert_eq!(DaGasPriceEstimator::decode(median).unwrap(), (U256::from(2), U256::from(20)));
    }

    #[test]
    fn test_deviation_checks_both_components() {
        let estimator = estimator(1, None);
        let base = DaGasPriceEstimator::encode(U256::from(100), U256::from(100)).unwrap();
        let exec_moved = DaGasPriceEstimator::encode(U256::from(100), U256::from(120)).unwrap();
        let da_moved = DaGasPriceEstimator::encode(U256::from(130), U256::from(100)).unwrap();
        let both_small = DaGasPriceEstimator::encode(U256::from(110), U256::from(105)).unwrap();

        assert!(estimator.deviates(base, exec_moved).unwrap());
        assert!(estimator.deviates(base, da_moved).unwrap());
        assert!(!estimator.deviates(base, both_small).unwrap());
    }
}
