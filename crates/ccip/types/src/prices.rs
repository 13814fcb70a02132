//! Gas price estimation strategies.

use crate::ReaderError;
use alloy_primitives::U256;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// A gas price in the estimator's own encoding.
///
/// Depending on the strategy this is a plain execution price or a packed
/// execution and data availability price.
pub type GasPrice = U256;

/// An error reading, encoding or aggregating gas prices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GasPriceError {
    /// The chain reported a price above the configured ceiling.
    #[error("gas price {price} exceeds max gas price {max}")]
    AboveMax {
        /// The observed price.
        price: U256,
        /// The configured ceiling.
        max: U256,
    },
    /// A price component does not fit its packed encoding.
    #[error("gas price {price} does not fit in {bits} bits")]
    OutOfRange {
        /// The offending price.
        price: U256,
        /// The width of the encoding.
        bits: usize,
    },
    /// An aggregate was requested over no prices.
    #[error("no gas prices to aggregate")]
    Empty,
}

/// A version-specific strategy for reading, comparing and pricing gas.
#[async_trait]
pub trait GasPriceEstimator: Debug + Send + Sync {
    /// Reads the current gas price from the chain.
    async fn get_gas_price(&self) -> Result<GasPrice, ReaderError>;

    /// Converts `price` into USD using the wrapped native token's USD price.
    fn denote_in_usd(
        &self,
        price: GasPrice,
        wrapped_native_price: U256,
    ) -> Result<GasPrice, ReaderError>;

    /// Returns the median of `prices`.
    fn median(&self, prices: &[GasPrice]) -> Result<GasPrice, ReaderError>;

    /// Returns `true` if `a` deviates from `b` by more than the configured threshold.
    fn deviates(&self, a: GasPrice, b: GasPrice) -> Result<bool, ReaderError>;

    /// Returns the configured execution gas price ceiling.
    fn max_gas_price(&self) -> U256;
}
