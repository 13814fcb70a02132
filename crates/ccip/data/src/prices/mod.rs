//! Gas price estimation strategies.
//!
//! [`ExecGasPriceEstimator`] deals in a single execution gas price.
//! [`DaGasPriceEstimator`] packs a data availability price into the upper bits
//! of the same 256 bit word.

use alloy_primitives::U256;
use ccip_types::GasPriceError;

mod exec;
pub use exec::ExecGasPriceEstimator;

mod da;
pub use da::{DaGasPriceEstimator, PRICE_ENCODING_BITS};

const WEI_PER_UNIT: u64 = 1_000_000_000_000_000_000;
const PPB: u64 = 1_000_000_000;

/// Returns the middle element of `prices` once sorted.
pub(crate) fn sorted_middle(prices: &[U256]) -> Result<U256, GasPriceError> {
    let mut sorted = prices.to_vec();
    sorted.sort_unstable();
    sorted.get(sorted.len() / 2).copied().ok_or(GasPriceError::Empty)
}

/// Returns `true` if `b` deviates from `a` by more than `ppb` parts per billion of `a`.
///
/// A zero `a` deviates from any non-zero `b`.
pub(crate) fn deviates(a: U256, b: U256, ppb: u64) -> bool {
    if a.is_zero() {
        return !b.is_zero();
    }
    let diff = if a > b { a - b } else { b - a };
    diff.checked_mul(U256::from(PPB)).is_none_or(|scaled| scaled / a > U256::from(ppb))
}

/// Converts a wei-denominated price to USD using the native token's USD price.
pub(crate) fn to_usd(price: U256, native_usd_price: U256) -> U256 {
    price.saturating_mul(native_usd_price) / U256::from(WEI_PER_UNIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[3, 1, 2], 2)]
    #[case(&[4, 1, 3, 2], 3)]
    #[case(&[9], 9)]
    fn test_sorted_middle(#[case] prices: &[u64], #[case] expected: u64) {
        let prices: Vec<_> = prices.iter().copied().map(U256::from).collect();
        assert_eq!(sorted_middle(&prices).unwrap(), U256::from(expected));
    }

    #[test]
    fn test_sorted_middle_empty() {
        assert_eq!(sorted_middle(&[]), Err(GasPriceError::Empty));
    }

    #[rstest]
    #[case(0, 0, 0, false)]
    #[case(0, 1, 1_000_000_000, true)]
    #[case(100, 110, 100_000_000, false)]
    #[case(100, 111, 100_000_000, true)]
    #[case(100, 89, 100_000_000, true)]
    fn test_deviates(#[case] a: u64, #[case] b: u64, #[case] ppb: u64, #[case] expected: bool) {
        assert_eq!(deviates(U256::from(a), U256::from(b), ppb), expected);
    }

    #[test]
    fn test_to_usd() {
        // 20 gwei at $2000 per native unit.
        let price = U256::from(20_000_000_000u64);
        let native = U256::from(2000u64) * U256::from(WEI_PER_UNIT);
        assert_eq!(to_usd(price, native), U256::from(40_000_000_000_000u64));
    }
}
