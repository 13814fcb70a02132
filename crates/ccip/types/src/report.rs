//! Commit and execution reports.

use crate::Message;
use alloy_primitives::{Address, B256, Bytes, U256};

/// A closed interval of sequence numbers, `[min, max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// The first sequence number in the interval.
    pub min: u64,
    /// The last sequence number in the interval.
    pub max: u64,
}

impl Interval {
    /// Creates a new [`Interval`].
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `seq_num` lies inside the interval.
    pub const fn contains(&self, seq_num: u64) -> bool {
        self.min <= seq_num && seq_num <= self.max
    }
}

/// A USD-scaled token price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TokenPrice {
    /// The token the price applies to.
    pub token: Address,
    /// USD per 1e18 of the token's smallest unit.
    pub value: U256,
}

/// A gas price update for one destination chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GasPriceUpdate {
    /// Selector of the chain whose gas is priced.
    pub dest_chain_selector: u64,
    /// USD per unit of gas, possibly packed with a data-availability component.
    pub value: U256,
}

/// A batch attestation over a contiguous sequence-number interval.
///
/// Created off-chain by a committer and persisted on-chain as a `ReportAccepted`
/// log. Whether its merkle root is blessed is tracked separately on-chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CommitReport {
    /// Token price updates.
    pub token_prices: Vec<TokenPrice>,
    /// Gas price updates. Some versions accept at most one entry.
    pub gas_prices: Vec<GasPriceUpdate>,
    /// The committed sequence numbers.
    pub interval: Interval,
    /// Merkle root over the messages in `interval`.
    pub merkle_root: B256,
}

/// The data needed to deliver a batch of committed messages on the destination chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExecutionReport {
    /// The messages to execute.
    pub messages: Vec<Message>,
    /// Off-chain token data, one list per message.
    pub offchain_token_data: Vec<Vec<Bytes>>,
    /// Merkle multi-proof hashes.
    pub proofs: Vec<B256>,
    /// Bitfield selecting, per step, whether the next input is a proof or a leaf.
    pub proof_flag_bits: U256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Interval::new(1, 5), 1, true)]
    #[case(Interval::new(1, 5), 5, true)]
    #[case(Interval::new(1, 5), 6, false)]
    #[case(Interval::new(3, 3), 2, false)]
    fn test_interval_contains(
        #[case] interval: Interval,
        #[case] seq: u64,
        #[case] expected: bool,
    ) {
        assert_eq!(interval.contains(seq), expected);
    }
}
