//! Typed events and the transaction metadata attached to them.

use alloy_primitives::{Address, B256, U256};
use core::fmt;

/// Metadata of the log a typed event was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TxMeta {
    /// Unix timestamp, in seconds, of the block containing the log.
    pub block_timestamp: u64,
    /// Number of the block containing the log.
    pub block_number: u64,
    /// Hash of the transaction that emitted the log.
    pub tx_hash: B256,
    /// Index of the log within its block.
    pub log_index: u64,
    /// Whether the block was finalized when the event was read.
    ///
    /// Computed against a snapshot of the latest finalized block taken at query
    /// time and never re-evaluated.
    pub finalized: bool,
}

/// A typed event plus the metadata of the log it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event<T> {
    /// The decoded event payload.
    pub data: T,
    /// Metadata of the originating log.
    pub meta: TxMeta,
}

impl<T> Event<T> {
    /// Creates a new [`Event`].
    pub const fn new(data: T, meta: TxMeta) -> Self {
        Self { data, meta }
    }
}

/// The execution state of a message on the destination chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageExecutionState {
    /// The message has not been executed.
    #[default]
    Untouched = 0,
    /// Execution has started but not finished.
    InProgress = 1,
    /// The message executed successfully.
    Success = 2,
    /// Execution was attempted and failed.
    Failure = 3,
}

impl TryFrom<u8> for MessageExecutionState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Untouched),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Success),
            3 => Ok(Self::Failure),
            other => Err(other),
        }
    }
}

impl fmt::Display for MessageExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untouched => write!(f, "untouched"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A change in a message's execution state, emitted by the off-ramp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExecutionStateChanged {
    /// The sequence number of the message.
    pub sequence_number: u64,
    /// The new state.
    pub state: MessageExecutionState,
}

/// An [`ExecutionStateChanged`] with its log metadata.
pub type ExecutionStateChangedWithMeta = Event<ExecutionStateChanged>;

/// A token price published by the price registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TokenPriceUpdate {
    /// The priced token.
    pub token: Address,
    /// USD per 1e18 of the token's smallest unit.
    pub value: U256,
    /// Unix timestamp, in seconds, at which the price was set.
    pub timestamp: u64,
}

/// A [`TokenPriceUpdate`] with its log metadata.
pub type TokenPriceUpdateWithMeta = Event<TokenPriceUpdate>;

/// A gas price published by the price registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GasPriceUpdateWithTimestamp {
    /// Selector of the chain whose gas is priced.
    pub dest_chain_selector: u64,
    /// USD per unit of gas, possibly packed.
    pub value: U256,
    /// Unix timestamp, in seconds, at which the price was set.
    pub timestamp: u64,
}

/// A [`GasPriceUpdateWithTimestamp`] with its log metadata.
pub type GasPriceUpdateWithMeta = Event<GasPriceUpdateWithTimestamp>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_state_from_code() {
        assert_eq!(MessageExecutionState::try_from(0), Ok(MessageExecutionState::Untouched));
        assert_eq!(MessageExecutionState::try_from(2), Ok(MessageExecutionState::Success));
        assert_eq!(MessageExecutionState::try_from(3), Ok(MessageExecutionState::Failure));
        assert_eq!(MessageExecutionState::try_from(4), Err(4));
    }
}
