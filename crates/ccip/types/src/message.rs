//! The abstract cross-chain message.

use crate::{Event, UnknownAddress};
use alloy_primitives::{B256, Bytes, U256};

/// A token transfer carried by a [`Message`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TokenAmount {
    /// The token being transferred.
    pub token: UnknownAddress,
    /// The amount transferred, in the token's smallest unit.
    pub amount: U256,
}

/// A cross-chain send, as emitted by an on-ramp.
///
/// Once read from the chain a message never changes. `hash` is the merkle leaf
/// computed by the lane's [`LeafHasher`](crate::LeafHasher) and is carried as-is
/// from then on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Message {
    /// Selector of the chain the message was sent from.
    pub source_chain_selector: u64,
    /// Selector of the chain the message is sent to.
    pub dest_chain_selector: u64,
    /// Monotonic per-lane sequence number.
    pub sequence_number: u64,
    /// Gas limit the receiver callback may consume on the destination.
    pub gas_limit: U256,
    /// Per-sender nonce.
    pub nonce: u64,
    /// Unique message id assigned by the on-ramp.
    pub message_id: B256,
    /// The sending account.
    pub sender: UnknownAddress,
    /// The receiving account on the destination chain.
    pub receiver: UnknownAddress,
    /// Whether a failed execution blocks later messages from the same sender.
    pub strict: bool,
    /// Token the fee was paid in.
    pub fee_token: UnknownAddress,
    /// Fee amount paid, in `fee_token` units.
    pub fee_token_amount: U256,
    /// Arbitrary payload.
    pub data: Bytes,
    /// Token transfers.
    pub token_amounts: Vec<TokenAmount>,
    /// Opaque per-token data produced by the source pools.
    pub source_token_data: Vec<Bytes>,
    /// The merkle leaf hash.
    pub hash: B256,
}

/// A [`Message`] together with the metadata of the log it was read from.
pub type MessageWithMeta = Event<Message>;
