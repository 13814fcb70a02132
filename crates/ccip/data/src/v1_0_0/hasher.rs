//! Merkle leaf hashing for 1.0.0 on-ramps.

use super::{
    bindings::{CCIPSendRequested, EVM2EVMMessage},
    codec::message_to_abi,
};
use crate::{LEAF_DOMAIN_SEPARATOR, metadata_hash};
use alloy_primitives::{Address, B256, keccak256};
use alloy_sol_types::{SolEvent, SolValue};
use ccip_types::{LeafHasher, Log, Message, ReaderError};

/// Hashes the messages of one lane into merkle leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHasher {
    metadata_hash: B256,
}

impl MessageHasher {
    /// Creates a hasher for the lane from `source_chain_selector` to
    /// `dest_chain_selector` served by `on_ramp`.
    pub fn new(source_chain_selector: u64, dest_chain_selector: u64, on_ramp: Address) -> Self {
        Self { metadata_hash: metadata_hash(source_chain_selector, dest_chain_selector, on_ramp) }
    }

    /// Returns the lane's metadata hash.
    pub const fn metadata_hash(&self) -> B256 {
        self.metadata_hash
    }

    /// Hashes an on-chain message.
    pub fn hash_evm_message(&self, message: &EVM2EVMMessage) -> B256 {
        let token_amounts_hash = keccak256(message.tokenAmounts.abi_encode());
        let encoded = (
            LEAF_DOMAIN_SEPARATOR,
            self.metadata_hash,
            message.sequenceNumber,
            message.nonce,
            message.sender,
            message.receiver,
            keccak256(&message.data),
            token_amounts_hash,
            message.gasLimit,
            message.strict,
            message.feeToken,
            message.feeTokenAmount,
        )
            .abi_encode_params();
        keccak256(encoded)
    }

    /// Hashes an abstract message. Fails if any address is not an EVM address.
    pub fn hash_message(&self, message: &Message) -> Result<B256, ReaderError> {
        Ok(self.hash_evm_message(&message_to_abi(message)?))
    }
}

impl LeafHasher for MessageHasher {
    fn hash_leaf(&self, log: &Log) -> Result<B256, ReaderError> {
        let event = CCIPSendRequested::decode_log_data(&log.log_data())?;
        Ok(self.hash_evm_message(&event.message))
    }
}
