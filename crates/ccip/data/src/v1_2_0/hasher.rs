//! Merkle leaf hashing for 1.2.0 on-ramps.
//!
//! The fixed-size message fields are hashed into one word of their own, next to
//! separate hashes of the payload, the token amounts and the source token data.

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
        let fixed_size_fields = (
            message.sender,
            message.receiver,
            message.sequenceNumber,
            message.gasLimit,
            message.strict,
            message.nonce,
            message.feeToken,
            message.feeTokenAmount,
        )
            .abi_encode_params();

        let encoded = (
            LEAF_DOMAIN_SEPARATOR,
            self.metadata_hash,
            keccak256(fixed_size_fields),
            keccak256(&message.data),
            keccak256(message.tokenAmounts.abi_encode()),
            keccak256(message.sourceTokenData.abi_encode()),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v1_2_0::{bindings::EVMTokenAmount, codec::message_from_abi};
    use alloy_primitives::{Bytes, U256, address, b256};

    fn message() -> EVM2EVMMessage {
        EVM2EVMMessage {
            sourceChainSelector: 1,
            sender: address!("0x1110000000000000000000000000000000000001"),
            receiver: address!("0x2220000000000000000000000000000000000001"),
            sequenceNumber: 1337,
            gasLimit: U256::from(100),
            strict: false,
            nonce: 1337,
            feeToken: Address::ZERO,
            feeTokenAmount: U256::from(1),
            data: Bytes::new(),
            tokenAmounts: vec![EVMTokenAmount {
                token: address!("0x4440000000000000000000000000000000000001"),
                amount: U256::from(12_345_678_900u64),
            }],
            sourceTokenData: vec![Bytes::from_static(b"source token data")],
            messageId: B256::ZERO,
        }
    }

    fn hasher() -> MessageHasher {
        MessageHasher::new(1, 4, address!("0x5550000000000000000000000000000000000001"))
    }

    #[test]
    fn test_golden_leaf_hash() {
        let hash = hasher().hash_evm_message(&message());
        let expected = b256!("0xc1f759d657316901b19f32863afbf9c0ff024e924fa6838d547686872bf5165b");
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_hash_matches_layout() {
        let message = message();
        let hasher = hasher();
        let fixed = (
            message.sender,
            message.receiver,
            1337u64,
            U256::from(100),
            false,
            1337u64,
            Address::ZERO,
            U256::from(1),
        )
            .abi_encode_params();
        let expected = keccak256(
            (
                LEAF_DOMAIN_SEPARATOR,
                hasher.metadata_hash(),
                keccak256(fixed),
                keccak256(Bytes::new()),
                keccak256(message.tokenAmounts.abi_encode()),
                keccak256(message.sourceTokenData.abi_encode()),
            )
                .abi_encode_params(),
        );
        assert_eq!(hasher.hash_evm_message(&message), expected);
    }

    #[test]
    fn test_hash_covers_leaf_fields_only() {
        let hasher = hasher();
        let base = hasher.hash_evm_message(&message());

        let mut changed = message();
        changed.sourceTokenData = vec![];
        assert_ne!(hasher.hash_evm_message(&changed), base);

        let mut changed = message();
        changed.strict = true;
        assert_ne!(hasher.hash_evm_message(&changed), base);

        let mut changed = message();
        changed.messageId = B256::repeat_byte(1);
        assert_eq!(hasher.hash_evm_message(&changed), base);

        let other_lane = MessageHasher::new(1, 5, Address::repeat_byte(0x55));
        assert_ne!(other_lane.hash_evm_message(&message()), base);
    }

    #[test]
    fn test_hash_leaf_from_log() {
        let log = Log {
            topics: vec![CCIPSendRequested::SIGNATURE_HASH],
            data: (message(),).abi_encode_params().into(),
            ..Default::default()
        };
        assert_eq!(hasher().hash_leaf(&log).unwrap(), hasher().hash_evm_message(&message()));
    }

    #[test]
    fn test_abstract_message_hashes_like_evm_message() {
        let abstract_message = message_from_abi(message(), 4, B256::ZERO);
        assert_eq!(
            hasher().hash_message(&abstract_message).unwrap(),
            hasher().hash_evm_message(&message())
        );
    }
}
