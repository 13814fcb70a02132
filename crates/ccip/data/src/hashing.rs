//! Hashing primitives shared by every leaf hasher version.

use alloy_primitives::{Address, B256, FixedBytes, U256, keccak256};

/// Prefix byte that separates leaves from internal nodes in the commit merkle tree.
pub const LEAF_DOMAIN_SEPARATOR: FixedBytes<1> = FixedBytes([0x00]);

/// Domain prefix mixed into every lane's metadata hash.
const METADATA_PREFIX: &[u8] = b"EVM2EVMMessageEvent";

/// Computes the per-lane metadata hash.
///
/// `keccak(keccak("EVM2EVMMessageEvent") || source || dest || on_ramp)`, each
/// value left-padded to 32 bytes.
pub fn metadata_hash(
    source_chain_selector: u64,
    dest_chain_selector: u64,
    on_ramp: Address,
) -> B256 {
    let mut preimage = Vec::with_capacity(128);
    preimage.extend_from_slice(keccak256(METADATA_PREFIX).as_slice());
    preimage.extend_from_slice(&U256::from(source_chain_selector).to_be_bytes::<32>());
    preimage.extend_from_slice(&U256::from(dest_chain_selector).to_be_bytes::<32>());
    preimage.extend_from_slice(on_ramp.into_word().as_slice());
    keccak256(preimage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_metadata_hash_binds_lane() {
        let on_ramp = address!("0x5550000000000000000000000000000000000001");
        let base = metadata_hash(1, 4, on_ramp);
        assert_eq!(base, metadata_hash(1, 4, on_ramp));
        assert_ne!(base, metadata_hash(4, 1, on_ramp));
        assert_ne!(base, metadata_hash(1, 4, Address::ZERO));
    }
}
