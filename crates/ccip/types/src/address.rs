//! Chain-family agnostic addresses.

use alloy_primitives::{Address, Bytes};
use derive_more::{Display, From};

const EVM_ADDRESS_LEN: usize = 20;

/// An address whose shape is not yet known to belong to a particular chain family.
///
/// Message senders, receivers and token identifiers travel through the abstract
/// model as raw bytes. A version-bound reader interprets them with
/// [`UnknownAddress::to_evm`], which fails for any byte string that is not a
/// 20 byte EVM address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownAddress(Bytes);

impl UnknownAddress {
    /// Creates a new [`UnknownAddress`] from raw bytes.
    pub const fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the address.
    pub const fn bytes(&self) -> &Bytes {
        &self.0
    }

    /// Interprets the address as an EVM address.
    pub fn to_evm(&self) -> Result<Address, AddressError> {
        if self.0.len() != EVM_ADDRESS_LEN {
            return Err(AddressError::InvalidLength(self.0.len()));
        }
        Ok(Address::from_slice(&self.0))
    }
}

impl AsRef<[u8]> for UnknownAddress {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<Address> for UnknownAddress {
    fn from(address: Address) -> Self {
        Self(Bytes::copy_from_slice(address.as_slice()))
    }
}

/// An error returned when an [`UnknownAddress`] does not fit a chain family's address shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The byte string has the wrong length for an EVM address.
    #[error("expected a 20 byte address, got {0} bytes")]
    InvalidLength(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_evm_address_round_trip() {
        let evm = address!("0x1110000000000000000000000000000000000001");
        let unknown = UnknownAddress::from(evm);
        assert_eq!(unknown.bytes().len(), 20);
        assert_eq!(unknown.to_evm().unwrap(), evm);
    }

    #[test]
    fn test_rejects_non_evm_shape() {
        let unknown = UnknownAddress::new(Bytes::from_static(&[0xab; 32]));
        assert_eq!(unknown.to_evm(), Err(AddressError::InvalidLength(32)));

        let empty = UnknownAddress::default();
        assert_eq!(empty.to_evm(), Err(AddressError::InvalidLength(0)));
    }
}
