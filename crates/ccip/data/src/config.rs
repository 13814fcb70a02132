//! Fail-closed decoding of dynamic config payloads.
//!
//! Off-chain configs are JSON documents, on-chain configs are ABI tuples. Both
//! are decoded into a version-specific document type and then resolved into the
//! normalised config, rejecting any required field that is absent or zero.

use alloy_sol_types::SolType;
use ccip_types::ConfigError;
use serde::de::DeserializeOwned;

/// A version-specific config payload that resolves into a normalised config.
pub trait ConfigDocument: Sized {
    /// The normalised config.
    type Config;

    /// Validates every required field and builds the normalised config.
    fn resolve(self) -> Result<Self::Config, ConfigError>;
}

/// Decodes an off-chain JSON config document and resolves it.
pub fn decode_offchain_config<D>(data: &[u8]) -> Result<D::Config, ConfigError>
where
    D: ConfigDocument + DeserializeOwned,
{
    let document: D =
        serde_json::from_slice(data).map_err(|err| ConfigError::InvalidJson(err.to_string()))?;
    document.resolve()
}

/// Decodes an ABI-encoded on-chain config tuple and resolves it.
pub fn decode_onchain_config<D>(data: &[u8]) -> Result<D::Config, ConfigError>
where
    D: ConfigDocument + SolType<RustType = D>,
{
    <D as SolType>::abi_decode(data)?.resolve()
}

/// Returns `value` if it is present and non-zero, otherwise names `field` as missing.
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ConfigError>
where
    T: Default + PartialEq,
{
    match value {
        Some(value) if value != T::default() => Ok(value),
        _ => Err(ConfigError::MustSet(field)),
    }
}

/// Returns `value` if it is non-zero, otherwise names `field` as missing.
pub(crate) fn non_zero<T>(value: T, field: &'static str) -> Result<T, ConfigError>
where
    T: Default + PartialEq,
{
    required(Some(value), field)
}
