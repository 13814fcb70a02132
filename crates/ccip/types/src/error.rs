//! Error types shared by every reader.

use crate::{AddressError, CallError, GasPriceError, LogPollerError};
use thiserror::Error;

/// An error decoding a dynamic configuration payload.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is absent or zero.
    #[error("must set {0}")]
    MustSet(&'static str),
    /// The off-chain JSON document is malformed.
    #[error("invalid offchain config: {0}")]
    InvalidJson(String),
    /// The on-chain ABI payload is malformed.
    #[error("invalid onchain config: {0}")]
    InvalidAbi(#[from] alloy_sol_types::Error),
}

/// An error encoding or decoding a versioned binary layout.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The version accepts at most one gas price update per report.
    #[error("too many gas price updates: got {0}, at most 1 allowed")]
    TooManyGasPriceUpdates(usize),
    /// The decoded value breaks an invariant the chain is expected to uphold.
    #[error("assumption violation: {0}")]
    AssumptionViolation(String),
    /// An address does not have this chain family's shape.
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),
    /// The bytes do not match the ABI layout.
    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
}

/// The error returned by every reader operation.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The indexed event store failed.
    #[error(transparent)]
    LogPoller(#[from] LogPollerError),
    /// A contract call failed.
    #[error(transparent)]
    Call(#[from] CallError),
    /// A config payload is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A binary layout could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The off-ramp's token configuration is inconsistent.
    #[error("offramp misconfigured: {0}")]
    OffRampMisconfigured(String),
    /// The feature is not available in this contract version.
    #[error("{0} is not supported by this version")]
    Unsupported(&'static str),
    /// The contract type or version has no reader implementation.
    #[error("unsupported contract version: {0}")]
    UnsupportedVersion(String),
    /// The requested on-chain data does not exist or is not indexed yet.
    #[error("not found: {0}")]
    NotFound(String),
    /// Configuration the call depends on has not been provided yet.
    #[error("reader is not configured")]
    NotConfigured,
    /// A gas price could not be read, encoded or aggregated.
    #[error(transparent)]
    GasPrice(#[from] GasPriceError),
}

impl ReaderError {
    /// Returns `true` if retrying the call cannot succeed.
    ///
    /// Decode failures, bad configs and misconfigured contracts are fatal.
    /// Collaborator failures and conditions that may clear on their own are not.
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::LogPoller(_) |
                Self::Call(_) |
                Self::NotFound(_) |
                Self::NotConfigured |
                Self::GasPrice(_)
        )
    }
}

impl From<AddressError> for ReaderError {
    fn from(err: AddressError) -> Self {
        Self::Codec(CodecError::InvalidAddress(err))
    }
}

impl From<alloy_sol_types::Error> for ReaderError {
    fn from(err: alloy_sol_types::Error) -> Self {
        Self::Codec(CodecError::Abi(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_set_names_field() {
        let err = ConfigError::MustSet("SourceFinalityDepth");
        assert_eq!(err.to_string(), "must set SourceFinalityDepth");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ReaderError::OffRampMisconfigured("dup".into()).is_fatal());
        assert!(ReaderError::Unsupported("usdc").is_fatal());
        assert!(ReaderError::from(CodecError::TooManyGasPriceUpdates(2)).is_fatal());
        assert!(!ReaderError::Call(CallError::Transport("down".into())).is_fatal());
        assert!(!ReaderError::LogPoller(LogPollerError::Backend("db".into())).is_fatal());
        assert!(!ReaderError::NotFound("usdc message".into()).is_fatal());
    }
}
