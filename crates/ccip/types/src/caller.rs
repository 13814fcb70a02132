//! The contract call and fee estimation collaborators.

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use derive_more::Constructor;
use std::fmt::Debug;
use thiserror::Error;

/// A read-only call against a contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Constructor)]
pub struct EvmCall {
    /// The called contract.
    pub to: Address,
    /// ABI-encoded calldata.
    pub input: Bytes,
}

/// An error returned by a [`ContractCaller`] or [`GasFeeEstimator`].
#[derive(Debug, Error)]
pub enum CallError {
    /// The node could not be reached or rejected the request.
    #[error("transport error: {0}")]
    Transport(String),
    /// The call reverted.
    #[error("call reverted: {0}")]
    Reverted(Bytes),
    /// The return data did not match the expected ABI.
    #[error("failed to decode return data: {0}")]
    Decode(#[from] alloy_sol_types::Error),
}

/// Point-in-time and batched contract reads.
#[async_trait]
pub trait ContractCaller: Debug + Send + Sync {
    /// Executes a single call and returns the raw return data.
    async fn call(&self, call: EvmCall) -> Result<Bytes, CallError>;

    /// Executes `calls` as one logical request.
    ///
    /// The outer error reports a failure of the batch as a whole. Otherwise one
    /// result is returned per call, in input order.
    async fn batch_call(
        &self,
        calls: Vec<EvmCall>,
    ) -> Result<Vec<Result<Bytes, CallError>>, CallError>;
}

/// Live gas fee source for the destination chain.
#[async_trait]
pub trait GasFeeEstimator: Debug + Send + Sync {
    /// Returns the current execution gas price in wei, capped by `max_gas_price`.
    async fn get_fee(&self, max_gas_price: U256) -> Result<U256, CallError>;

    /// Returns the current data availability gas price in wei, if the chain has one.
    async fn da_gas_price(&self) -> Result<Option<U256>, CallError> {
        Ok(None)
    }
}
