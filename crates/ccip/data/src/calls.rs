//! Typed wrappers over the [`ContractCaller`] collaborator.

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use ccip_types::{CallError, ContractCaller, EvmCall};

/// Encodes `call` for `to`.
pub(crate) fn evm_call<C: SolCall>(to: Address, call: &C) -> EvmCall {
    EvmCall::new(to, call.abi_encode().into())
}

/// Executes a single typed call against `to`.
pub(crate) async fn call_contract<C: SolCall>(
    caller: &dyn ContractCaller,
    to: Address,
    call: C,
) -> Result<C::Return, CallError> {
    let output = caller.call(evm_call(to, &call)).await?;
    Ok(C::abi_decode_returns(&output)?)
}

/// Executes typed calls as one batch and decodes every result in order.
///
/// Fails if the batch fails or if any single call fails, so callers never see a
/// partial result.
pub(crate) async fn batch_call_contracts<C: SolCall>(
    caller: &dyn ContractCaller,
    calls: Vec<(Address, C)>,
) -> Result<Vec<C::Return>, CallError> {
    let requests: Vec<_> = calls.iter().map(|(to, call)| evm_call(*to, call)).collect();
    let expected = requests.len();

    #[cfg(feature = "metrics")]
    metrics::histogram!(crate::Metrics::BATCH_CALL_SIZE).record(expected as f64);

    let results = caller.batch_call(requests).await?;
    if results.len() != expected {
        return Err(CallError::Transport(format!(
            "batch returned {} results for {expected} calls",
            results.len()
        )));
    }
    results.into_iter().map(|result| Ok(C::abi_decode_returns(&result?)?)).collect()
}
