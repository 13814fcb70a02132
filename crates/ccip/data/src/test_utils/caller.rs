use super::lock;
use crate::calls::evm_call;
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use ccip_types::{CallError, ContractCaller, EvmCall};
use std::{collections::HashMap, sync::Mutex};

#[derive(Debug, Clone)]
enum Response {
    Return(Bytes),
    Fail(String),
}

/// A [`ContractCaller`] that answers calls from a table of canned responses.
///
/// Calls without a configured response fail with a transport error.
#[derive(Debug, Default)]
pub struct StaticContractCaller {
    responses: Mutex<HashMap<EvmCall, Response>>,
    batches: Mutex<Vec<usize>>,
    calls: Mutex<Vec<EvmCall>>,
}

impl StaticContractCaller {
    /// Answers `call` against `to` with `value`, encoded as the call's return data.
    pub fn on_call<C: SolCall, V: SolValue>(&self, to: Address, call: C, value: V) {
        let output = Bytes::from(value.abi_encode());
        lock(&self.responses).insert(evm_call(to, &call), Response::Return(output));
    }

    /// Makes `call` against `to` fail.
    pub fn fail_call<C: SolCall>(&self, to: Address, call: C) {
        let reason = format!("{} failed", C::SIGNATURE);
        lock(&self.responses).insert(evm_call(to, &call), Response::Fail(reason));
    }

    /// Returns the size of every batch served so far.
    pub fn batch_sizes(&self) -> Vec<usize> {
        lock(&self.batches).clone()
    }

    /// Returns the number of single calls served so far.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn respond(&self, call: &EvmCall) -> Result<Bytes, CallError> {
        match lock(&self.responses).get(call) {
            Some(Response::Return(output)) => Ok(output.clone()),
            Some(Response::Fail(reason)) => Err(CallError::Transport(reason.clone())),
            None => Err(CallError::Transport(format!("no response for call to {}", call.to))),
        }
    }
}

#[async_trait]
impl ContractCaller for StaticContractCaller {
    async fn call(&self, call: EvmCall) -> Result<Bytes, CallError> {
        let result = self.respond(&call);
        lock(&self.calls).push(call);
        result
    }

    async fn batch_call(
        &self,
        calls: Vec<EvmCall>,
    ) -> Result<Vec<Result<Bytes, CallError>>, CallError> {
        lock(&self.batches).push(calls.len());
        Ok(calls.iter().map(|call| self.respond(call)).collect())
    }
}
