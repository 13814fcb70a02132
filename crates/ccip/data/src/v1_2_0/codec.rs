//! Conversions between the abstract model and the 1.2.0 ABI layouts.

use super::bindings::{self as abi, EVM2EVMMessage, EVMTokenAmount};
use alloy_primitives::{B256, Bytes, U256, aliases::U224};
use alloy_sol_types::SolValue;
use ccip_types::{
    CodecError, CommitReport, ExecutionReport, GasPriceUpdate, Interval, Message, ReaderError,
    TokenAmount, TokenPrice,
};

fn to_u224(value: U256, field: &str) -> Result<U224, CodecError> {
    if value.bit_len() > 224 {
        return Err(CodecError::AssumptionViolation(format!(
            "{field} {value} does not fit in uint224"
        )));
    }
    Ok(U224::from_limbs(value.into_limbs()))
}

fn from_u224(value: U224) -> U256 {
    U256::from_limbs(value.into_limbs())
}

/// Builds a [`Message`] from an on-chain message.
pub(crate) fn message_from_abi(
    message: EVM2EVMMessage,
    dest_chain_selector: u64,
    hash: B256,
) -> Message {
    Message {
        source_chain_selector: message.sourceChainSelector,
        dest_chain_selector,
        sequence_number: message.sequenceNumber,
        gas_limit: message.gasLimit,
        nonce: message.nonce,
        message_id: message.messageId,
        sender: message.sender.into(),
        receiver: message.receiver.into(),
        strict: message.strict,
        fee_token: message.feeToken.into(),
        fee_token_amount: message.feeTokenAmount,
        data: message.data,
        token_amounts: message
            .tokenAmounts
            .into_iter()
            .map(|amount| TokenAmount { token: amount.token.into(), amount: amount.amount })
            .collect(),
        source_token_data: message.sourceTokenData,
        hash,
    }
}

/// Builds the on-chain shape of `message`, rejecting non-EVM addresses.
pub(crate) fn message_to_abi(message: &Message) -> Result<EVM2EVMMessage, ReaderError> {
    let token_amounts = message
        .token_amounts
        .iter()
        .map(|amount| Ok(EVMTokenAmount { token: amount.token.to_evm()?, amount: amount.amount }))
        .collect::<Result<_, ReaderError>>()?;

    Ok(EVM2EVMMessage {
        sourceChainSelector: message.source_chain_selector,
        sender: message.sender.to_evm()?,
        receiver: message.receiver.to_evm()?,
        sequenceNumber: message.sequence_number,
        gasLimit: message.gas_limit,
        strict: message.strict,
        nonce: message.nonce,
        feeToken: message.fee_token.to_evm()?,
        feeTokenAmount: message.fee_token_amount,
        data: message.data.clone(),
        tokenAmounts: token_amounts,
        sourceTokenData: message.source_token_data.clone(),
        messageId: message.message_id,
    })
}

/// Builds a [`CommitReport`] from an on-chain report.
pub(crate) fn commit_report_from_abi(report: abi::CommitReport) -> CommitReport {
    let updates = report.priceUpdates;
    CommitReport {
        token_prices: updates
            .tokenPriceUpdates
            .into_iter()
            .map(|update| TokenPrice {
                token: update.sourceToken,
                value: from_u224(update.usdPerToken),
            })
            .collect(),
        gas_prices: updates
            .gasPriceUpdates
            .into_iter()
            .map(|update| GasPriceUpdate {
                dest_chain_selector: update.destChainSelector,
                value: from_u224(update.usdPerUnitGas),
            })
            .collect(),
        interval: Interval::new(report.interval.min, report.interval.max),
        merkle_root: report.merkleRoot,
    }
}

pub(crate) fn encode_commit_report(report: &CommitReport) -> Result<Bytes, ReaderError> {
    let token_price_updates = report
        .token_prices
        .iter()
        .map(|price| {
            Ok(abi::TokenPriceUpdate {
                sourceToken: price.token,
                usdPerToken: to_u224(price.value, "usd per token")?,
            })
        })
        .collect::<Result<_, CodecError>>()?;
    let gas_price_updates = report
        .gas_prices
        .iter()
        .map(|price| {
            Ok(abi::GasPriceUpdate {
                destChainSelector: price.dest_chain_selector,
                usdPerUnitGas: to_u224(price.value, "usd per unit gas")?,
            })
        })
        .collect::<Result<_, CodecError>>()?;

    let encoded = abi::CommitReport {
        priceUpdates: abi::PriceUpdates {
            tokenPriceUpdates: token_price_updates,
            gasPriceUpdates: gas_price_updates,
        },
        interval: abi::Interval { min: report.interval.min, max: report.interval.max },
        merkleRoot: report.merkle_root,
    };
    Ok(encoded.abi_encode().into())
}

pub(crate) fn decode_commit_report(data: &[u8]) -> Result<CommitReport, ReaderError> {
    let report = <abi::CommitReport as SolValue>::abi_decode(data)?;
    Ok(commit_report_from_abi(report))
}

pub(crate) fn encode_execution_report(report: &ExecutionReport) -> Result<Bytes, ReaderError> {
    let messages = report.messages.iter().map(message_to_abi).collect::<Result<_, _>>()?;
    let encoded = abi::ExecutionReport {
        messages,
        offchainTokenData: report.offchain_token_data.clone(),
        proofs: report.proofs.clone(),
        proofFlagBits: report.proof_flag_bits,
    };
    Ok(encoded.abi_encode().into())
}

/// Decodes an execution report. Decoded messages carry a zero hash and
/// destination selector.
pub(crate) fn decode_execution_report(data: &[u8]) -> Result<ExecutionReport, ReaderError> {
    let report = <abi::ExecutionReport as SolValue>::abi_decode(data)?;
    if report.messages.is_empty() {
        let reason = "execution report has no messages".to_string();
        return Err(CodecError::AssumptionViolation(reason).into());
    }

    Ok(ExecutionReport {
        messages: report
            .messages
            .into_iter()
            .map(|message| message_from_abi(message, 0, B256::ZERO))
            .collect(),
        offchain_token_data: report.offchainTokenData,
        proofs: report.proofs,
        proof_flag_bits: report.proofFlagBits,
    })
}
