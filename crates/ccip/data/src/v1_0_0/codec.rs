//! Conversions between the abstract model and the 1.0.0 ABI layouts.

use super::bindings::{self as abi, EVM2EVMMessage, EVMTokenAmount};
use alloy_primitives::{B256, Bytes, U256};
use alloy_sol_types::SolValue;
use ccip_types::{
    CodecError, CommitReport, ExecutionReport, GasPriceUpdate, Interval, Message, ReaderError,
    TokenAmount, TokenPrice,
};

fn to_u128(value: U256, field: &str) -> Result<u128, CodecError> {
    u128::try_from(value).map_err(|_| {
        CodecError::AssumptionViolation(format!("{field} {value} does not fit in uint128"))
    })
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
        source_token_data: Vec::new(),
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
        messageId: message.message_id,
    })
}

/// Builds a [`CommitReport`] from an on-chain report.
///
/// A zero destination chain selector encodes "no gas price update".
pub(crate) fn commit_report_from_abi(report: abi::CommitReport) -> CommitReport {
    let updates = report.priceUpdates;
    let gas_prices = if updates.destChainSelector == 0 {
        Vec::new()
    } else {
        vec![GasPriceUpdate {
            dest_chain_selector: updates.destChainSelector,
            value: U256::from(updates.usdPerUnitGas),
        }]
    };

    CommitReport {
        token_prices: updates
            .tokenPriceUpdates
            .into_iter()
            .map(|update| TokenPrice {
                token: update.sourceToken,
                value: U256::from(update.usdPerToken),
            })
            .collect(),
        gas_prices,
        interval: Interval::new(report.interval.min, report.interval.max),
        merkle_root: report.merkleRoot,
    }
}

pub(crate) fn encode_commit_report(report: &CommitReport) -> Result<Bytes, ReaderError> {
    let (dest_chain_selector, usd_per_unit_gas) = match report.gas_prices.as_slice() {
        [] => (0, 0),
        [update] => {
            if update.dest_chain_selector == 0 {
                return Err(CodecError::AssumptionViolation(
                    "gas price update for chain selector 0".into(),
                )
                .into());
            }
            (update.dest_chain_selector, to_u128(update.value, "usd per unit gas")?)
        }
        updates => return Err(CodecError::TooManyGasPriceUpdates(updates.len()).into()),
    };

    let token_price_updates = report
        .token_prices
        .iter()
        .map(|price| {
            Ok(abi::TokenPriceUpdate {
                sourceToken: price.token,
                usdPerToken: to_u128(price.value, "usd per token")?,
            })
        })
        .collect::<Result<_, CodecError>>()?;

    let encoded = abi::CommitReport {
        priceUpdates: abi::PriceUpdates {
            tokenPriceUpdates: token_price_updates,
            destChainSelector: dest_chain_selector,
            usdPerUnitGas: usd_per_unit_gas,
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

/// Decodes an execution report.
///
/// Decoded messages carry a zero hash and destination selector, the layout
/// holds neither.
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

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, address};
    use ccip_types::UnknownAddress;

    fn report(gas_prices: Vec<GasPriceUpdate>) -> CommitReport {
        CommitReport {
            token_prices: vec![TokenPrice {
                token: address!("0x000000000000000000000000000000000000d001"),
                value: U256::from(8_000_000_000_000_000_000u128),
            }],
            gas_prices,
            interval: Interval::new(1, 10),
            merkle_root: B256::repeat_byte(0xab),
        }
    }

    fn message(seq: u64) -> Message {
        Message {
            source_chain_selector: 1,
            sequence_number: seq,
            gas_limit: U256::from(100_000),
            nonce: seq,
            sender: Address::repeat_byte(0x11).into(),
            receiver: Address::repeat_byte(0x22).into(),
            fee_token: Address::repeat_byte(0x33).into(),
            fee_token_amount: U256::from(5),
            data: Bytes::from_static(b"hello"),
            token_amounts: vec![TokenAmount {
                token: Address::repeat_byte(0x44).into(),
                amount: U256::from(12),
            }],
            message_id: B256::repeat_byte(seq as u8),
            ..Default::default()
        }
    }

    #[test]
    fn test_commit_report_round_trip() {
        for gas_prices in [
            vec![],
            vec![GasPriceUpdate { dest_chain_selector: 4, value: U256::from(2_000_000_000u64) }],
        ] {
            let report = report(gas_prices);
            let encoded = encode_commit_report(&report).unwrap();
            assert_eq!(decode_commit_report(&encoded).unwrap(), report);
        }
    }

    #[test]
    fn test_commit_report_rejects_second_gas_price() {
        let report = report(vec![
            GasPriceUpdate { dest_chain_selector: 4, value: U256::from(1) },
            GasPriceUpdate { dest_chain_selector: 5, value: U256::from(2) },
        ]);
        let err = encode_commit_report(&report).unwrap_err();
        assert!(matches!(err, ReaderError::Codec(CodecError::TooManyGasPriceUpdates(2))));
    }

    #[test]
    fn test_commit_report_rejects_zero_selector_and_overflow() {
        let zero = report(vec![GasPriceUpdate { dest_chain_selector: 0, value: U256::from(1) }]);
        assert!(encode_commit_report(&zero).is_err());

        let wide = report(vec![GasPriceUpdate { dest_chain_selector: 4, value: U256::MAX }]);
        assert!(matches!(
            encode_commit_report(&wide).unwrap_err(),
            ReaderError::Codec(CodecError::AssumptionViolation(_))
        ));
    }

    #[test]
    fn test_execution_report_round_trip() {
        let report = ExecutionReport {
            messages: vec![message(7), message(8)],
            offchain_token_data: vec![vec![Bytes::from_static(b"attestation")], vec![]],
            proofs: vec![B256::repeat_byte(0x01), B256::repeat_byte(0x02)],
            proof_flag_bits: U256::from(3),
        };
        let encoded = encode_execution_report(&report).unwrap();
        assert_eq!(decode_execution_report(&encoded).unwrap(), report);
    }

    #[test]
    fn test_execution_report_requires_messages() {
        let encoded = encode_execution_report(&ExecutionReport::default()).unwrap();
        let err = decode_execution_report(&encoded).unwrap_err();
        assert!(matches!(err, ReaderError::Codec(CodecError::AssumptionViolation(_))));
    }

    #[test]
    fn test_execution_report_rejects_non_evm_sender() {
        let mut message = message(1);
        message.sender = UnknownAddress::new(vec![0u8; 32].into());
        let report = ExecutionReport { messages: vec![message], ..Default::default() };
        let err = encode_execution_report(&report).unwrap_err();
        assert!(matches!(err, ReaderError::Codec(CodecError::InvalidAddress(_))));
    }
}
