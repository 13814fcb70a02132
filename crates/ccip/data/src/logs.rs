//! Turning raw logs into typed events.

use crate::bindings;
use alloy_primitives::{B256, U256};
use alloy_sol_types::SolEvent;
use ccip_types::{
    CodecError, Event, ExecutionStateChanged, Log, LogPoller, MessageExecutionState, ReaderError,
};

/// Left-pads `value` into a topic or data word.
pub(crate) fn word(value: u64) -> B256 {
    B256::from(U256::from(value))
}

/// Parses `logs` into typed events.
///
/// Each event is marked finalized against `latest_finalized`, a snapshot the
/// caller takes once per query. Any log that fails to parse fails the whole call.
pub(crate) fn parse_logs<T>(
    logs: &[Log],
    latest_finalized: u64,
    mut parse: impl FnMut(&Log) -> Result<T, ReaderError>,
) -> Result<Vec<Event<T>>, ReaderError> {
    logs.iter()
        .map(|log| {
            let data = parse(log)?;
            Ok(Event::new(data, log.meta(log.block_number <= latest_finalized)))
        })
        .collect()
}

/// Parses an off-ramp `ExecutionStateChanged` log. The layout is shared by every version.
pub(crate) fn parse_execution_state_changed(
    log: &Log,
) -> Result<ExecutionStateChanged, ReaderError> {
    let event = bindings::ExecutionStateChanged::decode_log_data(&log.log_data())?;
    let state = MessageExecutionState::try_from(event.state).map_err(|code| {
        CodecError::AssumptionViolation(format!("unknown execution state {code}"))
    })?;
    Ok(ExecutionStateChanged { sequence_number: event.sequenceNumber, state })
}

/// Returns the latest finalized block number known to `poller`.
pub(crate) async fn latest_finalized(poller: &dyn LogPoller) -> Result<u64, ReaderError> {
    Ok(poller.latest_block().await?.finalized_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use alloy_sol_types::SolValue;

    fn log_at(block_number: u64) -> Log {
        Log { block_number, ..Default::default() }
    }

    #[test]
    fn test_finality_is_computed_against_snapshot() {
        let logs = vec![log_at(9), log_at(10), log_at(11)];
        let events = parse_logs(&logs, 10, |log| Ok(log.block_number)).unwrap();
        let finalized: Vec<_> = events.iter().map(|event| event.meta.finalized).collect();
        assert_eq!(finalized, vec![true, true, false]);
        assert_eq!(events[2].data, 11);
    }

    #[test]
    fn test_word_is_big_endian() {
        assert_eq!(word(1).as_slice()[31], 1);
        assert!(word(1) < word(256));
    }

    #[test]
    fn test_parse_failure_fails_the_batch() {
        let logs = vec![log_at(1), log_at(2)];
        let result = parse_logs(&logs, 10, |log| {
            if log.block_number == 2 {
                return Err(CodecError::AssumptionViolation("bad log".into()).into());
            }
            Ok(())
        });
        assert!(result.is_err());
    }

    fn state_changed_log(seq: u64, state: u8) -> Log {
        Log {
            topics: vec![
                bindings::ExecutionStateChanged::SIGNATURE_HASH,
                word(seq),
                B256::repeat_byte(0x01),
            ],
            data: (U256::from(state), Bytes::new()).abi_encode_params().into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_execution_state_changed() {
        let parsed = parse_execution_state_changed(&state_changed_log(12, 2)).unwrap();
        assert_eq!(
            parsed,
            ExecutionStateChanged { sequence_number: 12, state: MessageExecutionState::Success }
        );

        let err = parse_execution_state_changed(&state_changed_log(12, 9)).unwrap_err();
        assert!(matches!(err, ReaderError::Codec(CodecError::AssumptionViolation(_))));
    }
}
