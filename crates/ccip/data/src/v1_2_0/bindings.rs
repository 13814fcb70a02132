//! ABI of the 1.2.0 contracts.

#![allow(missing_docs, unreachable_pub)]

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, Default, PartialEq, Eq)]
    struct EVMTokenAmount {
        address token;
        uint256 amount;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct EVM2EVMMessage {
        uint64 sourceChainSelector;
        address sender;
        address receiver;
        uint64 sequenceNumber;
        uint256 gasLimit;
        bool strict;
        uint64 nonce;
        address feeToken;
        uint256 feeTokenAmount;
        bytes data;
        EVMTokenAmount[] tokenAmounts;
        bytes[] sourceTokenData;
        bytes32 messageId;
    }

    #[derive(Debug)]
    event CCIPSendRequested(EVM2EVMMessage message);

    #[derive(Debug, PartialEq, Eq)]
    struct TokenPriceUpdate {
        address sourceToken;
        uint224 usdPerToken;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct GasPriceUpdate {
        uint64 destChainSelector;
        uint224 usdPerUnitGas;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PriceUpdates {
        TokenPriceUpdate[] tokenPriceUpdates;
        GasPriceUpdate[] gasPriceUpdates;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Interval {
        uint64 min;
        uint64 max;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CommitReport {
        PriceUpdates priceUpdates;
        Interval interval;
        bytes32 merkleRoot;
    }

    #[derive(Debug)]
    event ReportAccepted(CommitReport report);

    #[derive(Debug, PartialEq, Eq)]
    struct ExecutionReport {
        EVM2EVMMessage[] messages;
        bytes[][] offchainTokenData;
        bytes32[] proofs;
        uint256 proofFlagBits;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct TokenBucket {
        uint128 tokens;
        uint32 lastUpdated;
        bool isEnabled;
        uint128 capacity;
        uint128 rate;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct TimestampedPackedUint224 {
        uint224 value;
        uint32 timestamp;
    }

    interface ICommitStore {
        #[derive(Debug, PartialEq, Eq)]
        struct StaticConfig {
            uint64 chainSelector;
            uint64 sourceChainSelector;
            address onRamp;
            address armProxy;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct DynamicConfig {
            address priceRegistry;
        }

        function getStaticConfig() external view returns (StaticConfig memory);
        function getExpectedNextSequenceNumber() external view returns (uint64);
        function getLatestPriceEpochAndRound() external view returns (uint64);
        function isBlessed(bytes32 root) external view returns (bool);
        function isUnpausedAndNotCursed() external view returns (bool);
        function verify(
            bytes32[] calldata hashedLeaves,
            bytes32[] calldata proofs,
            uint256 proofFlagBits
        ) external view returns (uint256 timestamp);
    }

    interface IEVM2EVMOffRamp {
        #[derive(Debug, PartialEq, Eq)]
        struct StaticConfig {
            address commitStore;
            uint64 chainSelector;
            uint64 sourceChainSelector;
            address onRamp;
            address prevOffRamp;
            address armProxy;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct DynamicConfig {
            uint32 permissionLessExecutionThresholdSeconds;
            address router;
            address priceRegistry;
            uint16 maxNumberOfTokensPerMsg;
            uint32 maxDataBytes;
            uint32 maxPoolReleaseOrMintGas;
        }

        function getStaticConfig() external view returns (StaticConfig memory);
        function getExecutionState(uint64 sequenceNumber) external view returns (uint8);
        function getSenderNonce(address sender) external view returns (uint64 nonce);
        function currentRateLimiterState() external view returns (TokenBucket memory);
    }

    interface IEVM2EVMOnRamp {
        #[derive(Debug, PartialEq, Eq)]
        struct StaticConfig {
            address linkToken;
            uint64 chainSelector;
            uint64 destChainSelector;
            uint64 defaultTxGasLimit;
            uint96 maxNopFeesJuels;
            address prevOnRamp;
            address armProxy;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct DynamicConfig {
            address router;
            uint16 maxNumberOfTokensPerMsg;
            uint32 destGasOverhead;
            uint16 destGasPerPayloadByte;
            uint32 destDataAvailabilityOverheadGas;
            uint16 destGasPerDataAvailabilityByte;
            uint16 destDataAvailabilityMultiplierBps;
            address priceRegistry;
            uint32 maxDataBytes;
            uint32 maxPerMsgGasLimit;
        }

        #[derive(Debug)]
        event ConfigSet(StaticConfig staticConfig, DynamicConfig dynamicConfig);

        function getStaticConfig() external view returns (StaticConfig memory);
        function getDynamicConfig() external view returns (DynamicConfig memory);
    }

    interface IPriceRegistry {
        function getTokenPrices(address[] calldata tokens)
            external
            view
            returns (TimestampedPackedUint224[] memory);
    }
}
