//! ABI shared by every supported contract version.

#![allow(missing_docs, unreachable_pub)]

use alloy_sol_types::sol;

sol! {
    interface ITypeAndVersion {
        function typeAndVersion() external pure returns (string memory);
    }

    interface IERC20Metadata {
        function decimals() external view returns (uint8);
    }

    interface IRouter {
        function getWrappedNative() external view returns (address);
    }

    interface IOffRampTokens {
        function getSupportedTokens() external view returns (address[] memory);
        function getDestinationTokens() external view returns (address[] memory);
        function getPoolByDestToken(address destToken) external view returns (address);
        function getDestinationToken(address sourceToken) external view returns (address);
    }

    interface IFeeTokens {
        function getFeeTokens() external view returns (address[] memory);
    }

    #[derive(Debug)]
    event ExecutionStateChanged(
        uint64 indexed sequenceNumber,
        bytes32 indexed messageId,
        uint8 state,
        bytes returnData
    );

    #[derive(Debug)]
    event PoolAdded(address token, address pool);

    #[derive(Debug)]
    event PoolRemoved(address token, address pool);

    #[derive(Debug)]
    event UsdPerTokenUpdated(address indexed token, uint256 value, uint256 timestamp);

    #[derive(Debug)]
    event UsdPerUnitGasUpdated(uint64 indexed destChain, uint256 value, uint256 timestamp);

    #[derive(Debug)]
    event FeeTokenAdded(address indexed feeToken);

    #[derive(Debug)]
    event FeeTokenRemoved(address indexed feeToken);

    #[derive(Debug)]
    event MessageSent(bytes message);
}
