//! Static and dynamic contract configuration.
//!
//! Static configs are fixed at deployment. Dynamic configs are decoded from an
//! on-chain/off-chain payload pair and swapped in as one [`ConfigSnapshot`].

use crate::GasPriceEstimator;
use alloy_primitives::{Address, U256};
use std::{collections::HashMap, sync::Arc, time::Duration};

/// The immutable configuration of a commit store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStoreStaticConfig {
    /// Selector of the chain the commit store lives on.
    pub chain_selector: u64,
    /// Selector of the source chain of the lane.
    pub source_chain_selector: u64,
    /// The on-ramp on the source chain.
    pub on_ramp: Address,
    /// The risk management proxy.
    pub arm_proxy: Address,
}

/// The immutable configuration of an off-ramp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffRampStaticConfig {
    /// The commit store the off-ramp verifies against.
    pub commit_store: Address,
    /// Selector of the chain the off-ramp lives on.
    pub chain_selector: u64,
    /// Selector of the source chain of the lane.
    pub source_chain_selector: u64,
    /// The on-ramp on the source chain.
    pub on_ramp: Address,
    /// The off-ramp this one replaced, if any.
    pub prev_off_ramp: Address,
    /// The risk management proxy.
    pub arm_proxy: Address,
}

/// The immutable configuration of an on-ramp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnRampStaticConfig {
    /// The LINK token on the source chain.
    pub link_token: Address,
    /// Selector of the chain the on-ramp lives on.
    pub chain_selector: u64,
    /// Selector of the destination chain of the lane.
    pub dest_chain_selector: u64,
    /// Gas limit applied when a message does not carry one.
    pub default_tx_gas_limit: u64,
    /// Upper bound on node operator fees, in juels.
    pub max_nop_fees_juels: U256,
    /// The on-ramp this one replaced, if any.
    pub prev_on_ramp: Address,
    /// The risk management proxy.
    pub arm_proxy: Address,
}

/// The mutable configuration of an on-ramp, normalised across versions.
///
/// Fields a version does not carry are left at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnRampDynamicConfig {
    /// The router that forwards sends to the on-ramp.
    pub router: Address,
    /// Maximum number of token transfers per message.
    pub max_number_of_tokens_per_msg: u16,
    /// Fixed destination gas overhead per message.
    pub dest_gas_overhead: u32,
    /// Destination gas charged per payload byte.
    pub dest_gas_per_payload_byte: u16,
    /// Fixed data availability overhead gas.
    pub dest_data_availability_overhead_gas: u32,
    /// Data availability gas charged per byte.
    pub dest_gas_per_data_availability_byte: u16,
    /// Data availability multiplier in basis points.
    pub dest_data_availability_multiplier_bps: u16,
    /// The price registry used for fee computation.
    pub price_registry: Address,
    /// Maximum payload size in bytes.
    pub max_data_bytes: u32,
    /// Maximum gas limit a message may request.
    pub max_per_msg_gas_limit: u64,
}

/// A snapshot of the off-ramp's token bucket rate limiter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenBucketRateLimit {
    /// Tokens currently available.
    pub tokens: u128,
    /// Unix timestamp, in seconds, of the last refill.
    pub last_updated: u32,
    /// Whether rate limiting is enforced.
    pub is_enabled: bool,
    /// Bucket capacity.
    pub capacity: u128,
    /// Refill rate per second.
    pub rate: u128,
}

/// The token configuration of an off-ramp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffRampTokens {
    /// Tokens deliverable on the destination chain.
    pub destination_tokens: Vec<Address>,
    /// Tokens accepted on the source chain.
    pub source_tokens: Vec<Address>,
    /// Pool for each destination token.
    pub destination_pool: HashMap<Address, Address>,
}

/// The off-chain configuration of the commit plugin, normalised across versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOffchainConfig {
    /// Confirmations after which source blocks are final.
    pub source_finality_depth: u32,
    /// Confirmations after which destination blocks are final.
    pub dest_finality_depth: u32,
    /// Gas price deviation, in parts per billion, that forces a new update.
    pub gas_price_deviation_ppb: u32,
    /// Data availability gas price deviation, in parts per billion.
    pub da_gas_price_deviation_ppb: u32,
    /// Maximum age of a published gas price.
    pub gas_price_heartbeat: Duration,
    /// Token price deviation, in parts per billion, that forces a new update.
    pub token_price_deviation_ppb: u32,
    /// Maximum age of a published token price.
    pub token_price_heartbeat: Duration,
    /// Execution gas price ceiling in wei.
    pub max_gas_price: U256,
    /// How long in-flight reports are remembered.
    pub inflight_cache_expiry: Duration,
    /// Whether this lane reports prices at all.
    pub price_reporting_disabled: bool,
}

/// The on-chain dynamic configuration of a commit store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOnchainConfig {
    /// The price registry the commit store writes prices to.
    pub price_registry: Address,
}

/// The off-chain configuration of the exec plugin, normalised across versions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExecOffchainConfig {
    /// Confirmations after which source blocks are final.
    pub source_finality_depth: u32,
    /// Confirmations after which destination blocks are final.
    pub dest_finality_depth: u32,
    /// Confirmations before a destination transaction is assumed to land.
    pub dest_optimistic_confirmations: u32,
    /// Gas budget for one execution batch.
    pub batch_gas_limit: u32,
    /// Fee boost applied per hour a message waits.
    pub relative_boost_per_wait_hour: f64,
    /// Execution gas price ceiling in wei.
    pub max_gas_price: U256,
    /// How long in-flight reports are remembered.
    pub inflight_cache_expiry: Duration,
    /// How long an unblessed root is skipped before being retried.
    pub root_snooze_time: Duration,
    /// How far back messages are considered for execution.
    pub message_visibility_interval: Duration,
}

/// The on-chain dynamic configuration of an off-ramp, normalised across versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOnchainConfig {
    /// Delay after which anyone may execute a committed message.
    pub permissionless_exec_threshold: Duration,
    /// The destination router.
    pub router: Address,
    /// The destination price registry.
    pub price_registry: Address,
    /// Maximum number of token transfers per message.
    pub max_number_of_tokens_per_msg: u16,
    /// Maximum payload size in bytes.
    pub max_data_bytes: u32,
    /// Gas allotted to each token pool release or mint.
    pub max_pool_release_or_mint_gas: u32,
}

/// One generation of a reader's dynamic configuration.
///
/// The on-chain config, the off-chain config and the gas price estimator derived
/// from them are always replaced together.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot<On, Off> {
    /// The decoded on-chain config.
    pub onchain: On,
    /// The decoded off-chain config.
    pub offchain: Off,
    /// The estimator built from this generation's config.
    pub gas_price_estimator: Arc<dyn GasPriceEstimator>,
}

impl<On, Off> ConfigSnapshot<On, Off> {
    /// Creates a new [`ConfigSnapshot`].
    pub fn new(
        onchain: On,
        offchain: Off,
        gas_price_estimator: Arc<dyn GasPriceEstimator>,
    ) -> Self {
        Self { onchain, offchain, gas_price_estimator }
    }
}
