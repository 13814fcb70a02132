//! Dynamic config payloads of the 1.2.0 plugins.

use super::bindings::{ICommitStore, IEVM2EVMOffRamp};
use crate::config::{ConfigDocument, non_zero, required};
use alloy_primitives::U256;
use ccip_types::{
    CommitOffchainConfig, CommitOnchainConfig, ConfigError, ExecOffchainConfig, ExecOnchainConfig,
};
use serde::Deserialize;
use std::time::Duration;

/// The commit plugin's off-chain JSON config.
///
/// Gas and token prices have separate heartbeats and deviations. The data
/// availability deviation is optional and only matters on chains that charge
/// for data availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonCommitOffchainConfig {
    #[serde(rename = "SourceFinalityDepth")]
    source_finality_depth: Option<u32>,
    #[serde(rename = "DestFinalityDepth")]
    dest_finality_depth: Option<u32>,
    #[serde(rename = "GasPriceHeartBeat", default, with = "humantime_serde")]
    gas_price_heart_beat: Option<Duration>,
    #[serde(rename = "DAGasPriceDeviationPPB")]
    da_gas_price_deviation_ppb: Option<u32>,
    #[serde(rename = "ExecGasPriceDeviationPPB")]
    exec_gas_price_deviation_ppb: Option<u32>,
    #[serde(rename = "TokenPriceHeartBeat", default, with = "humantime_serde")]
    token_price_heart_beat: Option<Duration>,
    #[serde(rename = "TokenPriceDeviationPPB")]
    token_price_deviation_ppb: Option<u32>,
    #[serde(rename = "MaxGasPrice")]
    max_gas_price: Option<u64>,
    #[serde(rename = "InflightCacheExpiry", default, with = "humantime_serde")]
    inflight_cache_expiry: Option<Duration>,
    #[serde(rename = "PriceReportingDisabled", default)]
    price_reporting_disabled: bool,
}

impl ConfigDocument for JsonCommitOffchainConfig {
    type Config = CommitOffchainConfig;

    fn resolve(self) -> Result<CommitOffchainConfig, ConfigError> {
        Ok(CommitOffchainConfig {
            source_finality_depth: required(self.source_finality_depth, "SourceFinalityDepth")?,
            dest_finality_depth: required(self.dest_finality_depth, "DestFinalityDepth")?,
            gas_price_heartbeat: required(self.gas_price_heart_beat, "GasPriceHeartBeat")?,
            gas_price_deviation_ppb: required(
                self.exec_gas_price_deviation_ppb,
                "ExecGasPriceDeviationPPB",
            )?,
            da_gas_price_deviation_ppb: self.da_gas_price_deviation_ppb.unwrap_or_default(),
            token_price_heartbeat: required(self.token_price_heart_beat, "TokenPriceHeartBeat")?,
            token_price_deviation_ppb: required(
                self.token_price_deviation_ppb,
                "TokenPriceDeviationPPB",
            )?,
            max_gas_price: U256::from(required(self.max_gas_price, "MaxGasPrice")?),
            inflight_cache_expiry: required(self.inflight_cache_expiry, "InflightCacheExpiry")?,
            price_reporting_disabled: self.price_reporting_disabled,
        })
    }
}

/// The exec plugin's off-chain JSON config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonExecOffchainConfig {
    #[serde(rename = "SourceFinalityDepth")]
    source_finality_depth: Option<u32>,
    #[serde(rename = "DestOptimisticConfirmations")]
    dest_optimistic_confirmations: Option<u32>,
    #[serde(rename = "DestFinalityDepth")]
    dest_finality_depth: Option<u32>,
    #[serde(rename = "BatchGasLimit")]
    batch_gas_limit: Option<u32>,
    #[serde(rename = "RelativeBoostPerWaitHour")]
    relative_boost_per_wait_hour: Option<f64>,
    #[serde(rename = "MaxGasPrice")]
    max_gas_price: Option<u64>,
    #[serde(rename = "InflightCacheExpiry", default, with = "humantime_serde")]
    inflight_cache_expiry: Option<Duration>,
    #[serde(rename = "RootSnoozeTime", default, with = "humantime_serde")]
    root_snooze_time: Option<Duration>,
    #[serde(rename = "MessageVisibilityInterval", default, with = "humantime_serde")]
    message_visibility_interval: Option<Duration>,
}

impl ConfigDocument for JsonExecOffchainConfig {
    type Config = ExecOffchainConfig;

    fn resolve(self) -> Result<ExecOffchainConfig, ConfigError> {
        Ok(ExecOffchainConfig {
            source_finality_depth: required(self.source_finality_depth, "SourceFinalityDepth")?,
            dest_optimistic_confirmations: required(
                self.dest_optimistic_confirmations,
                "DestOptimisticConfirmations",
            )?,
            dest_finality_depth: required(self.dest_finality_depth, "DestFinalityDepth")?,
            batch_gas_limit: required(self.batch_gas_limit, "BatchGasLimit")?,
            relative_boost_per_wait_hour: required(
                self.relative_boost_per_wait_hour,
                "RelativeBoostPerWaitHour",
            )?,
            max_gas_price: U256::from(required(self.max_gas_price, "MaxGasPrice")?),
            inflight_cache_expiry: required(self.inflight_cache_expiry, "InflightCacheExpiry")?,
            root_snooze_time: required(self.root_snooze_time, "RootSnoozeTime")?,
            message_visibility_interval: self.message_visibility_interval.unwrap_or_default(),
        })
    }
}

impl ConfigDocument for ICommitStore::DynamicConfig {
    type Config = CommitOnchainConfig;

    fn resolve(self) -> Result<CommitOnchainConfig, ConfigError> {
        Ok(CommitOnchainConfig { price_registry: non_zero(self.priceRegistry, "PriceRegistry")? })
    }
}

impl ConfigDocument for IEVM2EVMOffRamp::DynamicConfig {
    type Config = ExecOnchainConfig;

    fn resolve(self) -> Result<ExecOnchainConfig, ConfigError> {
        let threshold = non_zero(
            self.permissionLessExecutionThresholdSeconds,
            "PermissionLessExecutionThresholdSeconds",
        )?;
        Ok(ExecOnchainConfig {
            permissionless_exec_threshold: Duration::from_secs(threshold.into()),
            router: non_zero(self.router, "Router")?,
            price_registry: non_zero(self.priceRegistry, "PriceRegistry")?,
            max_number_of_tokens_per_msg: non_zero(
                self.maxNumberOfTokensPerMsg,
                "MaxNumberOfTokensPerMsg",
            )?,
            max_data_bytes: non_zero(self.maxDataBytes, "MaxDataBytes")?,
            max_pool_release_or_mint_gas: non_zero(
                self.maxPoolReleaseOrMintGas,
                "MaxPoolReleaseOrMintGas",
            )?,
        })
    }
}
