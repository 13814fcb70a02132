//! Dynamic config payloads of the 1.0.0 plugins.

use super::bindings::{ICommitStore, IEVM2EVMOffRamp};
use crate::config::{ConfigDocument, non_zero, required};
use alloy_primitives::U256;
use ccip_types::{
    CommitOffchainConfig, CommitOnchainConfig, ConfigError, ExecOffchainConfig, ExecOnchainConfig,
};
use serde::Deserialize;
use std::time::Duration;

/// The commit plugin's off-chain JSON config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonCommitOffchainConfig {
    #[serde(rename = "SourceFinalityDepth")]
    source_finality_depth: Option<u32>,
    #[serde(rename = "DestFinalityDepth")]
    dest_finality_depth: Option<u32>,
    #[serde(rename = "FeeUpdateHeartBeat", default, with = "humantime_serde")]
    fee_update_heart_beat: Option<Duration>,
    #[serde(rename = "FeeUpdateDeviationPPB")]
    fee_update_deviation_ppb: Option<u32>,
    #[serde(rename = "MaxGasPrice")]
    max_gas_price: Option<u64>,
    #[serde(rename = "InflightCacheExpiry", default, with = "humantime_serde")]
    inflight_cache_expiry: Option<Duration>,
}

impl ConfigDocument for JsonCommitOffchainConfig {
    type Config = CommitOffchainConfig;

    /// Both heartbeats and deviations come from the single fee update pair.
    fn resolve(self) -> Result<CommitOffchainConfig, ConfigError> {
        let heartbeat = required(self.fee_update_heart_beat, "FeeUpdateHeartBeat")?;
        let deviation = required(self.fee_update_deviation_ppb, "FeeUpdateDeviationPPB")?;
        Ok(CommitOffchainConfig {
            source_finality_depth: required(self.source_finality_depth, "SourceFinalityDepth")?,
            dest_finality_depth: required(self.dest_finality_depth, "DestFinalityDepth")?,
            gas_price_deviation_ppb: deviation,
            da_gas_price_deviation_ppb: 0,
            gas_price_heartbeat: heartbeat,
            token_price_deviation_ppb: deviation,
            token_price_heartbeat: heartbeat,
            max_gas_price: U256::from(required(self.max_gas_price, "MaxGasPrice")?),
            inflight_cache_expiry: required(self.inflight_cache_expiry, "InflightCacheExpiry")?,
            price_reporting_disabled: false,
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
            message_visibility_interval: Duration::ZERO,
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
            max_number_of_tokens_per_msg: non_zero(self.maxTokensLength, "MaxTokensLength")?,
            max_data_bytes: non_zero(self.maxDataSize, "MaxDataSize")?,
            max_pool_release_or_mint_gas: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_offchain_config, decode_onchain_config};
    use alloy_primitives::{Address, address};
    use alloy_sol_types::SolValue;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn commit_json() -> Value {
        json!({
            "SourceFinalityDepth": 3,
            "DestFinalityDepth": 4,
            "FeeUpdateHeartBeat": "1h",
            "FeeUpdateDeviationPPB": 5,
            "MaxGasPrice": 200_000_000_000u64,
            "InflightCacheExpiry": "23456s",
        })
    }

    fn exec_json() -> Value {
        json!({
            "SourceFinalityDepth": 3,
            "DestOptimisticConfirmations": 6,
            "DestFinalityDepth": 3,
            "BatchGasLimit": 5_000_000,
            "RelativeBoostPerWaitHour": 0.07,
            "MaxGasPrice": 200_000_000_000u64,
            "InflightCacheExpiry": "64s",
            "RootSnoozeTime": "128m",
        })
    }

    fn without(mut value: Value, field: &str) -> Vec<u8> {
        if let Some(object) = value.as_object_mut() {
            object.remove(field);
        }
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_decode_commit_offchain_config() {
        let config = decode_offchain_config::<JsonCommitOffchainConfig>(
            &serde_json::to_vec(&commit_json()).unwrap(),
        )
        .unwrap();
        assert_eq!(config.gas_price_heartbeat, Duration::from_secs(3600));
        assert_eq!(config.token_price_heartbeat, Duration::from_secs(3600));
        assert_eq!(config.gas_price_deviation_ppb, 5);
        assert_eq!(config.max_gas_price, U256::from(200_000_000_000u64));
        assert_eq!(config.inflight_cache_expiry, Duration::from_secs(23456));
    }

    #[rstest]
    #[case("SourceFinalityDepth")]
    #[case("DestFinalityDepth")]
    #[case("FeeUpdateHeartBeat")]
    #[case("FeeUpdateDeviationPPB")]
    #[case("MaxGasPrice")]
    #[case("InflightCacheExpiry")]
    fn test_commit_offchain_config_requires(#[case] field: &str) {
        let err = decode_offchain_config::<JsonCommitOffchainConfig>(&without(commit_json(), field))
            .unwrap_err();
        assert_eq!(err.to_string(), format!("must set {field}"));
    }

    #[rstest]
    #[case("SourceFinalityDepth")]
    #[case("DestOptimisticConfirmations")]
    #[case("DestFinalityDepth")]
    #[case("BatchGasLimit")]
    #[case("RelativeBoostPerWaitHour")]
    #[case("MaxGasPrice")]
    #[case("InflightCacheExpiry")]
    #[case("RootSnoozeTime")]
    fn test_exec_offchain_config_requires(#[case] field: &str) {
        let err = decode_offchain_config::<JsonExecOffchainConfig>(&without(exec_json(), field))
            .unwrap_err();
        assert_eq!(err.to_string(), format!("must set {field}"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut value = exec_json();
        value["MessageVisibilityInterval"] = json!("8h");
        let err = decode_offchain_config::<JsonExecOffchainConfig>(
            &serde_json::to_vec(&value).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn test_decode_exec_onchain_config() {
        let router = address!("0x0000000000000000000000000000000000000a11");
        let registry = address!("0x0000000000000000000000000000000000000b22");
        let encoded = IEVM2EVMOffRamp::DynamicConfig {
            permissionLessExecutionThresholdSeconds: 3600,
            router,
            priceRegistry: registry,
            maxTokensLength: 5,
            maxDataSize: 30_000,
        }
        .abi_encode();

        let config = decode_onchain_config::<IEVM2EVMOffRamp::DynamicConfig>(&encoded).unwrap();
        assert_eq!(config.permissionless_exec_threshold, Duration::from_secs(3600));
        assert_eq!(config.router, router);
        assert_eq!(config.price_registry, registry);
        assert_eq!(config.max_number_of_tokens_per_msg, 5);
        assert_eq!(config.max_data_bytes, 30_000);
    }

    #[test]
    fn test_onchain_config_rejects_zero_router() {
        let encoded = IEVM2EVMOffRamp::DynamicConfig {
            permissionLessExecutionThresholdSeconds: 3600,
            router: Address::ZERO,
            priceRegistry: Address::repeat_byte(1),
            maxTokensLength: 5,
            maxDataSize: 30_000,
        }
        .abi_encode();
        let err = decode_onchain_config::<IEVM2EVMOffRamp::DynamicConfig>(&encoded).unwrap_err();
        assert_eq!(err.to_string(), "must set Router");
    }

    #[test]
    fn test_commit_onchain_config_requires_price_registry() {
        let encoded = ICommitStore::DynamicConfig { priceRegistry: Address::ZERO }.abi_encode();
        let err = decode_onchain_config::<ICommitStore::DynamicConfig>(&encoded).unwrap_err();
        assert_eq!(err.to_string(), "must set PriceRegistry");
    }
}
