//! Reader construction from a contract's self-reported type and version.
//!
//! Every CCIP contract answers `typeAndVersion()` with a string such as
//! `"CommitStore 1.2.0"`. Development deployments append `-dev` to the version.

use crate::{bindings::ITypeAndVersion, calls::call_contract, v1_0_0, v1_2_0};
use alloy_primitives::Address;
use ccip_types::{
    CommitStoreReader, ContractCaller, GasFeeEstimator, LogPoller, OffRampReader, OnRampReader,
    PriceRegistryReader, ReaderError,
};
use derive_more::Display;
use std::{str::FromStr, sync::Arc};

/// The contracts with a reader implementation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractType {
    /// The destination chain commit store.
    #[display("CommitStore")]
    CommitStore,
    /// The destination chain off-ramp.
    #[display("EVM2EVMOffRamp")]
    OffRamp,
    /// The source chain on-ramp.
    #[display("EVM2EVMOnRamp")]
    OnRamp,
    /// The price registry of either chain.
    #[display("PriceRegistry")]
    PriceRegistry,
}

impl FromStr for ContractType {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CommitStore" => Ok(Self::CommitStore),
            "EVM2EVMOffRamp" => Ok(Self::OffRamp),
            "EVM2EVMOnRamp" => Ok(Self::OnRamp),
            "PriceRegistry" => Ok(Self::PriceRegistry),
            other => Err(ReaderError::UnsupportedVersion(format!("unknown contract type {other}"))),
        }
    }
}

/// The contract versions with a reader implementation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractVersion {
    /// The 1.0.0 contract family.
    #[display("1.0.0")]
    V1_0_0,
    /// The 1.2.0 contract family.
    #[display("1.2.0")]
    V1_2_0,
}

impl FromStr for ContractVersion {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix("-dev").unwrap_or(s) {
            "1.0.0" => Ok(Self::V1_0_0),
            "1.2.0" => Ok(Self::V1_2_0),
            other => Err(ReaderError::UnsupportedVersion(format!("unknown version {other}"))),
        }
    }
}

/// A parsed `typeAndVersion()` answer.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("{contract_type} {version}")]
pub struct TypeAndVersion {
    /// The contract type.
    pub contract_type: ContractType,
    /// The contract version.
    pub version: ContractVersion,
}

impl FromStr for TypeAndVersion {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((contract_type, version)) = s.trim().split_once(' ') else {
            return Err(ReaderError::UnsupportedVersion(format!("malformed type and version {s}")));
        };
        Ok(Self { contract_type: contract_type.parse()?, version: version.trim().parse()? })
    }
}

/// Reads and parses the `typeAndVersion()` of the contract at `address`.
pub async fn type_and_version(
    caller: &dyn ContractCaller,
    address: Address,
) -> Result<TypeAndVersion, ReaderError> {
    let raw = call_contract(caller, address, ITypeAndVersion::typeAndVersionCall {}).await?;
    raw.parse()
}

async fn expect_version(
    caller: &dyn ContractCaller,
    address: Address,
    expected: ContractType,
) -> Result<ContractVersion, ReaderError> {
    let found = type_and_version(caller, address).await?;
    if found.contract_type != expected {
        return Err(ReaderError::UnsupportedVersion(format!(
            "expected {expected} at {address}, found {found}"
        )));
    }
    debug!(target: "factory", %address, %found, "Resolved contract version");
    Ok(found.version)
}

/// Creates the commit store reader matching the contract at `address`.
pub async fn new_commit_store_reader(
    address: Address,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
    fee_estimator: Arc<dyn GasFeeEstimator>,
) -> Result<Arc<dyn CommitStoreReader>, ReaderError> {
    let version = expect_version(caller.as_ref(), address, ContractType::CommitStore).await?;
    let reader: Arc<dyn CommitStoreReader> = match version {
        ContractVersion::V1_0_0 => {
            Arc::new(v1_0_0::CommitStore::new(address, caller, poller, fee_estimator))
        }
        ContractVersion::V1_2_0 => {
            Arc::new(v1_2_0::CommitStore::new(address, caller, poller, fee_estimator))
        }
    };
    Ok(reader)
}

/// Creates the off-ramp reader matching the contract at `address`.
pub async fn new_off_ramp_reader(
    address: Address,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
    fee_estimator: Arc<dyn GasFeeEstimator>,
) -> Result<Arc<dyn OffRampReader>, ReaderError> {
    let version = expect_version(caller.as_ref(), address, ContractType::OffRamp).await?;
    let reader: Arc<dyn OffRampReader> = match version {
        ContractVersion::V1_0_0 => {
            Arc::new(v1_0_0::OffRamp::new(address, caller, poller, fee_estimator))
        }
        ContractVersion::V1_2_0 => {
            Arc::new(v1_2_0::OffRamp::new(address, caller, poller, fee_estimator))
        }
    };
    Ok(reader)
}

/// Creates the on-ramp reader matching the contract at `address`.
///
/// `usdc_transmitter` enables USDC message lookups on 1.2.0 on-ramps. It is
/// ignored for 1.0.0, which has no USDC support.
pub async fn new_on_ramp_reader(
    address: Address,
    source_chain_selector: u64,
    dest_chain_selector: u64,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
    usdc_transmitter: Option<Address>,
) -> Result<Arc<dyn OnRampReader>, ReaderError> {
    let version = expect_version(caller.as_ref(), address, ContractType::OnRamp).await?;
    let reader: Arc<dyn OnRampReader> = match version {
        ContractVersion::V1_0_0 => Arc::new(v1_0_0::OnRamp::new(
            address,
            source_chain_selector,
            dest_chain_selector,
            caller,
            poller,
        )),
        ContractVersion::V1_2_0 => {
            let mut on_ramp = v1_2_0::OnRamp::new(
                address,
                source_chain_selector,
                dest_chain_selector,
                caller,
                poller,
            );
            if let Some(transmitter) = usdc_transmitter {
                on_ramp = on_ramp.with_usdc_transmitter(transmitter);
            }
            Arc::new(on_ramp)
        }
    };
    Ok(reader)
}

/// Creates the price registry reader matching the contract at `address`.
pub async fn new_price_registry_reader(
    address: Address,
    caller: Arc<dyn ContractCaller>,
    poller: Arc<dyn LogPoller>,
) -> Result<Arc<dyn PriceRegistryReader>, ReaderError> {
    let version = expect_version(caller.as_ref(), address, ContractType::PriceRegistry).await?;
    let reader: Arc<dyn PriceRegistryReader> = match version {
        ContractVersion::V1_0_0 => Arc::new(v1_0_0::PriceRegistry::new(address, caller, poller)),
        ContractVersion::V1_2_0 => Arc::new(v1_2_0::PriceRegistry::new(address, caller, poller)),
    };
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{InMemoryLogPoller, StaticContractCaller, StaticFeeEstimator};
    use alloy_primitives::{U256, address};
    use rstest::rstest;

    const CONTRACT: Address = address!("0x9990000000000000000000000000000000000001");

    fn caller_answering(answer: &str) -> Arc<StaticContractCaller> {
        let caller = Arc::new(StaticContractCaller::default());
        caller.on_call(CONTRACT, ITypeAndVersion::typeAndVersionCall {}, answer.to_string());
        caller
    }

    #[rstest]
    #[case("CommitStore 1.0.0", ContractType::CommitStore, ContractVersion::V1_0_0)]
    #[case("EVM2EVMOffRamp 1.2.0", ContractType::OffRamp, ContractVersion::V1_2_0)]
    #[case("EVM2EVMOnRamp 1.2.0-dev", ContractType::OnRamp, ContractVersion::V1_2_0)]
    #[case("PriceRegistry 1.0.0-dev", ContractType::PriceRegistry, ContractVersion::V1_0_0)]
    fn test_parse_type_and_version(
        #[case] raw: &str,
        #[case] contract_type: ContractType,
        #[case] version: ContractVersion,
    ) {
        let parsed: TypeAndVersion = raw.parse().unwrap();
        assert_eq!(parsed, TypeAndVersion { contract_type, version });
    }

    #[rstest]
    #[case("CommitStore 1.1.0")]
    #[case("CommitStore 1.5.0")]
    #[case("ARM 1.0.0")]
    #[case("CommitStore")]
    #[case("")]
    fn test_parse_rejects_unsupported(#[case] raw: &str) {
        let err = raw.parse::<TypeAndVersion>().unwrap_err();
        assert!(matches!(err, ReaderError::UnsupportedVersion(_)), "{err}");
    }

    #[test]
    fn test_display_round_trips() {
        let parsed: TypeAndVersion = "EVM2EVMOffRamp 1.2.0-dev".parse().unwrap();
        assert_eq!(parsed.to_string(), "EVM2EVMOffRamp 1.2.0");
    }

    #[tokio::test]
    async fn test_type_and_version_reads_contract() {
        let caller = caller_answering("PriceRegistry 1.2.0");
        let found = type_and_version(caller.as_ref(), CONTRACT).await.unwrap();
        assert_eq!(found.contract_type, ContractType::PriceRegistry);
        assert_eq!(found.version, ContractVersion::V1_2_0);
    }

    #[tokio::test]
    async fn test_new_readers_for_each_version() {
        let poller = Arc::new(InMemoryLogPoller::default());
        let fees = Arc::new(StaticFeeEstimator::new(U256::from(1), None));

        for version in ["1.0.0", "1.2.0"] {
            let caller = caller_answering(&format!("CommitStore {version}"));
            let reader =
                new_commit_store_reader(CONTRACT, caller, poller.clone(), fees.clone()).await;
            assert_eq!(reader.unwrap().address(), CONTRACT);

            let caller = caller_answering(&format!("EVM2EVMOffRamp {version}"));
            let reader = new_off_ramp_reader(CONTRACT, caller, poller.clone(), fees.clone()).await;
            assert_eq!(reader.unwrap().address(), CONTRACT);

            let caller = caller_answering(&format!("EVM2EVMOnRamp {version}"));
            let reader = new_on_ramp_reader(CONTRACT, 1, 4, caller, poller.clone(), None).await;
            assert_eq!(reader.unwrap().address(), CONTRACT);

            let caller = caller_answering(&format!("PriceRegistry {version}"));
            let reader = new_price_registry_reader(CONTRACT, caller, poller.clone()).await;
            assert_eq!(reader.unwrap().address(), CONTRACT);
        }
    }

    #[tokio::test]
    async fn test_new_reader_rejects_other_contract_type() {
        let caller = caller_answering("EVM2EVMOnRamp 1.2.0");
        let result =
            new_price_registry_reader(CONTRACT, caller, Arc::new(InMemoryLogPoller::default()))
                .await;
        assert!(matches!(result, Err(ReaderError::UnsupportedVersion(_))));
    }

    #[tokio::test]
    async fn test_usdc_transmitter_reaches_v1_2_0_on_ramp() {
        let caller = caller_answering("EVM2EVMOnRamp 1.2.0");
        let poller = Arc::new(InMemoryLogPoller::default());
        let transmitter = Address::repeat_byte(0xcc);
        let reader =
            new_on_ramp_reader(CONTRACT, 1, 4, caller, poller.clone(), Some(transmitter))
                .await
                .unwrap();

        reader.register_filters().await.unwrap();
        let usdc_filter = format!("USDC message sent - {transmitter}");
        assert!(poller.registered_filters().contains(&usdc_filter));
    }
}
