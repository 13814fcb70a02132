#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod bindings;

mod calls;

mod logs;

mod hashing;
pub use hashing::{LEAF_DOMAIN_SEPARATOR, metadata_hash};

pub mod filters;

mod cache;
pub use cache::AutoSync;

mod config;
pub use config::{ConfigDocument, decode_offchain_config, decode_onchain_config};

pub mod prices;

mod tokens;

mod price_registry;

pub mod v1_0_0;

pub mod v1_2_0;

mod factory;
pub use factory::{
    ContractType, ContractVersion, TypeAndVersion, new_commit_store_reader, new_off_ramp_reader,
    new_on_ramp_reader, new_price_registry_reader, type_and_version,
};

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
