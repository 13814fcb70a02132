//! Readers for the 1.2.0 contract family.
//!
//! Commit reports carry any number of gas price updates, packed as `uint224`.
//! Send requests carry per-token source data, hashed into the merkle leaf.

pub mod bindings;

mod codec;

mod config;
pub use config::{JsonCommitOffchainConfig, JsonExecOffchainConfig};

mod hasher;
pub use hasher::MessageHasher;

mod commit_store;
pub use commit_store::CommitStore;

mod offramp;
pub use offramp::OffRamp;

mod onramp;
pub use onramp::OnRamp;

mod price_registry;
pub use price_registry::PriceRegistry;
