//! Readers for the 1.0.0 contract family.
//!
//! Commit reports of this family carry at most one gas price update. The
//! off-chain commit config prices gas and tokens off a single fee update pair.

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
