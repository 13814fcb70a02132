#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod address;
pub use address::{AddressError, UnknownAddress};

mod message;
pub use message::{Message, MessageWithMeta, TokenAmount};

mod report;
pub use report::{CommitReport, ExecutionReport, GasPriceUpdate, Interval, TokenPrice};

mod event;
pub use event::{
    Event, ExecutionStateChanged, ExecutionStateChangedWithMeta, GasPriceUpdateWithMeta,
    GasPriceUpdateWithTimestamp, MessageExecutionState, TokenPriceUpdate,
    TokenPriceUpdateWithMeta, TxMeta,
};

mod config;
pub use config::{
    CommitOffchainConfig, CommitOnchainConfig, CommitStoreStaticConfig, ConfigSnapshot,
    ExecOffchainConfig, ExecOnchainConfig, OffRampStaticConfig, OffRampTokens,
    OnRampDynamicConfig, OnRampStaticConfig, TokenBucketRateLimit,
};

mod poller;
pub use poller::{Confirmations, EventFilter, LatestBlock, Log, LogPoller, LogPollerError};

mod caller;
pub use caller::{CallError, ContractCaller, EvmCall, GasFeeEstimator};

mod prices;
pub use prices::{GasPrice, GasPriceError, GasPriceEstimator};

mod error;
pub use error::{CodecError, ConfigError, ReaderError};

mod readers;
pub use readers::{
    CommitStoreReader, LeafHasher, OffRampReader, OnRampReader, PriceRegistryReader,
};
