//! Metrics for the contract readers.

/// Container for the metric names emitted by the readers.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Number of calls in each batched contract read.
    pub const BATCH_CALL_SIZE: &'static str = "ccip_data_batch_call_size";
    /// Event-invalidated cache reads served without a fetch.
    pub const CACHE_HITS: &'static str = "ccip_data_cache_hits_total";
    /// Event-invalidated cache reads that triggered a fetch.
    pub const CACHE_MISSES: &'static str = "ccip_data_cache_misses_total";

    /// Describes and zeroes every metric.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_histogram!(
            Self::BATCH_CALL_SIZE,
            metrics::Unit::Count,
            "Number of calls in a batched contract read",
        );

        metrics::describe_counter!(
            Self::CACHE_HITS,
            metrics::Unit::Count,
            "Cache reads answered from the cached value",
        );

        metrics::describe_counter!(
            Self::CACHE_MISSES,
            metrics::Unit::Count,
            "Cache reads that fetched a fresh value",
        );
    }

    fn zero() {
        metrics::histogram!(Self::BATCH_CALL_SIZE).record(0.0);

        metrics::counter!(Self::CACHE_HITS).increment(0);

        metrics::counter!(Self::CACHE_MISSES).increment(0);
    }
}
