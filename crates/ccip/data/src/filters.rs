//! Event filter naming, registration and diffing.
//!
//! Each reader owns the filters it derives at construction time and passes them
//! explicitly to [`register_filters`] and [`unregister_filters`]. A filter
//! watching the zero address is treated as disabled and never reaches the
//! [`LogPoller`].

use alloy_primitives::Address;
use ccip_types::{EventFilter, LogPoller, LogPollerError};
use std::{collections::HashSet, time::Duration};

/// Retention of logs read by the commit and exec plugins.
pub const COMMIT_EXEC_LOGS_RETENTION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Retention of logs that only invalidate caches. Zero keeps them forever.
pub const CACHE_EVICTION_LOGS_RETENTION: Duration = Duration::ZERO;

/// Price registry token and gas price updates.
pub const COMMIT_PRICE_UPDATES: &str = "Commit price updates";
/// On-ramp send requests.
pub const COMMIT_CCIP_SENDS: &str = "Commit ccip sends";
/// On-ramp dynamic config changes.
pub const ONRAMP_CONFIG_SET: &str = "Onramp config set";
/// Commit store accepted reports.
pub const EXEC_REPORT_ACCEPTS: &str = "Exec report accepts";
/// Off-ramp execution state changes.
pub const EXEC_EXECUTION_STATE_CHANGES: &str = "Exec execution state changes";
/// Off-ramp token pool additions.
pub const EXEC_TOKEN_POOL_ADDED: &str = "Token pool added";
/// Off-ramp token pool removals.
pub const EXEC_TOKEN_POOL_REMOVED: &str = "Token pool removed";
/// Price registry fee token additions.
pub const FEE_TOKEN_ADDED: &str = "Fee token added";
/// Price registry fee token removals.
pub const FEE_TOKEN_REMOVED: &str = "Fee token removed";
/// USDC message transmitter sends.
pub const USDC_MESSAGE_SENT: &str = "USDC message sent";

/// Derives a filter name from a purpose label and a contract address.
///
/// The name only depends on its inputs, so re-registering after a restart is idempotent.
pub fn filter_name(label: &str, address: Address) -> String {
    format!("{label} - {address}")
}

/// Registers every enabled filter, stopping at the first failure.
pub async fn register_filters(
    poller: &dyn LogPoller,
    filters: &[EventFilter],
) -> Result<(), LogPollerError> {
    for filter in filters {
        if filter.has_zero_address() {
            trace!(target: "filters", name = %filter.name, "Skipping disabled filter");
            continue;
        }
        poller.register_filter(filter.clone()).await?;
        debug!(target: "filters", name = %filter.name, "Registered filter");
    }
    Ok(())
}

/// Unregisters every enabled filter, stopping at the first failure.
pub async fn unregister_filters(
    poller: &dyn LogPoller,
    filters: &[EventFilter],
) -> Result<(), LogPollerError> {
    for filter in filters {
        if filter.has_zero_address() {
            trace!(target: "filters", name = %filter.name, "Skipping disabled filter");
            continue;
        }
        poller.unregister_filter(&filter.name).await?;
        debug!(target: "filters", name = %filter.name, "Unregistered filter");
    }
    Ok(())
}

/// Returns the filters to create and to delete when moving from `before` to `after`.
///
/// Filters are compared by name only. A retention change on an existing name
/// does not trigger re-registration.
pub fn diff_filters(
    before: &[EventFilter],
    after: &[EventFilter],
) -> (Vec<EventFilter>, Vec<EventFilter>) {
    let before_names: HashSet<&str> = before.iter().map(|f| f.name.as_str()).collect();
    let after_names: HashSet<&str> = after.iter().map(|f| f.name.as_str()).collect();

    let created =
        after.iter().filter(|f| !before_names.contains(f.name.as_str())).cloned().collect();
    let deleted =
        before.iter().filter(|f| !after_names.contains(f.name.as_str())).cloned().collect();
    (created, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, address};
    use async_trait::async_trait;
    use ccip_types::{Confirmations, LatestBlock, Log};
    use mockall::{mock, predicate::eq};

    mock! {
        #[derive(Debug)]
        Poller {}

        #[async_trait]
        impl LogPoller for Poller {
            async fn register_filter(&self, filter: EventFilter) -> Result<(), LogPollerError>;
            async fn unregister_filter(&self, name: &str) -> Result<(), LogPollerError>;
            async fn latest_block(&self) -> Result<LatestBlock, LogPollerError>;
            async fn logs_by_topic_and_address(
                &self,
                event_sig: B256,
                address: Address,
                confs: Confirmations,
            ) -> Result<Vec<Log>, LogPollerError>;
            async fn logs_by_indexed_word_range(
                &self,
                event_sig: B256,
                address: Address,
                word_index: usize,
                low: B256,
                high: B256,
                confs: Confirmations,
            ) -> Result<Vec<Log>, LogPollerError>;
            async fn logs_data_word_between(
                &self,
                event_sig: B256,
                address: Address,
                lower_index: usize,
                upper_index: usize,
                value: B256,
                confs: Confirmations,
            ) -> Result<Vec<Log>, LogPollerError>;
            async fn indexed_logs_topic_range(
                &self,
                event_sig: B256,
                address: Address,
                topic_index: usize,
                low: B256,
                high: B256,
                confs: Confirmations,
            ) -> Result<Vec<Log>, LogPollerError>;
            async fn indexed_logs_created_after(
                &self,
                event_sig: B256,
                address: Address,
                topic_index: usize,
                values: Vec<B256>,
                timestamp: u64,
                confs: Confirmations,
            ) -> Result<Vec<Log>, LogPollerError>;
            async fn logs_since(
                &self,
                event_sig: B256,
                address: Address,
                timestamp: u64,
                confs: Confirmations,
            ) -> Result<Vec<Log>, LogPollerError>;
            async fn logs_by_tx_hash(
                &self,
                event_sig: B256,
                address: Address,
                tx_hash: B256,
            ) -> Result<Vec<Log>, LogPollerError>;
            async fn latest_block_by_event_sigs_addrs(
                &self,
                from_block: u64,
                event_sigs: Vec<B256>,
                addresses: Vec<Address>,
                confs: Confirmations,
            ) -> Result<Option<u64>, LogPollerError>;
        }
    }

    fn named(name: &str) -> EventFilter {
        EventFilter::new(name, vec![], vec![Address::with_last_byte(1)], Duration::ZERO)
    }

    fn names(filters: &[EventFilter]) -> HashSet<String> {
        filters.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn test_filter_name() {
        let address = address!("0x5550000000000000000000000000000000000001");
        assert_eq!(
            filter_name(COMMIT_CCIP_SENDS, address),
            "Commit ccip sends - 0x5550000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_diff_filters() {
        let before = vec![named("e"), named("a"), named("b")];
        let after = vec![named("a"), named("c"), named("d")];
        let (created, deleted) = diff_filters(&before, &after);
        assert_eq!(names(&created), HashSet::from(["c".to_string(), "d".to_string()]));
        assert_eq!(names(&deleted), HashSet::from(["e".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_diff_ignores_retention() {
        let before = vec![named("a")];
        let mut changed = named("a");
        changed.retention = COMMIT_EXEC_LOGS_RETENTION;
        let (created, deleted) = diff_filters(&before, &[changed]);
        assert!(created.is_empty());
        assert!(deleted.is_empty());
    }

    #[tokio::test]
    async fn test_zero_address_filter_never_reaches_poller() {
        let disabled = EventFilter::new("disabled", vec![], vec![Address::ZERO], Duration::ZERO);
        let enabled = named("enabled");

        let mut poller = MockPoller::new();
        poller
            .expect_register_filter()
            .with(eq(enabled.clone()))
            .times(1)
            .returning(|_| Ok(()));
        poller
            .expect_unregister_filter()
            .withf(|name| name == "enabled")
            .times(1)
            .returning(|_| Ok(()));

        let filters = vec![disabled, enabled];
        register_filters(&poller, &filters).await.unwrap();
        unregister_filters(&poller, &filters).await.unwrap();
    }

    #[tokio::test]
    async fn test_registration_fails_fast() {
        let mut poller = MockPoller::new();
        poller
            .expect_register_filter()
            .times(1)
            .returning(|_| Err(LogPollerError::Backend("db down".into())));

        let filters = vec![named("first"), named("second")];
        let err = register_filters(&poller, &filters).await.unwrap_err();
        assert_eq!(err, LogPollerError::Backend("db down".into()));
    }
}
